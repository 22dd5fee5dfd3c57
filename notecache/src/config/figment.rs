use std::path::Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use crate::config::app_config::AppConfig;
use crate::lib_constants::APP_CONFIG_ENV_PREFIX;

pub trait FigmentExt {
    fn setup_app_config(
        self,
        config_file: Option<&Path>,
    ) -> Figment;
}

impl FigmentExt for Figment {
    /// Defaults, then the config file, then `NOTECACHE_*` variables.
    ///
    /// An explicitly given file must exist, without one only the defaults
    /// and the environment apply.
    fn setup_app_config(self, config_file: Option<&Path>) -> Figment {
        let figment = self.merge(Serialized::defaults(AppConfig::default()));
        let figment = match config_file {
            Some(config_file) => figment.merge(Toml::file_exact(config_file)),
            None => figment,
        };
        figment.merge(Env::prefixed(APP_CONFIG_ENV_PREFIX).ignore(&["user"]))
    }
}

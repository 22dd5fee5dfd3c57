use std::path::Path;
use figment::Figment;
use log::debug;
use thiserror::Error;
use crate::config::app_config::AppConfig;
use crate::config::figment::FigmentExt;
use crate::lib_constants::MAX_CHANGE_BUFFER_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(#[from] figment::Error),

    #[error(
        "invalid change_buffer_size {0} (expected 1 to {max})",
        max = MAX_CHANGE_BUFFER_SIZE,
    )]
    ChangeBufferSize(usize),
}

pub fn read_app_config(
    config_file: Option<&Path>,
    figment: Figment,
) -> Result<AppConfig, ConfigError> {
    let app_config: AppConfig = figment
        .setup_app_config(config_file)
        .extract()?;
    if !(1..=MAX_CHANGE_BUFFER_SIZE).contains(&app_config.change_buffer_size) {
        return Err(ConfigError::ChangeBufferSize(app_config.change_buffer_size))
    }
    debug!("using configuration: {app_config:?}");
    Ok(app_config)
}

mod app_setup;
mod cli;
mod commands;

use clap::{Parser, crate_name};
use figment::Figment;
use log::debug;
use notecache::config::read::read_app_config;
use notecache::error_exit;
use notecache::logging::init_tool_logging;
use crate::app_setup::make_app;
use crate::cli::CliConfig;
use crate::commands::execute;

#[tokio::main]
async fn main() {
    let cli_config = CliConfig::parse();

    init_tool_logging(cli_config.verbose.into());

    debug!("{} starting up", crate_name!());

    let app_config = read_app_config(
        cli_config.config_file.as_deref(),
        Figment::new(),
    )
        .unwrap_or_else(|e| {
            error_exit!("finishing due to a configuration error: {e}");
        });

    let app = make_app(&app_config, cli_config.user)
        .await
        .unwrap_or_else(|e| error_exit!("could not open the note store: {e}"));

    if let Err(e) = execute(&app, cli_config.command).await {
        error_exit!("{e}")
    }
}

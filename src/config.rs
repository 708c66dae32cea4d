use anyhow::Context;
use log::info;

use crate::settings::Settings;

/// Loads settings from the file named by `APP_CONFIG`, falling back to `config.yml`.
pub fn load_settings() -> anyhow::Result<Settings> {
    let config_path = get_config_path();

    Settings::from_file(&config_path)
        .with_context(|| format!("Failed to load config file {}", &config_path))
}

fn get_config_path() -> String {
    use std::env;

    env::var("APP_CONFIG").unwrap_or_else(|e| {
        info!(
            "Missing or invalid APP_CONFIG env var, fallback to config.yml; {:?}",
            e
        );
        "config.yml".to_string()
    })
}

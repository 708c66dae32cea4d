mod client;
mod error;
mod log_sink;

pub use client::*;
pub use error::*;
pub use log_sink::*;

use std::fs::File;
use std::io::Read;
use std::result::Result;

use serde::Deserialize;

use crate::http::{ErrorPolicy, Headers};

#[derive(Debug)]
pub struct Settings {
    pub client: Client,
    pub log: Log,
}

impl Settings {
    pub fn from_file(file_path: &str) -> Result<Self, SettingsError> {
        let reader = File::open(file_path).map_err(|e| SettingsError::FileParse {
            path: Some(file_path.to_string()),
            cause: Box::new(e),
        })?;

        Settings::from_reader(reader)
    }

    pub fn from_reader<T: Read>(reader: T) -> Result<Self, SettingsError> {
        let file_settings: PartialSettings =
            serde_yaml::from_reader(reader).map_err(|e| SettingsError::FileParse {
                path: None,
                cause: Box::new(e),
            })?;

        Settings::merge(vec![file_settings, Default::default()])
    }

    /// Merges `sources` field by field; earlier sources win.
    pub fn merge(mut sources: Vec<PartialSettings>) -> Result<Self, SettingsError> {
        let client_sources = sources.iter_mut().filter_map(|s| s.client.take()).collect();
        let log_sources = sources.iter_mut().filter_map(|s| s.log.take()).collect();

        Ok(Settings {
            client: Client::new(client_sources)?,
            log: Log::new(log_sources)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    client: Option<PartialClient>,
    log: Option<PartialLog>,
}

impl Default for PartialSettings {
    fn default() -> Self {
        PartialSettings {
            client: Some(PartialClient {
                base_url: None,
                timeout: None,
                error_policy: Some(ErrorPolicy::Swallow),
                default_headers: Some(Headers::json()),
            }),
            log: Some(PartialLog {
                sink: Some(SinkKind::Log),
                path: None,
            }),
        }
    }
}

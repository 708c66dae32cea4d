use serde::Deserialize;
use std::path::PathBuf;

use super::SettingsError;

#[derive(Debug, PartialEq, Eq)]
pub enum SinkSettings {
    Log,
    File { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Log,
    File,
}

#[derive(Debug)]
pub struct Log {
    pub sink: SinkSettings,
}

impl Log {
    pub fn new(sources: Vec<PartialLog>) -> Result<Self, SettingsError> {
        let merged: PartialLog =
            sources
                .into_iter()
                .fold(Default::default(), |acc, x| PartialLog {
                    sink: acc.sink.or(x.sink),
                    path: acc.path.or(x.path),
                });

        let kind = merged
            .sink
            .ok_or_else(|| SettingsError::MissingValue("log.sink".to_string()))?;

        let sink = match kind {
            SinkKind::Log => SinkSettings::Log,
            SinkKind::File => SinkSettings::File {
                path: merged
                    .path
                    .ok_or_else(|| SettingsError::MissingValue("log.path".to_string()))?,
            },
        };

        Ok(Log { sink })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialLog {
    pub sink: Option<SinkKind>,
    pub path: Option<PathBuf>,
}

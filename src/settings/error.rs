use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SettingsError {
    #[error("Failed to parse settings{}: {cause}", path.as_ref().map(|p| format!(" from `{}`", p)).unwrap_or_default())]
    FileParse {
        path: Option<String>,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Missing settings value `{0}`")]
    MissingValue(String),
}

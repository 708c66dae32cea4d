use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

/// What was sent when a request got no response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
}

/// A failed request, classified at the transport boundary.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum RequestFailure {
    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Response { status: u16, body: Option<Value> },

    /// The request went out but no response came back.
    #[error("no response for {} {}: {message}", request.method, request.url)]
    Transport { request: RequestInfo, message: String },

    /// The request could not be dispatched at all.
    #[error("{message}")]
    Configuration { message: String },
}

impl RequestFailure {
    pub fn configuration(message: impl Into<String>) -> Self {
        RequestFailure::Configuration {
            message: message.into(),
        }
    }

    /// Message written to the log sink for this failure.
    pub fn log_message(&self) -> String {
        match self {
            RequestFailure::Response { body, .. } => {
                format!("Error response: {}", to_json(body))
            }
            RequestFailure::Transport { request, .. } => {
                format!("Error request:{}", to_json(request))
            }
            RequestFailure::Configuration { message } => format!("General error:{}", message),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

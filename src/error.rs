use thiserror::Error;

/// Failures of the guide stage. Every variant is shown to the user as the same
/// generic message; the variants exist for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuideError {
    #[error("Location query is empty")]
    EmptyQuery,
    #[error("No API key configured")]
    MissingCredential,
    #[error("Guide request failed ({}): {detail}", status_label(.status))]
    RequestFailed { status: Option<u16>, detail: String },
    #[error("Malformed guide response: {0}")]
    MalformedResponse(String),
    #[error("Invalid guide payload: {0}")]
    InvalidGuidePayload(String),
}

/// Failures of the image stage. These never reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("No API key configured")]
    MissingCredential,
    #[error("Image request failed ({}): {detail}", status_label(.status))]
    RequestFailed { status: Option<u16>, detail: String },
    #[error("Invalid image payload: {0}")]
    InvalidImagePayload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("HTTP client error: {0}")]
    Client(String),
    #[error("Request could not be sent: {0}")]
    Send(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Logger error: {0}")]
    Logger(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "no response".to_string(),
    }
}

impl From<TransportError> for GuideError {
    fn from(err: TransportError) -> Self {
        GuideError::RequestFailed {
            status: None,
            detail: err.to_string(),
        }
    }
}

impl From<TransportError> for ImageError {
    fn from(err: TransportError) -> Self {
        ImageError::RequestFailed {
            status: None,
            detail: err.to_string(),
        }
    }
}

pub type Result<T, E = GuideError> = std::result::Result<T, E>;

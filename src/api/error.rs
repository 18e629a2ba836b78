use thiserror::Error;

/// Failure talking to the rentals API
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never reached the server or no response came back
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The body was not the JSON we expected
    #[error("Invalid API response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::from_status(status),
            None => ApiError::Network(err.to_string()),
        }
    }
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Maps a non-success status and its (optional) backend message.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| "unknown error".to_string());
        match status.as_u16() {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict(message),
            422 | 400 => Self::Validation(message),
            _ => Self::Server(message),
        }
    }

    /// Notice shown to the user for a failed operation.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized | Self::Forbidden => {
                "Session expired or missing permissions.".to_string()
            }
            Self::NotFound => "The requested resource was not found.".to_string(),
            Self::Conflict(message) => format!("Conflict: {message}"),
            Self::Validation(message) => format!("Rejected by the server: {message}"),
            Self::Server(message) if message != "unknown error" => {
                format!("Server error: {message}")
            }
            Self::Server(_) => "Something went wrong, please try again.".to_string(),
            Self::Transport(_) => "Server unreachable, please try again.".to_string(),
            Self::InvalidUrl(message) => format!("Invalid server address: {message}"),
        }
    }
}

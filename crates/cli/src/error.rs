use client::ClientError;
use engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("api error: {0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Engine(#[from] EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Fetch(String),
    #[error("{0}")]
    Usage(String),
}

impl AppError {
    /// Line printed to stderr before exiting.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Process exit code: 2 for input the user can fix, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Engine(_) | Self::Usage(_) => 2,
            Self::Client(ClientError::Validation(_) | ClientError::Conflict(_)) => 2,
            _ => 1,
        }
    }
}

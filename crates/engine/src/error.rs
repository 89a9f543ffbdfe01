//! Validation errors raised before any request reaches the backend.
//!
//! Every variant aborts a submission without touching selection state:
//!
//! - [`InvalidLimitRange`] when the minimum transaction size is not below the maximum.
//! - [`ZeroLimit`] when a limit field was explicitly set to zero.
//! - [`EmptySelection`] when a card-group constraint would carry no rule at all.
//!
//!  [`InvalidLimitRange`]: EngineError::InvalidLimitRange
//!  [`ZeroLimit`]: EngineError::ZeroLimit
//!  [`EmptySelection`]: EngineError::EmptySelection
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Minimum amount ({minimum}) must be lower than maximum amount ({maximum})")]
    InvalidLimitRange { minimum: String, maximum: String },
    #[error("\"{0}\" cannot be zero: clear the field for no limit")]
    ZeroLimit(&'static str),
    #[error("Select an account first")]
    MissingAccount,
    #[error("Select a virtual account first")]
    MissingVirtualAccount,
    #[error("Card name is required")]
    MissingName,
    #[error("Nothing selected: {0}")]
    EmptySelection(String),
    #[error("Page {page} is out of range (total pages: {total_pages})")]
    PageOutOfRange { page: i64, total_pages: u32 },
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

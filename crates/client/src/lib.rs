//! HTTP client for the card-issuing backend.
//!
//! [`ApiClient`] wraps the REST endpoints; [`sources`] plugs them into the
//! engine's pagers.
mod api;
mod error;
mod query;
pub mod sources;

pub use api::{ApiClient, DEFAULT_PAGE_SIZE};
pub use error::ClientError;
pub use query::TransactionQuery;

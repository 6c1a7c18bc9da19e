//! HTTP surface of the Financial Insights API.
//!
//! The binary in `main.rs` only parses flags, loads configuration and serves
//! [`routes::router`]; everything that shapes requests and responses lives
//! here so the router can be driven directly from tests.

pub mod cors;
pub mod docs;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, SharedState};

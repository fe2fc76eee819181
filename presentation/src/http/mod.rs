//! HTTP transport
//!
//! Clients poll these endpoints; there is no push channel.

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::poker_router;

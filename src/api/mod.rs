//! Wallet Trace HTTP API Module
//! REST surface over the deep-scan engine

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;

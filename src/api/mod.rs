//! HTTP API: single-page query form plus a small JSON surface

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use crate::Assistant;
pub use handlers::AppState;
pub use server::serve;

// proxy module - authenticated gateway to the agent-execution server

pub mod config;
pub mod server;

pub mod common;
pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum extractors and response layers
pub mod upstream; // Outbound clients

pub use config::ProxyConfig;
pub use server::{build_router, AppState, AxumServer};

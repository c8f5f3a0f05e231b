// Middleware module - Axum extractors and response layers

pub mod auth;
pub mod cors;

pub use auth::{extract_bearer_token, BearerToken, MissingCredential};
pub use cors::{handle_preflight, with_cors_headers};

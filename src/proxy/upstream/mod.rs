pub mod auth_client;
pub mod client;
pub mod identity;

pub use auth_client::{AuthClient, StaticToken, TokenProvider};
pub use client::UpstreamClient;
pub use identity::{IdentityClient, IdentityUser};

//! # passvault-sso
//!
//! Registers client applications with the external identity service over
//! gRPC (`auth.Auth/RegisterClient`).
//!
//! Calls retry on `NotFound`, `Aborted` and `DeadlineExceeded`, each attempt
//! bounded by the configured timeout. Callers see one blocking call and must
//! not retry on top of it.
//!
//! ```ignore
//! let client = SsoClient::connect_lazy(&config.sso)?;
//! let app_id = client.register_client("my-app", "app-secret", "https://app/cb").await?;
//! ```

pub mod client;
pub mod error;
pub mod proto;
pub mod retry;

pub use client::{ClientRegistrar, SsoClient};
pub use error::UpstreamError;
pub use retry::RetryPolicy;

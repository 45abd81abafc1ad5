pub mod auth;
pub mod context;

pub use auth::{AuthOutcome, Identity, RejectReason, auth_gate};
pub use context::RequestContext;

//! # passvault-token
//!
//! Decoding and minting of the bearer tokens issued by the identity service.
//!
//! Tokens are HMAC-signed JWTs carrying four domain claims next to the
//! registered `exp` and `jti` fields:
//!
//! | Claim | Meaning |
//! |-------|---------|
//! | `uid` | account id (required, positive) |
//! | `email` | account email |
//! | `role` | small integer role |
//! | `app_id` | issuing application |
//!
//! [`TokenCodec::decode`] verifies the signature and the algorithm family but
//! deliberately leaves the expiry check to the caller, so that an expired
//! token can be reported separately from a forged or broken one.

pub mod claims;
pub mod codec;
pub mod error;

pub use claims::ClaimSet;
pub use codec::{ACCEPTED_ALGORITHMS, TokenCodec, decode};
pub use error::TokenError;

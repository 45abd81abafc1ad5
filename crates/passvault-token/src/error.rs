//! Error types for the token crate.

use thiserror::Error;

/// Errors that can occur while decoding or minting a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token structure, header or claims could not be decoded, or a required
    /// claim is absent.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature did not verify, or the header names an algorithm outside
    /// the HMAC family.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The codec was constructed without a secret.
    #[error("signing secret is empty")]
    EmptySecret,

    /// Failed to create a token.
    #[error("failed to create token: {0}")]
    CreationFailed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            // Algorithm confusion: header alg outside the accepted family.
            ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::InvalidToken => TokenError::Malformed("invalid JWT structure".into()),
            ErrorKind::MissingRequiredClaim(claim) => {
                TokenError::Malformed(format!("missing claim: {claim}"))
            }
            ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                TokenError::Malformed("invalid token encoding".into())
            }
            ErrorKind::Json(e) => TokenError::Malformed(format!("invalid token payload: {e}")),
            _ => TokenError::Malformed(format!("JWT error: {err}")),
        }
    }
}

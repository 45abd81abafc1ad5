//! Error types for the identity service client.

use thiserror::Error;
use tonic::Code;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The last attempt ran out of time.
    #[error("identity service timed out")]
    Timeout,

    /// Any other failure: a non-OK status, or a channel that could not be
    /// set up. The message is for logs only.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

impl From<tonic::Status> for UpstreamError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            Code::DeadlineExceeded => UpstreamError::Timeout,
            code => UpstreamError::Unavailable(format!("{code:?}: {}", status.message())),
        }
    }
}

impl From<tonic::transport::Error> for UpstreamError {
    fn from(err: tonic::transport::Error) -> Self {
        UpstreamError::Unavailable(err.to_string())
    }
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout)
    }
}

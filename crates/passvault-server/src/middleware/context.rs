//! Per-request context handed to every vault handler.

use crate::error::ApiError;
use crate::middleware::auth::{AuthOutcome, Identity, RejectReason};
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use passvault_storage::{Deadline, StorageError};
use std::future::Future;

/// Deadline and auth outcome of the current request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub deadline: Deadline,
    pub outcome: AuthOutcome,
}

impl RequestContext {
    pub fn new(deadline: Deadline, outcome: AuthOutcome) -> Self {
        Self { deadline, outcome }
    }

    /// The caller's identity, or the 401 matching why there is none.
    pub fn identity(&self) -> Result<&Identity, ApiError> {
        match &self.outcome {
            AuthOutcome::Authenticated(identity) => Ok(identity),
            AuthOutcome::Anonymous => Err(ApiError::Unauthorized),
            AuthOutcome::Rejected(RejectReason::Expired) => Err(ApiError::TokenExpired),
            AuthOutcome::Rejected(RejectReason::Malformed | RejectReason::InvalidSignature) => {
                Err(ApiError::InvalidToken)
            }
        }
    }

    /// Fail with 408 if the deadline passed before downstream work starts.
    pub fn ensure_time_left(&self) -> Result<(), ApiError> {
        if self.deadline.is_expired() {
            tracing::warn!("request deadline passed before storage call");
            return Err(ApiError::RequestTimeout);
        }
        Ok(())
    }

    /// Run a storage operation under the request deadline. The operation is
    /// dropped when the deadline passes, whether or not the backend watches it.
    pub async fn bounded<F, T>(&self, operation: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        self.deadline.run(operation).await
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let deadline = Deadline::after(state.request_timeout);
        let outcome = parts.extensions.get::<AuthOutcome>().cloned().ok_or_else(|| {
            tracing::error!(path = %parts.uri.path(), "auth gate not installed on route");
            ApiError::Internal("internal error")
        })?;
        Ok(Self::new(deadline, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn context(outcome: AuthOutcome) -> RequestContext {
        RequestContext::new(Deadline::after(Duration::from_secs(5)), outcome)
    }

    #[test]
    fn test_identity_per_outcome() {
        assert!(matches!(
            context(AuthOutcome::Anonymous).identity(),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            context(AuthOutcome::Rejected(RejectReason::Malformed)).identity(),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            context(AuthOutcome::Rejected(RejectReason::InvalidSignature)).identity(),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            context(AuthOutcome::Rejected(RejectReason::Expired)).identity(),
            Err(ApiError::TokenExpired)
        ));

        let identity = Identity {
            account_id: 123,
            email: String::new(),
            role: 0,
            app_id: 0,
        };
        let ctx = context(AuthOutcome::Authenticated(identity.clone()));
        assert_eq!(ctx.identity().unwrap(), &identity);
    }

    #[tokio::test]
    async fn test_expired_deadline_is_request_timeout() {
        let ctx = RequestContext::new(Deadline::after(Duration::ZERO), AuthOutcome::Anonymous);
        assert!(matches!(ctx.ensure_time_left(), Err(ApiError::RequestTimeout)));
    }
}

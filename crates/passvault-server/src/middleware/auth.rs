use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use passvault_core::AccountId;
use passvault_token::{ClaimSet, TokenCodec, TokenError};

/// Validated identity projected from a non-expired, verified token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub account_id: AccountId,
    pub email: String,
    pub role: i32,
    pub app_id: i32,
}

impl From<ClaimSet> for Identity {
    fn from(claims: ClaimSet) -> Self {
        Self {
            account_id: claims.account_id,
            email: claims.email,
            role: claims.role,
            app_id: claims.app_id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    Malformed,
    InvalidSignature,
    Expired,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Malformed => "malformed",
            RejectReason::InvalidSignature => "invalid_signature",
            RejectReason::Expired => "expired",
        }
    }
}

/// Result of classifying a request's credential. Exactly one per request,
/// attached by [`auth_gate`] before any handler runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Anonymous,
    Authenticated(Identity),
    Rejected(RejectReason),
}

impl AuthOutcome {
    /// Classify the request headers. Total: never fails, never panics.
    pub fn classify(headers: &HeaderMap, codec: &TokenCodec, now: DateTime<Utc>) -> Self {
        let Some(credential) = extract_bearer(headers) else {
            return AuthOutcome::Anonymous;
        };

        match codec.decode(credential) {
            Ok(claims) if claims.is_expired_at(now) => AuthOutcome::Rejected(RejectReason::Expired),
            Ok(claims) => AuthOutcome::Authenticated(Identity::from(claims)),
            Err(TokenError::InvalidSignature) => {
                AuthOutcome::Rejected(RejectReason::InvalidSignature)
            }
            Err(_) => AuthOutcome::Rejected(RejectReason::Malformed),
        }
    }
}

/// Axum middleware: classify the bearer credential and attach the outcome.
///
/// Never short-circuits. Handlers decide what an anonymous or rejected
/// request gets, so every response keeps the same envelope.
pub async fn auth_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let outcome = AuthOutcome::classify(req.headers(), &state.codec, Utc::now());

    match &outcome {
        AuthOutcome::Anonymous => {
            tracing::debug!(path = %req.uri().path(), "no credential presented");
        }
        AuthOutcome::Authenticated(identity) => {
            tracing::info!(
                account_id = identity.account_id,
                app_id = identity.app_id,
                role = identity.role,
                "user authorized"
            );
        }
        AuthOutcome::Rejected(reason) => {
            tracing::warn!(reason = reason.as_str(), path = %req.uri().path(), "token rejected");
        }
    }

    req.extensions_mut().insert(outcome);
    next.run(req).await
}

/// The credential from `Authorization: Bearer <token>`.
///
/// A missing header, a non-UTF-8 value, another scheme or an empty token all
/// count as no credential.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

//! Client application registration, forwarded to the identity service.

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::response::Status;
use crate::state::AppState;
use crate::validation::{RegisterRequest, parse_body};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub status: Status,
    pub app_id: i64,
}

pub async fn register_client(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    let request: RegisterRequest = parse_body(&body?).map_err(|err| {
        tracing::warn!(error = ?err, "invalid request body");
        ApiError::from(err)
    })?;

    let Some(registrar) = state.registrar.as_ref() else {
        tracing::error!("register called without an identity service");
        return Err(ApiError::Internal("failed to register client"));
    };
    ctx.ensure_time_left()?;

    // The client retries on its own; the request deadline caps the whole call.
    let call = registrar.register_client(&request.app_name, &request.secret, &request.redirect_url);
    let app_id = match tokio::time::timeout_at(ctx.deadline.instant(), call).await {
        Ok(Ok(app_id)) => app_id,
        Ok(Err(err)) => {
            tracing::error!(account_id, app_name = %request.app_name, error = %err, "failed to register client");
            return Err(ApiError::from_upstream(&err, "failed to register client"));
        }
        Err(_) => {
            tracing::error!(account_id, app_name = %request.app_name, "client registration timed out");
            return Err(ApiError::GatewayTimeout);
        }
    };

    tracing::info!(account_id, app_name = %request.app_name, app_id, "client registered");
    Ok(Json(RegisterResponse {
        status: Status::Ok,
        app_id,
    }))
}

//! Key-part endpoints. One key part per account; storing replaces it.

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::response::Envelope;
use crate::state::AppState;
use crate::validation::{KeyPartRequest, parse_body};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use serde::Serialize;

const NOT_FOUND: &str = "key part not found";

#[derive(Debug, Serialize)]
pub struct KeyPartResponse {
    pub key_part: String,
}

pub async fn store_key_part(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    let request: KeyPartRequest = parse_body(&body?).map_err(|err| {
        tracing::warn!(error = ?err, "invalid request body");
        ApiError::from(err)
    })?;
    ctx.ensure_time_left()?;

    let id = ctx
        .bounded(state.storage.store_key_part(ctx.deadline, account_id, &request.key_part))
        .await
        .map_err(|err| {
            tracing::error!(op = "store_key_part", account_id, error = %err, "failed to save key part");
            ApiError::from_storage(&err, NOT_FOUND, "failed to save key part")
        })?;

    tracing::info!(op = "store_key_part", account_id, id, "key part saved");
    Ok(Json(Envelope::with_id(id)))
}

pub async fn retrieve_key_part(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<KeyPartResponse>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    ctx.ensure_time_left()?;

    let part = ctx
        .bounded(state.storage.retrieve_key_part(ctx.deadline, account_id))
        .await
        .map_err(|err| {
            tracing::warn!(op = "retrieve_key_part", account_id, error = %err, "failed to retrieve key part");
            ApiError::from_storage(&err, NOT_FOUND, "failed to retrieve key part")
        })?;

    Ok(Json(KeyPartResponse {
        key_part: part.key_part,
    }))
}

pub async fn delete_key_part(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Envelope>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    ctx.ensure_time_left()?;

    ctx.bounded(state.storage.delete_key_part(ctx.deadline, account_id))
        .await
        .map_err(|err| {
            tracing::warn!(op = "delete_key_part", account_id, error = %err, "failed to delete key part");
            ApiError::from_storage(&err, NOT_FOUND, "failed to delete key part")
        })?;

    tracing::info!(op = "delete_key_part", account_id, "key part deleted");
    Ok(Json(Envelope::ok()))
}

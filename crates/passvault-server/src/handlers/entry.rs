//! Entry endpoints.
//!
//! Each handler follows the same order: identity, body or id, deadline
//! guard, storage call. Nothing touches storage for an unauthenticated
//! request or an invalid body.

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::response::Envelope;
use crate::state::AppState;
use crate::validation::{EntryRequest, parse_body, parse_id};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use passvault_core::{Entry, EntryId};

const NOT_FOUND: &str = "entry not found";

/// Path and body extraction failures are kept as values so that the
/// identity check runs first.
fn entry_id(raw: Result<Path<String>, PathRejection>) -> Result<EntryId, ApiError> {
    let invalid = || ApiError::BadRequest("invalid entry_id".into());
    let Path(raw) = raw.map_err(|rejection| {
        tracing::warn!(error = %rejection, "unreadable entry id");
        invalid()
    })?;
    parse_id(&raw).ok_or_else(|| {
        tracing::warn!(entry_id = %raw, "invalid entry id");
        invalid()
    })
}

fn entry_body(body: Result<Bytes, BytesRejection>) -> Result<EntryRequest, ApiError> {
    parse_body(&body?).map_err(|err| {
        tracing::warn!(error = ?err, "invalid request body");
        ApiError::from(err)
    })
}

pub async fn save_entry(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    let request = entry_body(body)?;
    ctx.ensure_time_left()?;

    let id = ctx
        .bounded(state.storage.save_entry(
            ctx.deadline,
            account_id,
            &request.entry_type,
            &request.entry_data,
        ))
        .await
        .map_err(|err| {
            tracing::error!(op = "save_entry", account_id, error = %err, "failed to save entry");
            ApiError::from_storage(&err, NOT_FOUND, "failed to save entry")
        })?;

    tracing::info!(op = "save_entry", account_id, entry_id = id, "entry saved");
    Ok(Json(Envelope::with_id(id)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    ctx: RequestContext,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Entry>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    let id = entry_id(raw_id)?;
    ctx.ensure_time_left()?;

    let entry = ctx
        .bounded(state.storage.get_entry(ctx.deadline, account_id, id))
        .await
        .map_err(|err| {
            tracing::warn!(op = "get_entry", account_id, entry_id = id, error = %err, "failed to retrieve entry");
            ApiError::from_storage(&err, NOT_FOUND, "failed to retrieve entry")
        })?;

    tracing::info!(op = "get_entry", account_id, entry_id = id, "entry retrieved");
    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    ctx.ensure_time_left()?;

    let entries = ctx
        .bounded(state.storage.list_entries(ctx.deadline, account_id))
        .await
        .map_err(|err| {
            tracing::error!(op = "list_entries", account_id, error = %err, "failed to retrieve entries");
            ApiError::from_storage(&err, NOT_FOUND, "failed to retrieve entries")
        })?;

    tracing::info!(op = "list_entries", account_id, count = entries.len(), "entries retrieved");
    Ok(Json(entries))
}

pub async fn update_entry(
    State(state): State<AppState>,
    ctx: RequestContext,
    raw_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    let id = entry_id(raw_id)?;
    let request = entry_body(body)?;
    ctx.ensure_time_left()?;

    ctx.bounded(state.storage.update_entry(
        ctx.deadline,
        account_id,
        id,
        &request.entry_type,
        &request.entry_data,
    ))
    .await
    .map_err(|err| {
        tracing::warn!(op = "update_entry", account_id, entry_id = id, error = %err, "failed to update entry");
        ApiError::from_storage(&err, NOT_FOUND, "failed to update entry")
    })?;

    tracing::info!(op = "update_entry", account_id, entry_id = id, "entry updated");
    Ok(Json(Envelope::with_id(id)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    ctx: RequestContext,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let account_id = ctx.identity()?.account_id;
    let id = entry_id(raw_id)?;
    ctx.ensure_time_left()?;

    ctx.bounded(state.storage.delete_entry(ctx.deadline, account_id, id))
        .await
        .map_err(|err| {
            tracing::warn!(op = "delete_entry", account_id, entry_id = id, error = %err, "failed to delete entry");
            ApiError::from_storage(&err, NOT_FOUND, "failed to delete entry")
        })?;

    tracing::info!(op = "delete_entry", account_id, entry_id = id, "entry deleted");
    Ok(Json(Envelope::ok()))
}

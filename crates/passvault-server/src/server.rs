//! HTTP server lifecycle.

use crate::error::ApiError;
use crate::routes::create_router;
use crate::state::AppState;
use anyhow::Context;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
};
use passvault_core::{HttpServerConfig, VaultConfig};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Router plus the transport layers: request id, tracing, and an outer cap
/// of `idle_timeout` on the whole exchange.
pub fn build_app(state: AppState, http: &HttpServerConfig) -> Router {
    create_router(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            http.idle_timeout,
        ))
        .layer(middleware::map_response(envelope_idle_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// The outer timeout answers with a bare 408. Handler 408s already carry
/// the JSON envelope and pass through untouched.
async fn envelope_idle_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        tracing::warn!("request exceeded idle timeout");
        return ApiError::RequestTimeout.into_response();
    }
    response
}

/// Serve until SIGINT/SIGTERM, then drain and close storage.
pub async fn serve(cfg: VaultConfig) -> anyhow::Result<()> {
    let state = AppState::init(&cfg).await?;
    let storage = state.storage.clone();
    let app = build_app(state, &cfg.http_server);

    let listener = tokio::net::TcpListener::bind(&cfg.http_server.address)
        .await
        .with_context(|| format!("failed to bind {}", cfg.http_server.address))?;
    tracing::info!(
        address = %cfg.http_server.address,
        env = ?cfg.env,
        timeout = ?cfg.http_server.timeout,
        "passvault listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

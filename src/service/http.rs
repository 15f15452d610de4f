//! HTTP trigger surface
//!
//! Exposes the match trigger, the Slack OAuth flow, and the ambient health
//! and metrics endpoints on a single axum router.

use crate::error::SantaError;
use crate::service::app::AppState;
use crate::utils::current_timestamp;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Create the axum router with all service endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/match", get(match_handler))
        .route("/slack/oauth/start", get(oauth_start_handler))
        .route("/slack/oauth/callback", get(oauth_callback_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Serve the router until the shutdown future resolves
pub async fn serve(
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", state.config().service.http_port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Trigger server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Trigger server stopped");
    Ok(())
}

/// Execute the full match-and-notify cycle
async fn match_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.run_match_cycle().await {
        Ok(summary) => {
            info!(
                "Match trigger served: {} delivered, {} skipped, {} failed",
                summary.delivered, summary.skipped, summary.failed
            );
            (StatusCode::OK, "Matching complete, messages sent.").into_response()
        }
        Err(error) => {
            if matches!(
                error.downcast_ref::<SantaError>(),
                Some(SantaError::RunInProgress)
            ) {
                return (StatusCode::CONFLICT, "A match run is already in progress")
                    .into_response();
            }
            error!("Match run failed: {error:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error matching users: {error}"),
            )
                .into_response()
        }
    }
}

/// Redirect to the Slack authorization page
async fn oauth_start_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.slack().authorize_url() {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(error) => {
            error!("Failed to build authorization URL: {error:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Slack OAuth error: {error}"),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct OauthCallbackParams {
    code: Option<String>,
}

/// Exchange the provider's code for an access token
async fn oauth_callback_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OauthCallbackParams>,
) -> Response {
    let Some(code) = params.code else {
        return (
            StatusCode::BAD_REQUEST,
            SantaError::MissingOauthCode.to_string(),
        )
            .into_response();
    };

    match state.slack().exchange_code(&code).await {
        Ok(_) => (StatusCode::OK, "Slack integration successful!").into_response(),
        Err(error) => {
            error!("OAuth code exchange failed: {error:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Slack OAuth error: {error}"),
            )
                .into_response()
        }
    }
}

/// Lightweight service health endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": state.config().service.name.clone(),
        "version": crate::VERSION,
        "timestamp": current_timestamp(),
    }))
}

/// Prometheus metrics endpoint
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let metric_families = state.metrics().registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(output) => Response::builder()
            .status(StatusCode::OK)
            .header("content-type", encoder.format_type())
            .body(output.into())
            .unwrap(),
        Err(error) => {
            error!("Failed to encode metrics: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics",
            )
                .into_response()
        }
    }
}

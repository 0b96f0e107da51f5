//! HTTP tool surface.
//!
//! Thin axum layer over the command registry: a catalog endpoint, one
//! execution endpoint per tool call, and a health probe. Hosts speaking
//! a JSON tool protocol drive this surface directly.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::error::AppError;
use crate::registry::{catalog, execute};
use crate::state::AppState;

// ── Response types ───────────────────────────────────────────────

#[derive(Serialize)]
struct ApiOk<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ApiErr {
    ok: bool,
    error: String,
    detail: AppError,
}

fn ok_json<T: Serialize>(data: T) -> impl IntoResponse {
    Json(ApiOk { ok: true, data })
}

fn err_json(error: AppError) -> impl IntoResponse {
    let status = match &error {
        AppError::InvalidInput { .. } | AppError::Resolution { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ApiErr {
            ok: false,
            error: error.to_string(),
            detail: error,
        }),
    )
}

#[derive(Serialize)]
struct ToolResultPayload {
    message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    data: serde_json::Value,
}

// ── Handlers ─────────────────────────────────────────────────────

async fn post_tool(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let cmd = match catalog::deserialize_from_tool_call(&name, &body) {
        Ok(cmd) => cmd,
        Err(e) => return err_json(AppError::input(e)).into_response(),
    };

    match execute::execute(&state, cmd).await {
        Ok(result) => ok_json(ToolResultPayload {
            message: result.message,
            data: result.data,
        })
        .into_response(),
        Err(e) => err_json(e).into_response(),
    }
}

async fn get_tools() -> impl IntoResponse {
    ok_json(catalog::to_json_schema())
}

async fn get_health(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    match state.bridge.test_connection().await {
        Ok(()) => ok_json(serde_json::json!({ "bridge": "reachable" })).into_response(),
        Err(e) => err_json(e).into_response(),
    }
}

// ── Server startup ───────────────────────────────────────────────

/// Start the API server on 127.0.0.1. Port 0 picks a random free port;
/// the chosen port is returned.
pub async fn start_api_server(state: Arc<AppState>, port: u16) -> Result<u16, AppError> {
    let cors = CorsLayer::permissive();

    let app = Router::new()
        .route("/api/tools", get(get_tools))
        .route("/api/tools/{name}", post(post_tool))
        .route("/api/health", get(get_health))
        .layer(cors)
        .layer(Extension(state));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Transport {
            message: format!("failed to bind API server: {e}"),
        })?;
    let port = listener
        .local_addr()
        .map_err(|e| AppError::Transport {
            message: e.to_string(),
        })?
        .port();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server error");
        }
    });

    Ok(port)
}

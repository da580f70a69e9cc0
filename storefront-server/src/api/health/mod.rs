//! Health routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | / | GET | none |
//! | /health | GET | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// Health router - public routes
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> &'static str {
    "API is running..."
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let status = match state.db.query("RETURN 1").await {
        Ok(_) => "ok",
        Err(_) => "degraded",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
    })
}

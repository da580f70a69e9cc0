//! Server Implementation
//!
//! Router assembly, middleware layering and the HTTP listener.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware,
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use shared::response::{self, ErrorBody};

use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP request log middleware
async fn log_request(request: Request<Body>, next: middleware::Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Unknown endpoints answer JSON, not an empty body
async fn endpoint_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Endpoint not found")),
    )
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::products::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::users::router())
        .fallback(endpoint_not_found)
}

/// CORS for the SPA origin; the pagination headers must be exposed or the
/// frontend cannot read them
fn cors_layer(origin: &str) -> CorsLayer {
    let expose = [
        HeaderName::from_static(response::X_TOTAL_COUNT),
        HeaderName::from_static(response::X_PAGE),
        HeaderName::from_static(response::X_PAGE_SIZE),
        HeaderName::from_static(response::X_TOTAL_PAGES),
    ];

    let layer = match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    layer.expose_headers(expose)
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (shared with tests/embedding)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// The full application: API routes, auth middleware, static uploads,
    /// CORS, compression and request logging
    pub fn build_router(state: ServerState) -> Router {
        let uploads_dir = state.uploads_dir();
        let cors = cors_layer(&state.config.cors_origin);

        build_app()
            // JWT auth at router level; require_auth skips public routes
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            .nest_service("/uploads", ServeDir::new(uploads_dir))
            // image uploads may exceed axum's default 2MB body cap
            .layer(axum::extract::DefaultBodyLimit::max(8 * 1024 * 1024))
            .layer(cors)
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request))
    }

    /// Dispatch a single request against the in-process router, mirroring
    /// a network round-trip (used by the integration tests)
    pub async fn oneshot(state: ServerState, request: Request<Body>) -> Response {
        use tower::Service;

        let mut app = Self::build_router(state);
        match app.call(request).await {
            Ok(response) => response,
            Err(e) => match e {},
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = Self::build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!("Storefront API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}

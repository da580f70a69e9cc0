//! Auth API module

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    // Public identity issuance
    let public_routes = Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login));

    // Admin accounts are only created by existing admins
    let admin_routes = Router::new()
        .route("/admin/create", post(handler::create_admin))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}

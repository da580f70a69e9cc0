//! Product API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    // Public catalog browsing
    let public_routes = Router::new()
        .route("/", get(handler::list))
        // must come before /{id} to avoid path capture
        .route("/categories", get(handler::categories))
        .route("/{id}", get(handler::get_by_id));

    // Catalog management: admin only
    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}

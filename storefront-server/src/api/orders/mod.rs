//! Order API module
//!
//! Checkout and self-service reads for authenticated customers; listing,
//! item editing, delivery toggling, deletion and statistics for admins.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // Authenticated customer routes (ownership checked in the handler
    // where it matters)
    let user_routes = Router::new()
        .route("/", post(handler::create))
        .route("/myorders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id));

    // Back-office routes
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/stats", get(handler::stats))
        .route("/{id}", delete(handler::delete_order))
        .route("/{id}/deliver", put(handler::toggle_delivered))
        .route("/{id}/items", put(handler::replace_items))
        .route("/{id}/items/remove", put(handler::remove_items))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}

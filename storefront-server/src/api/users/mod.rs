//! User API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new().route("/profile", get(handler::profile));

    // Customer management: admin only
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}

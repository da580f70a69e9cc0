//! CurrentUser extractor
//!
//! Handlers declare a `CurrentUser` parameter to receive the caller
//! resolved by the auth middleware; when the middleware did not run (e.g.
//! a route mounted without it), the extractor authenticates on its own.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::auth::middleware::resolve_bearer_user;
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = resolve_bearer_user(state, &parts.headers).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

//! Authentication middleware
//!
//! `require_auth` runs at router level; it validates the bearer token and
//! resolves the subject to a stored user, injecting [`CurrentUser`] into
//! the request extensions. `require_admin` is layered onto admin-only
//! sub-routers and checks the resolved role.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

/// Authentication middleware - requires a valid bearer token
///
/// # Skipped paths
///
/// - `OPTIONS *` (CORS preflight)
/// - anything outside `/api/` (health, static uploads, root)
/// - `POST /api/auth/login`, `POST /api/auth/register`
/// - `GET /api/products*` (public catalog browsing)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let user = resolve_bearer_user(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// API routes reachable without a token
fn is_public_route(method: &Method, path: &str) -> bool {
    if matches!(path, "/api/auth/login" | "/api/auth/register") {
        return true;
    }
    // catalog browsing is public; product mutations are not
    *method == Method::GET && (path == "/api/products" || path.starts_with("/api/products/"))
}

/// Validate the bearer token and resolve its subject against the user
/// store, excluding the password hash from everything downstream. A token
/// whose user no longer exists is rejected.
pub(crate) async fn resolve_bearer_user(
    state: &ServerState,
    headers: &HeaderMap,
) -> Result<CurrentUser, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or_else(AppError::invalid_token)?
        }
        None => return Err(AppError::unauthorized()),
    };

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        tracing::warn!(target: "security", error = %e, "Token validation failed");
        AppError::invalid_token()
    })?;

    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_id(&claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_token)?;

    Ok(CurrentUser::from(&user))
}

/// Admin middleware - requires the resolved role to be `admin`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    if !user.is_admin() {
        tracing::warn!(target: "security", user_id = %user.id, "Admin access denied");
        return Err(AppError::admin_required());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_endpoints_and_catalog_reads_are_public() {
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/auth/register"));
        assert!(is_public_route(&Method::GET, "/api/products"));
        assert!(is_public_route(&Method::GET, "/api/products/categories"));
        assert!(is_public_route(&Method::GET, "/api/products/product:x"));
    }

    #[test]
    fn mutations_and_other_apis_are_protected() {
        assert!(!is_public_route(&Method::POST, "/api/products"));
        assert!(!is_public_route(&Method::DELETE, "/api/products/product:x"));
        assert!(!is_public_route(&Method::POST, "/api/auth/admin/create"));
        assert!(!is_public_route(&Method::GET, "/api/orders"));
        assert!(!is_public_route(&Method::GET, "/api/users"));
    }
}

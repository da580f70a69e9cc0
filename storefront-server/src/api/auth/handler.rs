//! Authentication Handlers
//!
//! Registration, login and admin account creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use shared::client::{AuthResponse, LoginRequest, RegisterRequest};

use crate::core::ServerState;
use crate::db::models::{Role, User, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// POST /api/auth/register - create a storefront account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let users = UserRepository::new(state.get_db());
    if users
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?
        .is_some()
    {
        return Err(AppError::validation("User already exists"));
    }

    let user = users
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: Role::User,
        })
        .await
        .map_err(AppError::from)?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id_string(), email = %user.email, "User registered");
    Ok((StatusCode::CREATED, Json(auth_response(user, Some(token)))))
}

/// POST /api/auth/login - exchange credentials for a bearer token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let users = UserRepository::new(state.get_db());
    let user = users
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        tracing::warn!(target: "security", email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id_string(), role = %user.role, "User logged in");
    Ok(Json(auth_response(user, Some(token))))
}

/// POST /api/auth/admin/create - create another admin (admin only, no token
/// in the response)
pub async fn create_admin(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let users = UserRepository::new(state.get_db());
    if users
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?
        .is_some()
    {
        return Err(AppError::validation("User already exists"));
    }

    let admin = users
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: Role::Admin,
        })
        .await
        .map_err(AppError::from)?;

    tracing::info!(user_id = %admin.id_string(), email = %admin.email, "Admin account created");
    Ok((StatusCode::CREATED, Json(auth_response(admin, None))))
}

fn issue_token(state: &ServerState, user: &User) -> AppResult<String> {
    state
        .jwt_service
        .generate_token(&user.id_string(), &user.email, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))
}

fn auth_response(user: User, token: Option<String>) -> AuthResponse {
    AuthResponse {
        id: user.id_string(),
        is_admin: user.role.is_admin(),
        role: user.role.to_string(),
        name: user.name,
        email: user.email,
        token,
    }
}

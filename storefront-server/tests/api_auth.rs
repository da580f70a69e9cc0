//! Identity issuance and verification through the full router

mod common;

use axum::http::StatusCode;
use serde_json::json;
use storefront_server::db::models::Role;

use common::*;

#[tokio::test]
async fn register_then_login_and_read_profile() {
    let state = test_state().await;

    let res = request(
        &state,
        post_json(
            "/api/auth/register",
            None,
            &json!({"name": "Jo", "email": "jo@example.com", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["name"], "Jo");
    assert_eq!(body["email"], "jo@example.com");
    assert_eq!(body["isAdmin"], false);
    assert_eq!(body["role"], "user");
    assert!(body["_id"].as_str().unwrap().starts_with("user:"));
    assert!(body["token"].is_string());

    let res = request(
        &state,
        post_json(
            "/api/auth/login",
            None,
            &json!({"email": "jo@example.com", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let token = body_json(res).await["token"].as_str().unwrap().to_string();

    let res = request(&state, get("/api/users/profile", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = body_json(res).await;
    assert_eq!(profile["name"], "Jo");
    assert_eq!(profile["email"], "jo@example.com");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let state = test_state().await;
    let payload = json!({"name": "Jo", "email": "jo@example.com", "password": "secret123"});

    let first = request(&state, post_json("/api/auth/register", None, &payload)).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = request(&state, post_json("/api/auth/register", None, &payload)).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["message"], "User already exists");
}

#[tokio::test]
async fn invalid_registration_payload_is_rejected() {
    let state = test_state().await;

    let res = request(
        &state,
        post_json(
            "/api/auth/register",
            None,
            &json!({"name": "Jo", "email": "not-an-email", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = request(
        &state,
        post_json(
            "/api/auth/register",
            None,
            &json!({"name": "Jo", "email": "jo@example.com", "password": "shrt"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_yields_401_invalid_credentials() {
    let state = test_state().await;
    seed_customer(&state).await;

    let res = request(
        &state,
        post_json(
            "/api/auth/login",
            None,
            &json!({"email": "casey@example.com", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Invalid credentials");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn protected_routes_reject_missing_and_stale_tokens() {
    let state = test_state().await;

    // no token at all
    let res = request(&state, get("/api/orders/myorders", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["message"], "Not authorized, no token");

    // a valid signature whose subject does not exist anymore
    let ghost = state
        .jwt_service
        .generate_token("user:gone", "gone@example.com", "user")
        .unwrap();
    let res = request(&state, get("/api/orders/myorders", Some(&ghost))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res).await["message"],
        "Not authorized, token failed"
    );

    // garbage token
    let res = request(&state, get("/api/orders/myorders", Some("nonsense"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_creation_is_gated_on_the_admin_role() {
    let state = test_state().await;
    let (_, admin_token) = seed_admin(&state).await;
    let (_, user_token) = seed_customer(&state).await;

    let payload = json!({"name": "Root", "email": "root@example.com", "password": "secret123"});

    let res = request(
        &state,
        post_json("/api/auth/admin/create", Some(&user_token), &payload),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(res).await["message"], "Admin access required");

    let res = request(
        &state,
        post_json("/api/auth/admin/create", Some(&admin_token), &payload),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["isAdmin"], true);
    // admin creation hands out no token
    assert!(body.get("token").is_none());

    // the new admin can log in with the chosen credentials
    let res = request(
        &state,
        post_json(
            "/api/auth/login",
            None,
            &json!({"email": "root@example.com", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["role"], "admin");
}

#[tokio::test]
async fn role_survives_in_the_database_not_the_token() {
    let state = test_state().await;
    // a token claiming "admin" for a plain user must not pass the gate
    let (id, _) = seed_user(&state, "Mal", "mal@example.com", "password1", Role::User).await;
    let forged = state
        .jwt_service
        .generate_token(&id, "mal@example.com", "admin")
        .unwrap();

    let res = request(&state, get("/api/orders", Some(&forged))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

//! Shared helpers for the API integration tests
//!
//! Each test builds a fresh in-memory database, seeds it through the
//! repositories and drives the full router (auth middleware included)
//! through `Server::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;

use storefront_server::db::DbService;
use storefront_server::db::models::{ProductCreate, Role, UserCreate};
use storefront_server::db::repository::{ProductRepository, UserRepository};
use storefront_server::{Config, Server, ServerState};

/// Fresh server state over an in-memory database
pub async fn test_state() -> ServerState {
    let db = DbService::memory().await.expect("in-memory db");
    let config = Config::with_overrides("target/test-work", 0);
    ServerState::with_db(config, db.db)
}

/// Dispatch a request against the full router
pub async fn request(state: &ServerState, req: Request<Body>) -> Response<Body> {
    Server::oneshot(state.clone(), req).await
}

pub fn get(path: &str, token: Option<&str>) -> Request<Body> {
    builder("GET", path, token).body(Body::empty()).expect("request")
}

pub fn delete(path: &str, token: Option<&str>) -> Request<Body> {
    builder("DELETE", path, token)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    json_request("POST", path, token, body)
}

pub fn put_json(path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    json_request("PUT", path, token, body)
}

fn json_request(method: &str, path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    builder(method, path, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn builder(method: &str, path: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

/// Read and parse a JSON response body
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Create a user directly in the store; returns (record id, bearer token)
pub async fn seed_user(
    state: &ServerState,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> (String, String) {
    let users = UserRepository::new(state.get_db());
    let user = users
        .create(UserCreate {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        })
        .await
        .expect("seed user");

    let id = user.id_string();
    let token = state
        .jwt_service
        .generate_token(&id, &user.email, user.role.as_str())
        .expect("token");
    (id, token)
}

pub async fn seed_admin(state: &ServerState) -> (String, String) {
    seed_user(state, "Admin", "admin@example.com", "adminpass1", Role::Admin).await
}

pub async fn seed_customer(state: &ServerState) -> (String, String) {
    seed_user(state, "Casey", "casey@example.com", "customer1", Role::User).await
}

/// Create a product directly in the store; returns its record id
pub async fn seed_product(
    state: &ServerState,
    name: &str,
    category: &str,
    price: f64,
    count_in_stock: i32,
) -> String {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(ProductCreate {
            name: name.to_string(),
            brand: Some("Generic".to_string()),
            category: Some(category.to_string()),
            description: None,
            price,
            count_in_stock,
            image: String::new(),
        })
        .await
        .expect("seed product");
    product.id.expect("product id").to_string()
}

/// Current stock level straight from the store
pub async fn stock_of(state: &ServerState, product_id: &str) -> i32 {
    let repo = ProductRepository::new(state.get_db());
    repo.find_by_id(product_id)
        .await
        .expect("find product")
        .expect("product exists")
        .count_in_stock
}

//! Catalog listing, filtering, pagination and admin product management

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use shared::response::{X_PAGE, X_PAGE_SIZE, X_TOTAL_COUNT, X_TOTAL_PAGES};

use common::*;

#[tokio::test]
async fn pagination_metadata_travels_in_headers() {
    let state = test_state().await;
    for i in 0..10 {
        seed_product(&state, &format!("Chair {i:02}"), "Furniture", 10.0, 5).await;
    }

    let res = request(&state, get("/api/products?page=2&limit=8", None)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let headers = res.headers().clone();
    assert_eq!(headers.get(X_TOTAL_COUNT).unwrap(), "10");
    assert_eq!(headers.get(X_PAGE).unwrap(), "2");
    assert_eq!(headers.get(X_PAGE_SIZE).unwrap(), "8");
    // ceil(10 / 8) = 2
    assert_eq!(headers.get(X_TOTAL_PAGES).unwrap(), "2");

    // page 2 holds exactly min(8, 10 - 8) items
    let body = body_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn keyword_matches_name_case_insensitively() {
    let state = test_state().await;
    seed_product(&state, "Walnut Desk", "Furniture", 120.0, 3).await;
    seed_product(&state, "Office Chair", "Furniture", 80.0, 3).await;

    let res = request(&state, get("/api/products?keyword=wAlNuT", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Walnut Desk");
}

#[tokio::test]
async fn category_filter_supports_multiple_labels_and_all() {
    let state = test_state().await;
    seed_product(&state, "Desk", "Furniture", 120.0, 3).await;
    seed_product(&state, "Mug", "Kitchen", 9.0, 30).await;
    seed_product(&state, "Cable", "Electronics", 4.0, 100).await;

    let res = request(
        &state,
        get("/api/products?categories=Furniture&categories=Kitchen", None),
    )
    .await;
    let body = body_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // "All" disables the filter entirely
    let res = request(&state, get("/api/products?categories=All", None)).await;
    let body = body_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn sort_spec_orders_results() {
    let state = test_state().await;
    seed_product(&state, "Cheap", "Misc", 1.0, 1).await;
    seed_product(&state, "Pricey", "Misc", 99.0, 1).await;
    seed_product(&state, "Middle", "Misc", 50.0, 1).await;

    let res = request(&state, get("/api/products?sortBy=-price", None)).await;
    let body = body_json(res).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pricey", "Middle", "Cheap"]);
}

#[tokio::test]
async fn categories_endpoint_lists_distinct_labels() {
    let state = test_state().await;
    seed_product(&state, "Desk", "Furniture", 120.0, 3).await;
    seed_product(&state, "Chair", "Furniture", 60.0, 3).await;
    seed_product(&state, "Mug", "Kitchen", 9.0, 30).await;

    let res = request(&state, get("/api/products/categories", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body, json!(["Furniture", "Kitchen"]));
}

#[tokio::test]
async fn missing_product_is_404() {
    let state = test_state().await;
    let res = request(&state, get("/api/products/product:doesnotexist", None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["message"], "Product not found");
}

fn multipart_create(token: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "x-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn product_creation_is_admin_only_multipart() {
    let state = test_state().await;
    let (_, admin_token) = seed_admin(&state).await;
    let (_, user_token) = seed_customer(&state).await;

    let fields = [
        ("name", "Walnut Desk"),
        ("price", "129.99"),
        ("countInStock", "4"),
        ("category", "Furniture"),
    ];

    let res = request(&state, multipart_create(&user_token, &fields)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = request(&state, multipart_create(&admin_token, &fields)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["name"], "Walnut Desk");
    assert_eq!(body["price"], 129.99);
    assert_eq!(body["countInStock"], 4);
    assert_eq!(body["category"], "Furniture");
    // unset fields get their defaults
    assert_eq!(body["brand"], "Generic");

    // the new product is publicly readable
    let id = body["_id"].as_str().unwrap();
    let res = request(&state, get(&format!("/api/products/{id}"), None)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_creation_requires_name_and_price() {
    let state = test_state().await;
    let (_, admin_token) = seed_admin(&state).await;

    let res = request(
        &state,
        multipart_create(&admin_token, &[("countInStock", "4")]),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await["message"],
        "Name and price are required"
    );
}

#[tokio::test]
async fn update_and_delete_products() {
    let state = test_state().await;
    let (_, admin_token) = seed_admin(&state).await;
    let id = seed_product(&state, "Desk", "Furniture", 120.0, 3).await;

    let res = request(
        &state,
        put_json(
            &format!("/api/products/{id}"),
            Some(&admin_token),
            &json!({"price": 99.5, "countInStock": 7}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["price"], 99.5);
    assert_eq!(body["countInStock"], 7);
    // untouched fields survive
    assert_eq!(body["name"], "Desk");

    let res = request(
        &state,
        delete(&format!("/api/products/{id}"), Some(&admin_token)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["message"], "Product removed");

    let res = request(&state, get(&format!("/api/products/{id}"), None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_endpoint_returns_json_404() {
    let state = test_state().await;
    let res = request(&state, get("/api/nope", Some("x"))).await;
    // the fallback is outside /api auth? No: /api/nope requires a token;
    // garbage tokens are rejected before routing
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = request(&state, get("/definitely-not-here", None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["error"], "Endpoint not found");
}

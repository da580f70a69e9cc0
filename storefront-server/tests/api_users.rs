//! Admin customer management and profile access

mod common;

use axum::http::StatusCode;
use serde_json::json;
use storefront_server::db::models::Role;

use common::*;

#[tokio::test]
async fn customer_listing_attaches_order_aggregates() {
    let state = test_state().await;
    let (_, admin_token) = seed_admin(&state).await;
    let (casey_id, casey_token) = seed_customer(&state).await;
    seed_user(&state, "Riley", "riley@example.com", "password1", Role::User).await;
    let desk = seed_product(&state, "Desk", "Furniture", 100.0, 10).await;

    for total in [120.5, 80.25] {
        let res = request(
            &state,
            post_json(
                "/api/orders",
                Some(&casey_token),
                &json!({
                    "orderItems": [{"name": "Desk", "qty": 1, "image": "", "price": 100.0, "product": desk}],
                    "shippingAddress": {"address": "1 Main St", "city": "Lisbon", "postalCode": "1000", "country": "PT"},
                    "taxPrice": 0.0,
                    "shippingPrice": 0.0,
                    "totalPrice": total,
                }),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = request(&state, get("/api/users", Some(&admin_token))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    let customers = body.as_array().unwrap();
    assert_eq!(customers.len(), 3);

    let casey = customers
        .iter()
        .find(|c| c["_id"] == casey_id.as_str())
        .unwrap();
    assert_eq!(casey["totalOrders"], 2);
    assert_eq!(casey["totalSpent"], 200.75);
    assert_eq!(casey["role"], "user");

    let riley = customers
        .iter()
        .find(|c| c["email"] == "riley@example.com")
        .unwrap();
    assert_eq!(riley["totalOrders"], 0);
    assert_eq!(riley["totalSpent"], 0.0);
}

#[tokio::test]
async fn customer_listing_is_admin_only() {
    let state = test_state().await;
    let (_, user_token) = seed_customer(&state).await;

    let res = request(&state, get("/api/users", Some(&user_token))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = request(&state, get("/api/users/profile", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_updates_customer_details() {
    let state = test_state().await;
    let (_, admin_token) = seed_admin(&state).await;
    let (casey_id, _) = seed_customer(&state).await;

    let res = request(
        &state,
        put_json(
            &format!("/api/users/{casey_id}"),
            Some(&admin_token),
            &json!({"name": "Casey Q.", "email": "casey.q@example.com"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["name"], "Casey Q.");
    assert_eq!(body["email"], "casey.q@example.com");
    assert!(body["createdAt"].is_string());

    // partial update leaves the other field alone
    let res = request(
        &state,
        put_json(
            &format!("/api/users/{casey_id}"),
            Some(&admin_token),
            &json!({"name": "Casey"}),
        ),
    )
    .await;
    let body = body_json(res).await;
    assert_eq!(body["name"], "Casey");
    assert_eq!(body["email"], "casey.q@example.com");

    let res = request(
        &state,
        put_json(
            "/api/users/user:missing",
            Some(&admin_token),
            &json!({"name": "Nobody"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["message"], "User not found");
}

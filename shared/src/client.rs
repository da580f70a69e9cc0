//! Request/response DTOs for API communication
//!
//! Common request and response types shared between the server and clients.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{OrderItem, ShippingAddress};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request; also the payload for admin creation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Identity payload returned by register/login/admin-create.
///
/// `isAdmin` is a derived view of the role enum kept for client
/// compatibility; the stored role is the single source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Checkout payload. Items and totals are caller-computed; the server
/// validates stock but does not re-derive the prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub tax_price: f64,
    #[serde(default)]
    pub shipping_price: f64,
    #[serde(default)]
    pub total_price: f64,
}

/// Full replacement list for an order's items (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemsUpdateRequest {
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// Partial removal of line items by product reference (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemsRequest {
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// Monthly aggregate row for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String,
    pub sales: f64,
    pub count: i64,
}

/// Top-selling product row for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub qty: i64,
}

/// Order statistics response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatsResponse {
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: f64,
    pub monthly_sales: Vec<MonthlySales>,
    pub top_products: Vec<TopProduct>,
}

// =============================================================================
// Product / Customer API DTOs
// =============================================================================

/// Product JSON update payload (`PUT /api/products/:id`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub count_in_stock: Option<i32>,
    pub image: Option<String>,
}

/// Admin customer update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

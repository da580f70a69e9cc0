//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type ProductId = RecordId;

/// Product document.
///
/// `count_in_stock` is guarded non-negative on the order create path; the
/// admin item-replacement path deducts without validation and may drive it
/// negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub count_in_stock: i32,
    #[serde(default)]
    pub image: String,
    /// Review aggregates, stored but not maintained by any operation
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payload, assembled from the multipart form
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub count_in_stock: i32,
    /// Already-stored image URL path (empty when no file was uploaded)
    pub image: String,
}

/// Update payload; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub count_in_stock: Option<i32>,
    pub image: Option<String>,
}

impl From<shared::client::ProductUpdateRequest> for ProductUpdate {
    fn from(req: shared::client::ProductUpdateRequest) -> Self {
        Self {
            name: req.name,
            brand: req.brand,
            category: req.category,
            description: req.description,
            price: req.price,
            count_in_stock: req.count_in_stock,
            image: req.image,
        }
    }
}

impl From<Product> for shared::models::Product {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.map(|id| id.to_string()).unwrap_or_default(),
            name: p.name,
            brand: p.brand,
            category: p.category,
            description: p.description,
            price: p.price,
            count_in_stock: p.count_in_stock,
            image: p.image,
            rating: p.rating,
            num_reviews: p.num_reviews,
            created_at: millis_to_datetime(p.created_at),
            updated_at: millis_to_datetime(p.updated_at),
        }
    }
}

/// Unix millis to UTC datetime; out-of-range values collapse to the epoch
pub(crate) fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

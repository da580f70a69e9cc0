//! Order API model
//!
//! Line items are immutable snapshots taken at order time. The `product`
//! field on an item is a weak reference used only for stock reconciliation,
//! never for re-deriving displayed values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Line item snapshot embedded in an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub qty: i32,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    /// Weak reference to the source product (`product:<id>`)
    pub product: String,
}

/// Shipping address embedded in an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Owning user reference, populated to different depths per endpoint
/// (id-only on the caller's own listings, id+name on the admin listing,
/// id+name+email on the detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Order as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: OrderUser,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub is_delivered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_serializes_with_mongo_style_field_names() {
        let order = Order {
            id: "order:abc".into(),
            user: OrderUser {
                id: "user:u1".into(),
                name: None,
                email: None,
            },
            order_items: vec![OrderItem {
                name: "Mug".into(),
                qty: 2,
                image: String::new(),
                price: 9.5,
                product: "product:p1".into(),
            }],
            shipping_address: ShippingAddress {
                address: "1 Main St".into(),
                city: "Lisbon".into(),
                postal_code: "1000-001".into(),
                country: "PT".into(),
            },
            tax_price: 1.9,
            shipping_price: 0.0,
            total_price: 20.9,
            is_delivered: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["_id"], "order:abc");
        assert_eq!(json["user"]["_id"], "user:u1");
        assert_eq!(json["orderItems"][0]["qty"], 2);
        assert_eq!(json["shippingAddress"]["postalCode"], "1000-001");
        assert_eq!(json["isDelivered"], false);
        // unpopulated user fields are omitted entirely
        assert!(json["user"].get("name").is_none());
    }
}

//! Order Model
//!
//! Orders embed an immutable snapshot of each line item (name/qty/image/
//! price at order time) plus a weak reference to the source product used
//! only for stock reconciliation. Deleting a product does not touch
//! historical orders.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::product::millis_to_datetime;
use super::serde_helpers;

pub type OrderId = RecordId;

/// Line item snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub qty: i32,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
}

/// Embedded shipping address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    /// Owning user (non-owning reference)
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub tax_price: f64,
    #[serde(default)]
    pub shipping_price: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub is_delivered: bool,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<OrderItem> for shared::models::OrderItem {
    fn from(item: OrderItem) -> Self {
        Self {
            name: item.name,
            qty: item.qty,
            image: item.image,
            price: item.price,
            product: item.product.to_string(),
        }
    }
}

impl From<ShippingAddress> for shared::models::ShippingAddress {
    fn from(addr: ShippingAddress) -> Self {
        Self {
            address: addr.address,
            city: addr.city,
            postal_code: addr.postal_code,
            country: addr.country,
        }
    }
}

impl From<shared::models::ShippingAddress> for ShippingAddress {
    fn from(addr: shared::models::ShippingAddress) -> Self {
        Self {
            address: addr.address,
            city: addr.city,
            postal_code: addr.postal_code,
            country: addr.country,
        }
    }
}

impl Order {
    /// API view with the owning user populated to the requested depth
    pub fn into_shared(self, user: shared::models::OrderUser) -> shared::models::Order {
        shared::models::Order {
            id: self.id.map(|id| id.to_string()).unwrap_or_default(),
            user,
            order_items: self.order_items.into_iter().map(Into::into).collect(),
            shipping_address: self.shipping_address.into(),
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            is_delivered: self.is_delivered,
            created_at: millis_to_datetime(self.created_at),
            updated_at: millis_to_datetime(self.updated_at),
        }
    }

    /// API view carrying only the owner's id (unpopulated reference)
    pub fn into_shared_bare(self) -> shared::models::Order {
        let user = shared::models::OrderUser {
            id: self.user.to_string(),
            name: None,
            email: None,
        };
        self.into_shared(user)
    }
}

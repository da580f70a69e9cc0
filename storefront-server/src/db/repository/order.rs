//! Order Repository
//!
//! Single-record order access. The multi-record mutations (create, item
//! replacement, deletion - anything that also touches product stock) go
//! through the order processor, which runs them as one transaction.

use super::{BaseRepository, RepoError, RepoResult, now_millis};
use crate::db::models::{Order, OrderId, OrderItem};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let Ok(record_id) = id.parse::<OrderId>() else {
            return Ok(None);
        };
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// All orders, newest first (admin listing and stats)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders owned by one user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Flip/assign the delivered flag
    pub async fn set_delivered(&self, id: &str, delivered: bool) -> RepoResult<Order> {
        let record_id: OrderId = id
            .parse()
            .map_err(|_| RepoError::NotFound("Order not found".to_string()))?;

        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $id SET is_delivered = $delivered, updated_at = $now RETURN AFTER")
            .bind(("id", record_id))
            .bind(("delivered", delivered))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;

        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Overwrite the item list only; totals and stock are left untouched
    /// (the partial-removal path is deliberately asymmetric to deletion)
    pub async fn update_items(&self, id: &str, items: &[OrderItem]) -> RepoResult<Order> {
        let record_id: OrderId = id
            .parse()
            .map_err(|_| RepoError::NotFound("Order not found".to_string()))?;

        let items_value = serde_json::to_value(items)
            .map_err(|e| RepoError::Database(format!("Failed to serialize items: {e}")))?;

        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $id SET order_items = $items, updated_at = $now RETURN AFTER")
            .bind(("id", record_id))
            .bind(("items", items_value))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;

        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }
}

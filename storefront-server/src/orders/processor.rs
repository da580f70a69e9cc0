//! Order Processor
//!
//! The one place where multiple records - an order plus several products -
//! must stay consistent. Every mutating path here runs as a single SurrealDB
//! transaction: a failure anywhere rolls the whole operation back, and the
//! create path re-checks stock inside the transaction so two concurrent
//! submissions cannot both pass the availability check and oversell.
//!
//! Two asymmetries are kept on purpose, matching the system's observable
//! behavior:
//! - item replacement restores then deducts stock WITHOUT validating that
//!   the replacement quantities fit, so it may drive stock negative;
//! - partial item removal drops line items without restoring stock and
//!   without recomputing totals.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::client::OrderCreateRequest;

use crate::db::models::{Order, OrderId, OrderItem, ProductId};
use crate::db::repository::{OrderRepository, ProductRepository, now_millis};
use crate::utils::{AppError, AppResult};

pub struct OrderProcessor {
    db: Surreal<Db>,
}

impl OrderProcessor {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    fn products(&self) -> ProductRepository {
        ProductRepository::new(self.db.clone())
    }

    /// Create path: validate availability in full, then persist the order
    /// and decrement stock in one transaction.
    ///
    /// The caller-supplied items, address and totals are embedded verbatim;
    /// nothing is recomputed server-side at creation.
    pub async fn place_order(
        &self,
        user_id: &str,
        req: OrderCreateRequest,
    ) -> AppResult<Order> {
        if req.order_items.is_empty() {
            return Err(AppError::validation("No order items"));
        }

        let owner: surrealdb::RecordId = user_id
            .parse()
            .map_err(|_| AppError::internal(format!("Invalid user reference: {user_id}")))?;

        // Validation pass, in full, before any mutation
        let products = self.products();
        let mut lines: Vec<(ProductId, i32, String)> = Vec::with_capacity(req.order_items.len());
        for item in &req.order_items {
            if item.qty <= 0 {
                return Err(AppError::validation(format!(
                    "Invalid quantity for {}",
                    item.name
                )));
            }
            let product_id: ProductId = item
                .product
                .parse()
                .map_err(|_| AppError::not_found(format!("Product not found: {}", item.name)))?;
            let product = products
                .find_by_record(&product_id)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::not_found(format!("Product not found: {}", item.name)))?;
            if product.count_in_stock < item.qty {
                return Err(AppError::validation(format!(
                    "Not enough stock for {}",
                    product.name
                )));
            }
            lines.push((product_id, item.qty, product.name));
        }

        let now = now_millis();
        let order = Order {
            id: None,
            user: owner,
            order_items: req
                .order_items
                .iter()
                .zip(lines.iter())
                .map(|(item, (product_id, _, _))| OrderItem {
                    name: item.name.clone(),
                    qty: item.qty,
                    image: item.image.clone(),
                    price: item.price,
                    product: product_id.clone(),
                })
                .collect(),
            shipping_address: req.shipping_address.into(),
            tax_price: req.tax_price,
            shipping_price: req.shipping_price,
            total_price: req.total_price,
            is_delivered: false,
            created_at: now,
            updated_at: now,
        };
        let order_value = serde_json::to_value(&order)
            .map_err(|e| AppError::internal(format!("Failed to serialize order: {e}")))?;

        // One transaction: per-item guard + decrement, then the order write.
        // The guards re-check stock under the transaction so the earlier
        // read-validate pass cannot be raced into an oversell.
        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..lines.len() {
            sql.push_str(&format!(
                "IF $p{i}.count_in_stock < $q{i} {{ THROW $e{i} }};\n\
                 UPDATE $p{i} SET count_in_stock -= $q{i};\n"
            ));
        }
        sql.push_str("CREATE order CONTENT $order;\nCOMMIT TRANSACTION;");

        let mut query = self.db.query(sql).bind(("order", order_value));
        for (i, (product_id, qty, name)) in lines.iter().enumerate() {
            query = query
                .bind((format!("p{i}"), product_id.clone()))
                .bind((format!("q{i}"), *qty))
                .bind((format!("e{i}"), format!("Not enough stock for {name}")));
        }

        let response = query.await.map_err(stock_guard_error)?;
        let mut response = response.check().map_err(stock_guard_error)?;
        let last = response.num_statements().saturating_sub(1);
        let created: Option<Order> = response
            .take(last)
            .map_err(|e| AppError::database(e.to_string()))?;

        created.ok_or_else(|| AppError::database("Failed to create order"))
    }

    /// Admin item replacement: restore stock for the existing items, deduct
    /// for the replacement list, recompute totals (10% tax, zero shipping)
    /// and overwrite the order - all in one transaction. Replacement
    /// quantities are NOT validated against remaining stock.
    pub async fn replace_items(
        &self,
        order_id: &str,
        new_items: Vec<shared::models::OrderItem>,
    ) -> AppResult<Order> {
        let order = self
            .orders()
            .find_by_id(order_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Order not found"))?;
        let record_id: OrderId = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record without id"))?;

        let mut replacement: Vec<OrderItem> = Vec::with_capacity(new_items.len());
        for item in &new_items {
            let product_id: ProductId = item.product.parse().map_err(|_| {
                AppError::validation(format!("Invalid product reference: {}", item.product))
            })?;
            replacement.push(OrderItem {
                name: item.name.clone(),
                qty: item.qty,
                image: item.image.clone(),
                price: item.price,
                product: product_id,
            });
        }

        let (tax_price, total_price) = replacement_totals(&replacement)?;
        let items_value = serde_json::to_value(&replacement)
            .map_err(|e| AppError::internal(format!("Failed to serialize items: {e}")))?;

        // Restoration first, then deduction, then the order overwrite
        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..order.order_items.len() {
            sql.push_str(&format!("UPDATE $r{i} SET count_in_stock += $rq{i};\n"));
        }
        for i in 0..replacement.len() {
            sql.push_str(&format!("UPDATE $d{i} SET count_in_stock -= $dq{i};\n"));
        }
        sql.push_str(
            "UPDATE $id SET order_items = $items, tax_price = $tax, \
             shipping_price = 0.0, total_price = $total, updated_at = $now RETURN AFTER;\n\
             COMMIT TRANSACTION;",
        );

        let mut query = self
            .db
            .query(sql)
            .bind(("id", record_id))
            .bind(("items", items_value))
            .bind(("tax", tax_price))
            .bind(("total", total_price))
            .bind(("now", now_millis()));
        for (i, item) in order.order_items.iter().enumerate() {
            query = query
                .bind((format!("r{i}"), item.product.clone()))
                .bind((format!("rq{i}"), item.qty));
        }
        for (i, item) in replacement.iter().enumerate() {
            query = query
                .bind((format!("d{i}"), item.product.clone()))
                .bind((format!("dq{i}"), item.qty));
        }

        let response = query.await.map_err(|e| AppError::database(e.to_string()))?;
        let mut response = response
            .check()
            .map_err(|e| AppError::database(e.to_string()))?;
        let last = response.num_statements().saturating_sub(1);
        let updated: Option<Order> = response
            .take(last)
            .map_err(|e| AppError::database(e.to_string()))?;

        updated.ok_or_else(|| AppError::not_found("Order not found"))
    }

    /// Deletion: restore every item's stock, then remove the order record,
    /// in one transaction.
    pub async fn delete_order(&self, order_id: &str) -> AppResult<()> {
        let order = self
            .orders()
            .find_by_id(order_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Order not found"))?;
        let record_id: OrderId = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record without id"))?;

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..order.order_items.len() {
            sql.push_str(&format!("UPDATE $r{i} SET count_in_stock += $rq{i};\n"));
        }
        sql.push_str("DELETE $id;\nCOMMIT TRANSACTION;");

        let mut query = self.db.query(sql).bind(("id", record_id));
        for (i, item) in order.order_items.iter().enumerate() {
            query = query
                .bind((format!("r{i}"), item.product.clone()))
                .bind((format!("rq{i}"), item.qty));
        }

        query
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .check()
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(())
    }

    /// Partial item removal: drop line items whose product reference is in
    /// the given set. Stock is NOT restored and totals are NOT recomputed.
    pub async fn remove_items(
        &self,
        order_id: &str,
        product_ids: &[String],
    ) -> AppResult<Order> {
        if product_ids.is_empty() {
            return Err(AppError::validation("No product IDs provided"));
        }

        let order = self
            .orders()
            .find_by_id(order_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        let remaining: Vec<OrderItem> = order
            .order_items
            .into_iter()
            .filter(|item| !product_ids.contains(&item.product.to_string()))
            .collect();

        self.orders()
            .update_items(order_id, &remaining)
            .await
            .map_err(AppError::from)
    }
}

/// Totals for the replacement path: 10% tax on the item sum, zero shipping.
/// Computed with decimal arithmetic and rounded half-up to 2 places, then
/// stored as f64.
fn replacement_totals(items: &[OrderItem]) -> AppResult<(f64, f64)> {
    let mut sum = Decimal::ZERO;
    for item in items {
        let price = Decimal::from_f64(item.price)
            .ok_or_else(|| AppError::validation(format!("Invalid price for {}", item.name)))?;
        sum += price * Decimal::from(item.qty);
    }

    let tax = (sum * Decimal::new(1, 1))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total = (sum * Decimal::new(11, 1))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok((
        tax.to_f64().unwrap_or_default(),
        total.to_f64().unwrap_or_default(),
    ))
}

/// Stock guards surface as thrown errors from inside the transaction; map
/// them back to the client-facing validation message.
fn stock_guard_error(e: surrealdb::Error) -> AppError {
    let msg = e.to_string();
    match extract_stock_error(&msg) {
        Some(message) => AppError::validation(message),
        None => AppError::database(msg),
    }
}

fn extract_stock_error(msg: &str) -> Option<String> {
    msg.find("Not enough stock for")
        .map(|idx| msg[idx..].trim_end_matches(['"', '\'', '`', '.']).to_string())
}

//! Order API Handlers

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Deserialize;

use shared::client::{
    MonthlySales, OrderCreateRequest, OrderItemsUpdateRequest, OrderStatsResponse,
    RemoveItemsRequest, TopProduct,
};
use shared::models::{Order as SharedOrder, OrderUser};
use shared::response::MessageBody;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::models::product::millis_to_datetime;
use crate::db::repository::{OrderRepository, UserRepository};
use crate::orders::OrderProcessor;
use crate::utils::{AppError, AppResult};

/// POST /api/orders - checkout
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<OrderCreateRequest>,
) -> AppResult<(StatusCode, Json<SharedOrder>)> {
    let processor = OrderProcessor::new(state.get_db());
    let order = processor.place_order(&user.id, req).await?;

    tracing::info!(
        order_id = %order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        user_id = %user.id,
        total = order.total_price,
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(order.into_shared_bare())))
}

/// GET /api/orders/myorders - the caller's orders
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<SharedOrder>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_user(&user.id).await.map_err(AppError::from)?;
    Ok(Json(
        orders.into_iter().map(Order::into_shared_bare).collect(),
    ))
}

/// GET /api/orders/:id - owner or admin only
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<SharedOrder>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.user.to_string() != user.id && !user.is_admin() {
        return Err(AppError::forbidden("Not authorized to view this order"));
    }

    // Detail view populates the owner with name and email
    let users = UserRepository::new(state.get_db());
    let owner = users
        .find_by_id(&order.user.to_string())
        .await
        .map_err(AppError::from)?;
    let order_user = OrderUser {
        id: order.user.to_string(),
        name: owner.as_ref().map(|u| u.name.clone()),
        email: owner.as_ref().map(|u| u.email.clone()),
    };

    Ok(Json(order.into_shared(order_user)))
}

/// GET /api/orders - all orders with owner names populated (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SharedOrder>>> {
    let orders = OrderRepository::new(state.get_db())
        .find_all()
        .await
        .map_err(AppError::from)?;

    let users = UserRepository::new(state.get_db())
        .find_all()
        .await
        .map_err(AppError::from)?;
    let names: HashMap<String, String> = users
        .into_iter()
        .map(|u| (u.id_string(), u.name))
        .collect();

    let result = orders
        .into_iter()
        .map(|order| {
            let id = order.user.to_string();
            let order_user = OrderUser {
                name: names.get(&id).cloned(),
                email: None,
                id,
            };
            order.into_shared(order_user)
        })
        .collect();

    Ok(Json(result))
}

/// DELETE /api/orders/:id - delete and restore stock (admin)
pub async fn delete_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    let processor = OrderProcessor::new(state.get_db());
    processor.delete_order(&id).await?;

    Ok(Json(MessageBody::new("Order deleted")))
}

/// PUT /api/orders/:id/deliver - flip the delivered flag (admin)
pub async fn toggle_delivered(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SharedOrder>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let updated = repo
        .set_delivered(&id, !order.is_delivered)
        .await
        .map_err(AppError::from)?;

    Ok(Json(updated.into_shared_bare()))
}

/// PUT /api/orders/:id/items - replace the item list, reconcile stock and
/// recompute totals (admin)
pub async fn replace_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<OrderItemsUpdateRequest>,
) -> AppResult<Json<SharedOrder>> {
    let processor = OrderProcessor::new(state.get_db());
    let order = processor.replace_items(&id, req.order_items).await?;
    Ok(Json(order.into_shared_bare()))
}

/// PUT /api/orders/:id/items/remove - drop line items by product reference;
/// stock and totals stay as they are (admin)
pub async fn remove_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<RemoveItemsRequest>,
) -> AppResult<Json<SharedOrder>> {
    let processor = OrderProcessor::new(state.get_db());
    let order = processor.remove_items(&id, &req.product_ids).await?;
    Ok(Json(order.into_shared_bare()))
}

// =============================================================================
// Statistics
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub month: Option<String>,
}

/// GET /api/orders/stats?month=YYYY-MM - aggregate counts, revenue and the
/// top 5 products by quantity (admin)
pub async fn stats(
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<OrderStatsResponse>> {
    let orders = OrderRepository::new(state.get_db())
        .find_all()
        .await
        .map_err(AppError::from)?;

    let range = match query.month.as_deref().filter(|m| !m.is_empty()) {
        Some(month) => Some(month_range(month)?),
        None => None,
    };
    let selected: Vec<&Order> = orders
        .iter()
        .filter(|o| range.is_none_or(|(start, end)| o.created_at >= start && o.created_at < end))
        .collect();

    let total_orders = selected.len() as i64;
    let delivered_orders = selected.iter().filter(|o| o.is_delivered).count() as i64;
    let pending_orders = total_orders - delivered_orders;

    let mut revenue = Decimal::ZERO;
    let mut monthly: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    let mut quantities: HashMap<String, i64> = HashMap::new();

    for order in &selected {
        let total = Decimal::from_f64(order.total_price).unwrap_or_default();
        revenue += total;

        let month_key = millis_to_datetime(order.created_at)
            .format("%Y-%m")
            .to_string();
        let entry = monthly.entry(month_key).or_insert((Decimal::ZERO, 0));
        entry.0 += total;
        entry.1 += 1;

        for item in &order.order_items {
            *quantities.entry(item.name.clone()).or_insert(0) += i64::from(item.qty);
        }
    }

    let monthly_sales = monthly
        .into_iter()
        .map(|(month, (sales, count))| MonthlySales {
            month,
            sales: sales.round_dp(2).to_f64().unwrap_or_default(),
            count,
        })
        .collect();

    let mut top_products: Vec<TopProduct> = quantities
        .into_iter()
        .map(|(name, qty)| TopProduct { name, qty })
        .collect();
    // quantity descending, name as a deterministic tie-break
    top_products.sort_by(|a, b| b.qty.cmp(&a.qty).then_with(|| a.name.cmp(&b.name)));
    top_products.truncate(5);

    Ok(Json(OrderStatsResponse {
        total_orders,
        delivered_orders,
        pending_orders,
        total_revenue: revenue.round_dp(2).to_f64().unwrap_or_default(),
        monthly_sales,
        top_products,
    }))
}

/// Half-open Unix-millis range covering one YYYY-MM month
fn month_range(month: &str) -> AppResult<(i64, i64)> {
    let invalid = || AppError::validation("Invalid month format, expected YYYY-MM");

    let start =
        chrono::NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
    let end = if start.month() == 12 {
        chrono::NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        chrono::NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    }
    .ok_or_else(invalid)?;

    let to_millis = |d: chrono::NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default()
    };

    Ok((to_millis(start), to_millis(end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_range_is_half_open_and_handles_december() {
        let (start, end) = month_range("2025-12").unwrap();
        let start_dt = millis_to_datetime(start);
        let end_dt = millis_to_datetime(end);
        assert_eq!(start_dt.format("%Y-%m-%d").to_string(), "2025-12-01");
        assert_eq!(end_dt.format("%Y-%m-%d").to_string(), "2026-01-01");
        assert!(start < end);
    }

    #[test]
    fn malformed_month_is_rejected() {
        assert!(month_range("2025-13").is_err());
        assert!(month_range("yesterday").is_err());
    }
}

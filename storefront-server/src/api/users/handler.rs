//! User API Handlers
//!
//! Profile for the caller, customer listing/update for admins. The listing
//! attaches per-customer order aggregates (count and lifetime spend).

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use shared::client::CustomerUpdateRequest;
use shared::models::{Customer, CustomerUpdated, UserProfile};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserUpdate;
use crate::db::models::product::millis_to_datetime;
use crate::db::repository::{OrderRepository, UserRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/users/profile - the caller's own identity
pub async fn profile(user: CurrentUser) -> Json<UserProfile> {
    Json(UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}

/// GET /api/users - customers with computed order count/spend (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let users = UserRepository::new(state.get_db())
        .find_all()
        .await
        .map_err(AppError::from)?;
    let orders = OrderRepository::new(state.get_db())
        .find_all()
        .await
        .map_err(AppError::from)?;

    let mut totals: HashMap<String, (i64, Decimal)> = HashMap::new();
    for order in &orders {
        let entry = totals
            .entry(order.user.to_string())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += Decimal::from_f64(order.total_price).unwrap_or_default();
    }

    let customers = users
        .into_iter()
        .map(|user| {
            let id = user.id_string();
            let (total_orders, total_spent) =
                totals.get(&id).copied().unwrap_or((0, Decimal::ZERO));
            Customer {
                id,
                name: user.name,
                email: user.email,
                role: user.role.to_string(),
                total_orders,
                total_spent: total_spent.round_dp(2).to_f64().unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(customers))
}

/// PUT /api/users/:id - admin customer update (name/email)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<CustomerUpdateRequest>,
) -> AppResult<Json<CustomerUpdated>> {
    let repo = UserRepository::new(state.get_db());
    let updated = repo
        .update(
            &id,
            UserUpdate {
                name: req.name,
                email: req.email,
            },
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(CustomerUpdated {
        id: updated.id_string(),
        name: updated.name,
        email: updated.email,
        created_at: millis_to_datetime(updated.created_at),
    }))
}

//! Pre-order submission against accepted reservations.

use std::collections::HashMap;
use std::sync::Arc;

use rand::distr::Alphanumeric;
use rand::{rng, RngExt};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_database::repositories::{MenuRepository, OrderRepository, ReservationRepository};
use tablebook_entity::order::{NewOrderItem, Order, OrderItem};
use tablebook_entity::reservation::ReservationStatus;

use crate::context::RequestContext;

/// One requested line of a pre-order, before menu resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreOrderLine {
    /// The menu item requested.
    pub menu_item_id: Uuid,
    /// Quantity requested.
    pub quantity: i32,
}

/// Pre-order submission and retrieval.
#[derive(Debug, Clone)]
pub struct OrderService {
    /// Reservation repository, for ownership and status checks.
    reservations: Arc<ReservationRepository>,
    /// Menu repository, for price snapshots.
    menu: Arc<MenuRepository>,
    /// Order repository.
    orders: Arc<OrderRepository>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(
        reservations: Arc<ReservationRepository>,
        menu: Arc<MenuRepository>,
        orders: Arc<OrderRepository>,
    ) -> Self {
        Self {
            reservations,
            menu,
            orders,
        }
    }

    /// Submit a pre-order for an accepted reservation.
    ///
    /// Each line snapshots the menu price at submission time, so later
    /// menu edits never change the order. Unknown or unavailable items
    /// are skipped; an order with no resolvable line is rejected.
    pub async fn submit_pre_order(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        reservation_id: Uuid,
        lines: Vec<PreOrderLine>,
    ) -> AppResult<Order> {
        if lines.is_empty() {
            return Err(AppError::validation("Pre-order must contain at least one item"));
        }
        if lines.iter().any(|line| line.quantity < 1) {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }

        let reservation = self
            .reservations
            .find_by_id_for_user(reservation_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        if reservation.status != ReservationStatus::Accepted {
            return Err(AppError::conflict(format!(
                "Pre-orders can only be submitted for confirmed reservations. \
                 Current status: {}",
                reservation.status
            )));
        }

        let ids: Vec<Uuid> = lines.iter().map(|line| line.menu_item_id).collect();
        let prices: HashMap<Uuid, i64> = self
            .menu
            .find_available_by_ids(reservation.restaurant_id, &ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item.price_cents))
            .collect();

        let items: Vec<NewOrderItem> = lines
            .iter()
            .filter_map(|line| {
                prices.get(&line.menu_item_id).map(|price| NewOrderItem {
                    menu_item_id: line.menu_item_id,
                    quantity: line.quantity,
                    price_cents: *price,
                })
            })
            .collect();

        if items.is_empty() {
            return Err(AppError::validation("No valid menu items provided"));
        }

        let total_cents: i64 = items.iter().map(NewOrderItem::line_total).sum();
        let order_number = generate_order_number();

        let order = self
            .orders
            .create_with_items(reservation.id, &order_number, total_cents, &items)
            .await?;

        info!(
            trace_id = %ctx.trace_id,
            order_id = %order.id,
            reservation_id = %reservation.id,
            order_number = %order.order_number,
            total_cents,
            "Pre-order submitted"
        );

        Ok(order)
    }

    /// List the orders of a reservation, newest first.
    pub async fn orders_for_reservation(&self, reservation_id: Uuid) -> AppResult<Vec<Order>> {
        self.orders.find_by_reservation(reservation_id).await
    }

    /// List the line items of an order.
    pub async fn order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        self.orders.find_items(order_id).await
    }
}

/// Generate a human-readable order reference like `ORD-K7G2M9XA`.
fn generate_order_number() -> String {
    let suffix: String = rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("ORD-{}", suffix.to_uppercase())
}

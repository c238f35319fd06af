//! Pre-order repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_entity::order::{NewOrderItem, Order, OrderItem};

/// Repository for pre-orders and their line items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines in one transaction.
    pub async fn create_with_items(
        &self,
        reservation_id: Uuid,
        order_number: &str,
        total_cents: i64,
        items: &[NewOrderItem],
    ) -> AppResult<Order> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let order: Order = sqlx::query_as(
            "INSERT INTO orders (reservation_id, order_number, total_cents) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(reservation_id)
        .bind(order_number)
        .bind(total_cents)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create order", e))?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, menu_item_id, quantity, price_cents) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(item.menu_item_id)
            .bind(item.quantity)
            .bind(item.price_cents)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create order item", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit order", e)
        })?;

        Ok(order)
    }

    /// List the orders of a reservation, newest first.
    pub async fn find_by_reservation(&self, reservation_id: Uuid) -> AppResult<Vec<Order>> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE reservation_id = $1 ORDER BY created_at DESC",
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list orders", e))
    }

    /// List the line items of an order.
    pub async fn find_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list order items", e))
    }
}

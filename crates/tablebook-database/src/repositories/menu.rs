//! Menu item repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_entity::menu::MenuItem;

/// Repository for menu item lookups used by the pre-order flow.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    /// Create a new menu repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a set of item IDs to available items of one restaurant.
    ///
    /// IDs that are unknown, unavailable, or belong to another
    /// restaurant are silently absent from the result.
    pub async fn find_available_by_ids(
        &self,
        restaurant_id: Uuid,
        ids: &[Uuid],
    ) -> AppResult<Vec<MenuItem>> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items \
             WHERE restaurant_id = $1 AND is_available = TRUE AND id = ANY($2)",
        )
        .bind(restaurant_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve menu items", e))
    }

    /// Create a menu item.
    pub async fn create(
        &self,
        restaurant_id: Uuid,
        name: &str,
        price_cents: i64,
    ) -> AppResult<MenuItem> {
        sqlx::query_as::<_, MenuItem>(
            "INSERT INTO menu_items (restaurant_id, name, price_cents) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(restaurant_id)
        .bind(name)
        .bind(price_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create menu item", e))
    }
}

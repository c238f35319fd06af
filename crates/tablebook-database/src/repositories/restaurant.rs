//! Restaurant repository implementation.
//!
//! The engine only needs lookups of the booking flags; full profile
//! management is an external concern.

use sqlx::PgPool;
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_entity::restaurant::Restaurant;

/// Repository for restaurant lookups.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    /// Create a new restaurant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a restaurant by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Restaurant>> {
        sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find restaurant", e))
    }

    /// Create a restaurant row.
    pub async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        auto_accept: bool,
    ) -> AppResult<Restaurant> {
        sqlx::query_as::<_, Restaurant>(
            "INSERT INTO restaurants (owner_id, name, auto_accept) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(owner_id)
        .bind(name)
        .bind(auto_accept)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create restaurant", e))
    }
}

//! Time slot repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_entity::time_slot::{NewTimeSlot, TimeSlot, TimeSlotUpdate};

/// Repository for time slot CRUD and locking.
#[derive(Debug, Clone)]
pub struct TimeSlotRepository {
    pool: PgPool,
}

impl TimeSlotRepository {
    /// Create a new time slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a time slot by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>("SELECT * FROM time_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find time slot", e))
    }

    /// List the active slots of a restaurant, earliest first.
    pub async fn find_active_by_restaurant(&self, restaurant_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE restaurant_id = $1 AND is_active = TRUE \
             ORDER BY start_time ASC",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list time slots", e))
    }

    /// List every slot of a restaurant, earliest first (owner view).
    pub async fn find_by_restaurant(&self, restaurant_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE restaurant_id = $1 ORDER BY start_time ASC",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list time slots", e))
    }

    /// Acquire a row lock on an active slot.
    ///
    /// Returns `None` when the slot is missing or inactive. Must run
    /// inside the lock manager's transaction: the `FOR UPDATE` is what
    /// serializes concurrent capacity checks on the same slot.
    pub async fn lock_active(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock time slot", e))
    }

    /// Create a new time slot.
    pub async fn create(&self, slot: &NewTimeSlot) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>(
            "INSERT INTO time_slots (restaurant_id, start_time, end_time, capacity) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(slot.restaurant_id)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create time slot", e))
    }

    /// Apply an owner edit; absent fields keep their current value.
    pub async fn update(&self, id: Uuid, update: &TimeSlotUpdate) -> AppResult<TimeSlot> {
        sqlx::query_as::<_, TimeSlot>(
            "UPDATE time_slots SET \
               start_time = COALESCE($2, start_time), \
               end_time = COALESCE($3, end_time), \
               capacity = COALESCE($4, capacity), \
               is_active = COALESCE($5, is_active), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(update.start_time)
        .bind(update.end_time)
        .bind(update.capacity)
        .bind(update.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update time slot", e))
    }

    /// Deactivate a slot so it no longer accepts bookings.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE time_slots SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate time slot", e)
            })?;
        Ok(())
    }

    /// Hard-delete a slot. Only valid while no reservation references it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM time_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete time slot", e)
            })?;
        Ok(())
    }
}

//! Reservation repository implementation.
//!
//! The lock manager owns its transaction; every method that must run
//! under that transaction takes `&mut PgConnection` instead of using
//! the pool directly.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{CompletionDetails, NewHold, Reservation, ReservationStatus};

/// Predicate matching every reservation that consumes slot capacity:
/// settled statuses always, holds only while the lock is unexpired.
const CONSUMES_CAPACITY: &str = "(status IN ('accepted', 'pending', 'completed') \
     OR (status = 'hold' AND locked_until > NOW()))";

/// Repository for reservation persistence and queries.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
            })
    }

    /// Find a reservation by ID, scoped to its owner.
    pub async fn find_by_id_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find reservation", e))
    }

    /// Find a reservation by ID, scoped to a restaurant (owner view).
    pub async fn find_by_id_for_restaurant(
        &self,
        id: Uuid,
        restaurant_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 AND restaurant_id = $2",
        )
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find reservation", e))
    }

    /// Lock and return the user's reservations at a restaurant that
    /// block a new booking: pending on any date, an unexpired hold, or
    /// an accepted reservation for the requested date.
    ///
    /// Must run inside the lock manager's transaction. Row locks alone
    /// cannot serialize a first-time booker (no rows to lock yet), so a
    /// transaction-scoped advisory lock on the (user, restaurant) pair
    /// queues concurrent attempts before the row scan.
    pub async fn lock_user_active(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        restaurant_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<bool> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text || $2::text, 0))")
            .bind(user_id)
            .bind(restaurant_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to serialize lock attempt", e)
            })?;

        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM reservations \
             WHERE user_id = $1 AND restaurant_id = $2 \
               AND (status = 'pending' \
                    OR (status = 'hold' AND locked_until > NOW()) \
                    OR (status = 'accepted' AND reservation_date = $3)) \
             FOR UPDATE",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .bind(date)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to lock user reservations", e)
        })?;

        Ok(!rows.is_empty())
    }

    /// Count reservations consuming capacity for a (slot, date) pair.
    pub async fn count_active_for_slot(
        &self,
        time_slot_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<i64> {
        Self::count_active_on(&self.pool, time_slot_id, date).await
    }

    /// Same capacity count, but through the lock manager's transaction
    /// connection so it observes and is serialized by the slot row lock.
    pub async fn count_active_for_slot_locked(
        &self,
        conn: &mut PgConnection,
        time_slot_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<i64> {
        Self::count_active_on(&mut *conn, time_slot_id, date).await
    }

    async fn count_active_on<'e, E>(executor: E, time_slot_id: Uuid, date: NaiveDate) -> AppResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let query = format!(
            "SELECT COUNT(*) FROM reservations \
             WHERE time_slot_id = $1 AND reservation_date = $2 AND {CONSUMES_CAPACITY}"
        );
        sqlx::query_scalar(&query)
            .bind(time_slot_id)
            .bind(date)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count slot reservations", e)
            })
    }

    /// Per-slot capacity counts for every slot of a restaurant on a date.
    pub async fn count_active_by_restaurant(
        &self,
        restaurant_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<(Uuid, i64)>> {
        sqlx::query_as(
            "SELECT r.time_slot_id, COUNT(*) FROM reservations r \
             JOIN time_slots s ON s.id = r.time_slot_id \
             WHERE s.restaurant_id = $1 AND r.reservation_date = $2 \
               AND (r.status IN ('accepted', 'pending', 'completed') \
                    OR (r.status = 'hold' AND r.locked_until > NOW())) \
             GROUP BY r.time_slot_id",
        )
            .bind(restaurant_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count restaurant slots", e)
            })
    }

    /// Insert a new hold. Must run inside the lock manager's transaction.
    pub async fn create_hold(
        &self,
        conn: &mut PgConnection,
        hold: &NewHold,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations \
               (user_id, restaurant_id, time_slot_id, reservation_date, reservation_time, \
                guests_count, status, locked_until) \
             VALUES ($1, $2, $3, $4, $5, $6, 'hold', $7) RETURNING *",
        )
        .bind(hold.user_id)
        .bind(hold.restaurant_id)
        .bind(hold.time_slot_id)
        .bind(hold.reservation_date)
        .bind(hold.reservation_time)
        .bind(hold.guests_count)
        .bind(hold.locked_until)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create hold", e))
    }

    /// Merge completion details into a hold and settle its status.
    ///
    /// Guarded on the row still being a hold; returns `None` when the
    /// sweeper (or the customer) settled it in the meantime, so a stale
    /// write can never revive a canceled reservation.
    pub async fn complete(
        &self,
        id: Uuid,
        details: &CompletionDetails,
        status: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET occasion = $2, special_request = $3, \
               dietary_preferences = $4, subscribe_newsletter = $5, status = $6, \
               locked_until = NULL, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'hold' RETURNING *",
        )
        .bind(id)
        .bind(&details.occasion)
        .bind(&details.special_request)
        .bind(&details.dietary_preferences)
        .bind(details.subscribe_newsletter)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete reservation", e))
    }

    /// Set a reservation's status, optionally stamping `completed_at`.
    ///
    /// The write only lands while the row still holds `expected`;
    /// `None` means a concurrent transition won the read-write window
    /// and the caller's decision no longer applies. Every settable
    /// status leaves the hold lifecycle, so the lock expiry is cleared.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
        stamp_completed: bool,
        expected: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, \
               completed_at = CASE WHEN $3 THEN NOW() ELSE completed_at END, \
               locked_until = NULL, updated_at = NOW() \
             WHERE id = $1 AND status = $4 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(stamp_completed)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update status", e))
    }

    /// Cancel a reservation on behalf of its owner.
    ///
    /// Only pending, accepted, and held reservations can be canceled;
    /// returns whether a row was actually updated.
    pub async fn cancel_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'canceled', locked_until = NULL, \
               updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
               AND status IN ('pending', 'accepted', 'hold')",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel reservation", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Cancel every hold whose lock expired before `now`. Idempotent.
    pub async fn cancel_expired_holds(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'canceled', locked_until = NULL, \
               updated_at = NOW() \
             WHERE status = 'hold' AND locked_until IS NOT NULL AND locked_until < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cancel expired holds", e)
        })?;

        Ok(result.rows_affected())
    }

    /// Find pending reservations that aged past `created_before`, or
    /// whose reservation date/time already lies in the past.
    pub async fn find_stale_pending(
        &self,
        created_before: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE status = 'pending' \
               AND (created_at < $1 \
                    OR (reservation_date + reservation_time) < (NOW() AT TIME ZONE 'UTC'))",
        )
        .bind(created_before)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find stale reservations", e)
        })
    }

    /// Page through a user's reservations, newest visit first,
    /// excluding holds whose lock already expired.
    pub async fn find_page_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations \
             WHERE user_id = $1 AND (status <> 'hold' OR locked_until > NOW())",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count user reservations", e)
        })?;

        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE user_id = $1 AND (status <> 'hold' OR locked_until > NOW()) \
             ORDER BY reservation_date DESC, reservation_time DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user reservations", e)
        })?;

        Ok(PageResponse::new(
            reservations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Whether any reservation references the given time slot.
    pub async fn any_for_slot(&self, time_slot_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM reservations WHERE time_slot_id = $1)")
            .bind(time_slot_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check slot references", e)
            })
    }
}

//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tablebook_core::config::database::DatabaseConfig;
use tablebook_core::config::reservation::ReservationConfig;
use tablebook_core::events::reservation::ReservationEvent;
use tablebook_core::traits::notifier::NotificationDispatcher;
use tablebook_database::repositories::{
    MenuRepository, OrderRepository, ReservationRepository, RestaurantRepository,
    TimeSlotRepository,
};
use tablebook_entity::reservation::Reservation;
use tablebook_entity::restaurant::Restaurant;
use tablebook_entity::time_slot::{NewTimeSlot, TimeSlot};
use tablebook_service::{
    AvailabilityService, LockSlotRequest, OrderService, RequestContext, ReservationService,
    TimeSlotService,
};

/// Dispatcher that records every event it sees.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<ReservationEvent>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReservationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event: ReservationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Test application context
pub struct TestApp {
    /// Database pool for direct queries
    pub db_pool: PgPool,
    pub reservations: ReservationService,
    pub availability: AvailabilityService,
    pub time_slots: TimeSlotService,
    pub orders: OrderService,
    pub menu_repo: Arc<MenuRepository>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl TestApp {
    /// Create a new test application against a clean database.
    pub async fn new() -> Self {
        let url = std::env::var("TABLEBOOK_TEST_DATABASE_URL")
            .expect("TABLEBOOK_TEST_DATABASE_URL must point at a disposable test database");

        let config = DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 300,
        };

        let database = tablebook_database::DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to test database");

        tablebook_database::migration::run_migrations(database.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = database.into_pool();
        Self::clean_database(&db_pool).await;

        let reservation_repo = Arc::new(ReservationRepository::new(db_pool.clone()));
        let time_slot_repo = Arc::new(TimeSlotRepository::new(db_pool.clone()));
        let restaurant_repo = Arc::new(RestaurantRepository::new(db_pool.clone()));
        let menu_repo = Arc::new(MenuRepository::new(db_pool.clone()));
        let order_repo = Arc::new(OrderRepository::new(db_pool.clone()));

        let dispatcher = Arc::new(RecordingDispatcher::new());

        let reservations = ReservationService::new(
            db_pool.clone(),
            Arc::clone(&reservation_repo),
            Arc::clone(&time_slot_repo),
            Arc::clone(&restaurant_repo),
            Arc::clone(&dispatcher) as Arc<dyn NotificationDispatcher>,
            ReservationConfig::default(),
        );
        let availability = AvailabilityService::new(
            Arc::clone(&time_slot_repo),
            Arc::clone(&reservation_repo),
        );
        let time_slots = TimeSlotService::new(
            Arc::clone(&time_slot_repo),
            Arc::clone(&reservation_repo),
        );
        let orders = OrderService::new(
            Arc::clone(&reservation_repo),
            Arc::clone(&menu_repo),
            Arc::clone(&order_repo),
        );

        Self {
            db_pool,
            reservations,
            availability,
            time_slots,
            orders,
            menu_repo,
            dispatcher,
        }
    }

    async fn clean_database(pool: &PgPool) {
        sqlx::query(
            "TRUNCATE order_items, orders, menu_items, reservations, time_slots, restaurants CASCADE",
        )
        .execute(pool)
        .await
        .expect("Failed to clean database");
    }

    pub async fn create_restaurant(&self, auto_accept: bool) -> Restaurant {
        let repo = RestaurantRepository::new(self.db_pool.clone());
        repo.create(Uuid::new_v4(), "Test Restaurant", auto_accept)
            .await
            .expect("Failed to create restaurant")
    }

    pub async fn create_slot(&self, restaurant_id: Uuid, capacity: i32) -> TimeSlot {
        let ctx = RequestContext::system();
        self.time_slots
            .create_slot(
                &ctx,
                NewTimeSlot {
                    restaurant_id,
                    start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                    capacity,
                },
            )
            .await
            .expect("Failed to create time slot")
    }

    /// Lock a slot for tomorrow, returning the hold if one was granted.
    pub async fn lock(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        time_slot_id: Uuid,
    ) -> Option<Reservation> {
        let ctx = RequestContext::for_user(user_id);
        self.reservations
            .lock_slot(
                &ctx,
                LockSlotRequest {
                    user_id,
                    restaurant_id,
                    time_slot_id,
                    date: tomorrow(),
                    guests_count: 2,
                },
            )
            .await
            .expect("lock_slot failed")
    }

    /// Force a hold's expiry into the past, bypassing the engine.
    pub async fn expire_hold(&self, reservation_id: Uuid) {
        sqlx::query("UPDATE reservations SET locked_until = NOW() - INTERVAL '1 minute' WHERE id = $1")
            .bind(reservation_id)
            .execute(&self.db_pool)
            .await
            .expect("Failed to expire hold");
    }

    /// Backdate a reservation's creation time, bypassing the engine.
    pub async fn backdate_created(&self, reservation_id: Uuid, hours: i64) {
        sqlx::query("UPDATE reservations SET created_at = NOW() - ($2 || ' hours')::interval WHERE id = $1")
            .bind(reservation_id)
            .bind(hours.to_string())
            .execute(&self.db_pool)
            .await
            .expect("Failed to backdate reservation");
    }
}

/// Tomorrow's date; every slot window is still open on it.
pub fn tomorrow() -> NaiveDate {
    (Utc::now() + Duration::days(1)).date_naive()
}

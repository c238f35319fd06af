//! Integration tests for slot locking.

use chrono::{Duration, Utc};
use uuid::Uuid;

use tablebook_core::error::ErrorKind;
use tablebook_entity::reservation::ReservationStatus;
use tablebook_service::{LockSlotRequest, RequestContext};

use crate::helpers::{TestApp, tomorrow};

#[tokio::test]
#[ignore]
async fn test_lock_slot_creates_timed_hold() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app
        .lock(user_id, restaurant.id, slot.id)
        .await
        .expect("slot with free capacity should grant a hold");

    assert_eq!(hold.status, ReservationStatus::Hold);
    assert_eq!(hold.user_id, user_id);
    assert_eq!(hold.reservation_time, slot.start_time);

    let locked_until = hold.locked_until.expect("hold must carry an expiry");
    let remaining = locked_until - Utc::now();
    assert!(remaining > Duration::minutes(9));
    assert!(remaining <= Duration::minutes(10));
}

#[tokio::test]
#[ignore]
async fn test_capacity_race_grants_exactly_one_hold() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 1).await;

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    let (first, second) = tokio::join!(
        app.lock(user_a, restaurant.id, slot.id),
        app.lock(user_b, restaurant.id, slot.id),
    );

    let granted = [&first, &second].iter().filter(|r| r.is_some()).count();
    assert_eq!(granted, 1, "exactly one of two racing locks may win");
}

#[tokio::test]
#[ignore]
async fn test_full_slot_returns_none_not_error() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 1).await;

    app.lock(Uuid::new_v4(), restaurant.id, slot.id)
        .await
        .expect("first lock should win");

    let second = app.lock(Uuid::new_v4(), restaurant.id, slot.id).await;
    assert!(second.is_none());
}

#[tokio::test]
#[ignore]
async fn test_second_lock_by_same_user_conflicts() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot_a = app.create_slot(restaurant.id, 4).await;
    let slot_b = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    app.lock(user_id, restaurant.id, slot_a.id)
        .await
        .expect("first lock should win");

    let ctx = RequestContext::for_user(user_id);
    let err = app
        .reservations
        .lock_slot(
            &ctx,
            LockSlotRequest {
                user_id,
                restaurant_id: restaurant.id,
                time_slot_id: slot_b.id,
                date: tomorrow(),
                guests_count: 2,
            },
        )
        .await
        .expect_err("an active hold must block a second lock");

    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore]
async fn test_same_user_race_grants_exactly_one_hold() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot_a = app.create_slot(restaurant.id, 4).await;
    let slot_b = app.create_slot(restaurant.id, 4).await;

    // A first-time booker has no rows to lock, so both attempts would
    // pass the active-booking check if nothing else serialized them.
    let user_id = Uuid::new_v4();
    let ctx = RequestContext::for_user(user_id);

    let request = |time_slot_id| LockSlotRequest {
        user_id,
        restaurant_id: restaurant.id,
        time_slot_id,
        date: tomorrow(),
        guests_count: 2,
    };

    let (first, second) = tokio::join!(
        app.reservations.lock_slot(&ctx, request(slot_a.id)),
        app.reservations.lock_slot(&ctx, request(slot_b.id)),
    );

    let outcomes = [first, second];
    let granted = outcomes
        .iter()
        .filter(|r| matches!(r, Ok(Some(_))))
        .count();
    assert_eq!(granted, 1, "a user may never hold two slots at once");

    let conflicted = outcomes
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind == ErrorKind::Conflict))
        .count();
    assert_eq!(conflicted, 1, "the losing attempt must surface the active booking");
}

#[tokio::test]
#[ignore]
async fn test_expired_hold_frees_capacity_for_same_user() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 1).await;

    let user_id = Uuid::new_v4();
    let hold = app
        .lock(user_id, restaurant.id, slot.id)
        .await
        .expect("first lock should win");

    app.expire_hold(hold.id).await;

    let again = app.lock(user_id, restaurant.id, slot.id).await;
    assert!(again.is_some(), "an expired hold must not consume capacity");
}

#[tokio::test]
#[ignore]
async fn test_unknown_slot_is_unavailable() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;

    let user_id = Uuid::new_v4();
    let ctx = RequestContext::for_user(user_id);
    let err = app
        .reservations
        .lock_slot(
            &ctx,
            LockSlotRequest {
                user_id,
                restaurant_id: restaurant.id,
                time_slot_id: Uuid::new_v4(),
                date: tomorrow(),
                guests_count: 2,
            },
        )
        .await
        .expect_err("an unknown slot cannot be locked");

    assert_eq!(err.kind, ErrorKind::Unavailable);
}

#[tokio::test]
#[ignore]
async fn test_invalid_guests_count_rejected() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let ctx = RequestContext::for_user(user_id);
    let err = app
        .reservations
        .lock_slot(
            &ctx,
            LockSlotRequest {
                user_id,
                restaurant_id: restaurant.id,
                time_slot_id: slot.id,
                date: tomorrow(),
                guests_count: 0,
            },
        )
        .await
        .expect_err("zero guests is invalid");

    assert_eq!(err.kind, ErrorKind::Validation);
}

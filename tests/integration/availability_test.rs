//! Integration tests for availability queries.

use uuid::Uuid;

use crate::helpers::{TestApp, tomorrow};

#[tokio::test]
#[ignore]
async fn test_is_available_tracks_capacity() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 2).await;

    assert!(app.availability.is_available(slot.id, tomorrow()).await.unwrap());

    app.lock(Uuid::new_v4(), restaurant.id, slot.id).await.unwrap();
    assert!(app.availability.is_available(slot.id, tomorrow()).await.unwrap());

    app.lock(Uuid::new_v4(), restaurant.id, slot.id).await.unwrap();
    assert!(!app.availability.is_available(slot.id, tomorrow()).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_is_available_false_for_unknown_slot() {
    let app = TestApp::new().await;

    assert!(
        !app.availability
            .is_available(Uuid::new_v4(), tomorrow())
            .await
            .unwrap()
    );
}

#[tokio::test]
#[ignore]
async fn test_expired_hold_restores_availability() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 1).await;

    let hold = app.lock(Uuid::new_v4(), restaurant.id, slot.id).await.unwrap();
    assert!(!app.availability.is_available(slot.id, tomorrow()).await.unwrap());

    app.expire_hold(hold.id).await;
    assert!(app.availability.is_available(slot.id, tomorrow()).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_available_slots_flags_full_ones() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let full = app.create_slot(restaurant.id, 1).await;
    let open = app.create_slot(restaurant.id, 4).await;

    app.lock(Uuid::new_v4(), restaurant.id, full.id).await.unwrap();

    let listed = app
        .availability
        .available_slots(restaurant.id, tomorrow())
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    let by_id = |id: Uuid| listed.iter().find(|s| s.time_slot_id == id).unwrap();
    assert!(!by_id(full.id).is_available);
    assert!(by_id(open.id).is_available);
}

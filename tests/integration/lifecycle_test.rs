//! Integration tests for the reservation lifecycle.

use uuid::Uuid;

use tablebook_core::error::ErrorKind;
use tablebook_core::events::reservation::ReservationEvent;
use tablebook_core::types::pagination::PageRequest;
use tablebook_entity::reservation::{CompletionDetails, ReservationStatus};
use tablebook_service::RequestContext;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore]
async fn test_complete_with_auto_accept_lands_accepted() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(true).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app.lock(user_id, restaurant.id, slot.id).await.unwrap();

    let ctx = RequestContext::for_user(user_id);
    let details = CompletionDetails {
        occasion: Some("Birthday".to_string()),
        ..Default::default()
    };
    let completed = app
        .reservations
        .complete_reservation(&ctx, user_id, hold.id, details)
        .await
        .unwrap()
        .expect("an unexpired hold must complete");

    assert_eq!(completed.status, ReservationStatus::Accepted);
    assert_eq!(completed.occasion.as_deref(), Some("Birthday"));
    assert!(completed.locked_until.is_none());
    assert!(completed.completed_at.is_some());

    let events = app.dispatcher.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ReservationEvent::Created { reservation_id, .. } if *reservation_id == hold.id
    ));
}

#[tokio::test]
#[ignore]
async fn test_complete_without_auto_accept_lands_pending() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app.lock(user_id, restaurant.id, slot.id).await.unwrap();

    let ctx = RequestContext::for_user(user_id);
    let completed = app
        .reservations
        .complete_reservation(&ctx, user_id, hold.id, CompletionDetails::default())
        .await
        .unwrap()
        .expect("an unexpired hold must complete");

    assert_eq!(completed.status, ReservationStatus::Pending);
}

#[tokio::test]
#[ignore]
async fn test_completing_an_expired_hold_cancels_it() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(true).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app.lock(user_id, restaurant.id, slot.id).await.unwrap();
    app.expire_hold(hold.id).await;

    let ctx = RequestContext::for_user(user_id);
    let outcome = app
        .reservations
        .complete_reservation(&ctx, user_id, hold.id, CompletionDetails::default())
        .await
        .unwrap();

    assert!(outcome.is_none(), "an expired hold cannot be completed");

    let reloaded = app
        .reservations
        .get_for_user(&ctx, user_id, hold.id)
        .await
        .unwrap();
    assert_eq!(reloaded.status, ReservationStatus::Canceled);
    assert!(app.dispatcher.events().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_cancel_is_idempotent_soft_outcome() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(true).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app.lock(user_id, restaurant.id, slot.id).await.unwrap();

    let ctx = RequestContext::for_user(user_id);
    assert!(app.reservations.cancel(&ctx, user_id, hold.id).await.unwrap());

    // Leaving the hold lifecycle clears the lock expiry with it.
    let canceled = app
        .reservations
        .get_for_user(&ctx, user_id, hold.id)
        .await
        .unwrap();
    assert_eq!(canceled.status, ReservationStatus::Canceled);
    assert!(canceled.locked_until.is_none());

    assert!(!app.reservations.cancel(&ctx, user_id, hold.id).await.unwrap());

    // Someone else's reservation is also a no-op, not an error.
    let stranger = Uuid::new_v4();
    let ctx = RequestContext::for_user(stranger);
    assert!(!app.reservations.cancel(&ctx, stranger, hold.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_owner_decision_follows_lifecycle_edges() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app.lock(user_id, restaurant.id, slot.id).await.unwrap();
    let ctx = RequestContext::for_user(user_id);
    app.reservations
        .complete_reservation(&ctx, user_id, hold.id, CompletionDetails::default())
        .await
        .unwrap()
        .unwrap();

    let owner_ctx = RequestContext::system();
    let accepted = app
        .reservations
        .update_status(&owner_ctx, restaurant.id, hold.id, ReservationStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(accepted.status, ReservationStatus::Accepted);

    let completed = app
        .reservations
        .update_status(&owner_ctx, restaurant.id, hold.id, ReservationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, ReservationStatus::Completed);
    assert!(completed.completed_at.is_some());

    // Completed is terminal.
    let err = app
        .reservations
        .update_status(&owner_ctx, restaurant.id, hold.id, ReservationStatus::Accepted)
        .await
        .expect_err("no edges leave a terminal status");
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_set_hold_or_pending() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;

    let ctx = RequestContext::system();
    for status in [ReservationStatus::Hold, ReservationStatus::Pending] {
        let err = app
            .reservations
            .update_status(&ctx, restaurant.id, Uuid::new_v4(), status)
            .await
            .expect_err("customer-side statuses are not owner-settable");
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

#[tokio::test]
#[ignore]
async fn test_owner_decision_scoped_to_restaurant() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(false).await;
    let other = app.create_restaurant(false).await;
    let slot = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let hold = app.lock(user_id, restaurant.id, slot.id).await.unwrap();
    let ctx = RequestContext::for_user(user_id);
    app.reservations
        .complete_reservation(&ctx, user_id, hold.id, CompletionDetails::default())
        .await
        .unwrap()
        .unwrap();

    let owner_ctx = RequestContext::system();
    let err = app
        .reservations
        .update_status(&owner_ctx, other.id, hold.id, ReservationStatus::Accepted)
        .await
        .expect_err("another restaurant's reservation must look missing");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore]
async fn test_list_for_user_sweeps_expired_holds() {
    let app = TestApp::new().await;
    let restaurant = app.create_restaurant(true).await;
    let slot_a = app.create_slot(restaurant.id, 4).await;
    let slot_b = app.create_slot(restaurant.id, 4).await;

    let user_id = Uuid::new_v4();
    let ctx = RequestContext::for_user(user_id);

    // The abandoned hold has to come first; once it expires it no
    // longer blocks the user's next booking.
    let expired = app.lock(user_id, restaurant.id, slot_b.id).await.unwrap();
    app.expire_hold(expired.id).await;

    let kept = app.lock(user_id, restaurant.id, slot_a.id).await.unwrap();
    app.reservations
        .complete_reservation(&ctx, user_id, kept.id, CompletionDetails::default())
        .await
        .unwrap()
        .unwrap();

    // The opportunistic sweep converts the expired hold to canceled,
    // so it surfaces as history rather than a live hold.
    let page = app
        .reservations
        .list_for_user(&ctx, user_id, &PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total_items, 2);
    assert!(page.items.iter().all(|r| r.status != ReservationStatus::Hold));
    let swept = page.items.iter().find(|r| r.id == expired.id).unwrap();
    assert_eq!(swept.status, ReservationStatus::Canceled);
    let live = page.items.iter().find(|r| r.id == kept.id).unwrap();
    assert_eq!(live.status, ReservationStatus::Accepted);
}

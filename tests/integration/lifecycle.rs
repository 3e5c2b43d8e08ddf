//! Lifecycle tests against the in-memory backend

use chrono::Duration;

use equipment_checkout::{
    api::EquipmentApi,
    models::{CheckoutRequest, LifecycleState},
    services::Services,
    AppError,
};

use super::{backend, signed_in};

#[tokio::test]
async fn test_end_to_end_checkout_and_return() {
    let api = backend();
    let services = signed_in(&api).await;
    let checkouts = &services.checkouts;

    let request = checkouts.submit_request("Drone-X").await.unwrap();
    assert_eq!(request, CheckoutRequest::new("A. Lee", "Drone-X", 100));

    let staged = checkouts.approve_request(&request).await.unwrap();
    assert_eq!(staged.id_choices.iter().copied().collect::<Vec<_>>(), vec![5, 7]);
    assert_eq!(staged.selected_id, None);

    let selected = checkouts.select_item(&staged, 5).unwrap();
    let checkout = checkouts.approve_staged_request(&selected).await.unwrap();
    assert_eq!(checkout.equipment_id, 5);
    assert!(checkout.is_active);
    assert_eq!(checkout.end_at, checkout.started_at + Duration::days(3));
    assert!(checkouts.list_staged_requests().await.unwrap().is_empty());

    let returned = checkouts.return_checkout(&checkout).await.unwrap();
    assert!(!returned.is_active);
    assert_eq!(returned.state(), LifecycleState::Returned);

    assert!(checkouts.list_active_checkouts().await.unwrap().is_empty());
    let history = checkouts.list_checkout_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, checkout.id);
    assert!(!history[0].is_active);
}

#[tokio::test]
async fn test_submitted_request_listed_once() {
    let api = backend();
    let services = signed_in(&api).await;

    services.checkouts.submit_request("Camera").await.unwrap();
    let requests = services.checkouts.list_requests().await.unwrap();
    let matching: Vec<_> = requests
        .iter()
        .filter(|r| r.pid == 100 && r.model == "Camera")
        .collect();
    assert_eq!(matching.len(), 1);
}

#[tokio::test]
async fn test_submit_signed_out_fails_before_network() {
    let api = backend();
    let services = Services::new(api.clone());

    let err = services.checkouts.submit_request("Drone-X").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(api.list_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_approve_moves_request_to_staged() {
    let api = backend();
    let services = signed_in(&api).await;
    let request = services.checkouts.submit_request("Drone-X").await.unwrap();

    services.checkouts.approve_request(&request).await.unwrap();

    let staged = services.checkouts.list_staged_requests().await.unwrap();
    assert_eq!(staged.len(), 1);
    assert!(staged[0].matches_request(&request));
    assert!(!services.checkouts.list_requests().await.unwrap().contains(&request));
}

#[tokio::test]
async fn test_reject_twice_leaves_other_requests() {
    let api = backend();
    let services = signed_in(&api).await;
    let drone = services.checkouts.submit_request("Drone-X").await.unwrap();
    let camera = services.checkouts.submit_request("Camera").await.unwrap();

    services.checkouts.reject_request(&drone).await.unwrap();
    services.checkouts.reject_request(&drone).await.unwrap();

    assert_eq!(services.checkouts.list_requests().await.unwrap(), vec![camera]);
}

#[tokio::test]
async fn test_checked_out_unit_not_offered_again() {
    let api = backend();
    let services = signed_in(&api).await;
    let checkouts = &services.checkouts;

    let first = checkouts.submit_request("Drone-X").await.unwrap();
    let staged = checkouts.approve_request(&first).await.unwrap();
    let staged = checkouts.select_item(&staged, 5).unwrap();
    checkouts.approve_staged_request(&staged).await.unwrap();

    api.create_request(&CheckoutRequest::new("B. Kim", "Drone-X", 200))
        .await
        .unwrap();
    let second = checkouts.list_requests().await.unwrap().remove(0);
    let staged = checkouts.approve_request(&second).await.unwrap();
    assert_eq!(staged.id_choices.iter().copied().collect::<Vec<_>>(), vec![7]);
}

#[tokio::test]
async fn test_unit_cannot_be_assigned_twice() {
    let api = backend();
    let services = signed_in(&api).await;
    let checkouts = &services.checkouts;

    let lee = checkouts.submit_request("Drone-X").await.unwrap();
    let lee_staged = checkouts.approve_request(&lee).await.unwrap();

    api.create_request(&CheckoutRequest::new("B. Kim", "Drone-X", 200))
        .await
        .unwrap();
    let kim = checkouts.list_requests().await.unwrap().remove(0);
    let kim_staged = checkouts.approve_request(&kim).await.unwrap();

    // Both were staged while unit 5 was still free
    let lee_staged = checkouts.select_item(&lee_staged, 5).unwrap();
    let kim_staged = checkouts.select_item(&kim_staged, 5).unwrap();
    checkouts.approve_staged_request(&lee_staged).await.unwrap();

    let err = checkouts.approve_staged_request(&kim_staged).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(checkouts.list_staged_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_board_actions_refresh_affected_tables() {
    let api = backend();
    let services = signed_in(&api).await;
    let board = &services.board;

    let request = services.checkouts.submit_request("Drone-X").await.unwrap();
    assert_eq!(board.refresh_all().await, 3);
    assert_eq!(board.snapshot().request_count(), 1);

    let staged = board.approve_request(&request).await.unwrap();
    let snapshot = board.snapshot();
    assert_eq!(snapshot.request_count(), 0);
    assert_eq!(snapshot.staged_count(), 1);

    let checkout = board.approve_staged(&staged, 7).await.unwrap();
    let snapshot = board.snapshot();
    assert_eq!(snapshot.staged_count(), 0);
    assert_eq!(snapshot.checkouts, vec![checkout.clone()]);

    board.return_checkout(&checkout).await.unwrap();
    assert_eq!(board.snapshot().checkout_count(), 0);
}

#[tokio::test]
async fn test_board_rejects_foreign_unit_without_side_effects() {
    let api = backend();
    let services = signed_in(&api).await;
    let board = &services.board;

    let request = services.checkouts.submit_request("Drone-X").await.unwrap();
    let staged = board.approve_request(&request).await.unwrap();

    // Unit 6 is a camera, not a candidate
    assert!(board.approve_staged(&staged, 6).await.is_none());
    assert_eq!(board.snapshot().staged_count(), 1);
    assert!(api.list_checkouts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_waiver_round_trips_profile() {
    let api = backend();
    let mut unsigned = super::lee();
    unsigned.waiver_signed = false;
    api.set_profile(Some(unsigned)).unwrap();

    let services = Services::new(api.clone());
    assert!(!services.profile.load().await.unwrap().unwrap().waiver_signed);

    services.profile.sign_waiver().await.unwrap();
    assert!(services.profile.current().unwrap().waiver_signed);
    assert!(api.current_profile().await.unwrap().waiver_signed);
}

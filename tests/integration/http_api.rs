//! HTTP contract tests against a mock backend

use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use equipment_checkout::{
    api::{EquipmentApi, HttpApi},
    config::ApiConfig,
    models::{ActiveCheckout, CheckoutRequest, StagedRequest},
    AppError,
};

fn client(server: &MockServer) -> HttpApi {
    HttpApi::new(&ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        token: Some("t0k3n".to_string()),
    })
    .unwrap()
}

#[tokio::test]
async fn test_lists_requests_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/equipment/get_all_requests"))
        .and(header("authorization", "Bearer t0k3n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"user_name": "A. Lee", "model": "Drone-X", "pid": 100}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let requests = client(&server).list_requests().await.unwrap();
    assert_eq!(requests, vec![CheckoutRequest::new("A. Lee", "Drone-X", 100)]);
}

#[tokio::test]
async fn test_available_items_by_model_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/equipment/get_equipment_for_request/Drone-X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"equipment_id": 5, "model": "Drone-X", "is_checked_out": false},
            {"equipment_id": 7, "model": "Drone-X", "is_checked_out": false, "condition": 9}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).available_for_model("Drone-X").await.unwrap();
    assert_eq!(items.iter().map(|i| i.equipment_id).collect::<Vec<_>>(), vec![5, 7]);
    assert_eq!(items[1].condition, Some(9));
}

#[tokio::test]
async fn test_delete_request_sends_record_as_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/equipment/delete_request"))
        .and(body_json(json!({"user_name": "A. Lee", "model": "Drone-X", "pid": 100})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_request(&CheckoutRequest::new("A. Lee", "Drone-X", 100))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_staged_request_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/equipment/create_staged_request"))
        .and(body_json(json!({
            "user_name": "A. Lee",
            "model": "Drone-X",
            "pid": 100,
            "id_choices": [5, 7],
            "selected_id": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "user_name": "A. Lee",
            "model": "Drone-X",
            "pid": 100,
            "id_choices": [5, 7],
            "selected_id": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CheckoutRequest::new("A. Lee", "Drone-X", 100);
    let staged = StagedRequest::from_request(&request, [5, 7].into_iter().collect());
    let stored = client(&server).create_staged_request(&staged).await.unwrap();
    assert_eq!(stored.id, Some(3));
}

#[tokio::test]
async fn test_staged_list_tolerates_null_choices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/equipment/get_all_staged_requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "user_name": "A. Lee",
                "model": "Drone-X",
                "pid": 100,
                "id_choices": null,
                "selected_id": null
            },
            {
                "id": 2,
                "user_name": "B. Kim",
                "model": "Drone-X",
                "pid": 200,
                "id_choices": [5, 7],
                "selected_id": 7
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let staged = client(&server).list_staged_requests().await.unwrap();
    assert_eq!(staged.len(), 2);
    assert!(staged[0].id_choices.is_empty());
    assert_eq!(staged[1].id_choices.iter().copied().collect::<Vec<_>>(), vec![5, 7]);
    assert_eq!(staged[1].selected_id, Some(7));
}

#[tokio::test]
async fn test_return_checkout_reads_naive_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/equipment/return_checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "user_name": "A. Lee",
            "pid": 100,
            "equipment_id": 5,
            "model": "Drone-X",
            "is_active": false,
            "started_at": "2024-04-01T08:00:00",
            "end_at": "2024-04-04T08:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CheckoutRequest::new("A. Lee", "Drone-X", 100);
    let staged = StagedRequest::from_request(&request, [5].into_iter().collect());
    let mut checkout = ActiveCheckout::start(&staged, 5, chrono::Utc::now());
    checkout.id = Some(12);

    let returned = client(&server).return_checkout(&checkout).await.unwrap();
    assert!(!returned.is_active);
    assert_eq!(returned.end_at - returned.started_at, chrono::Duration::days(3));
}

#[tokio::test]
async fn test_status_codes_map_to_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/equipment/delete_staged_request"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such staged request"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/equipment/get_all_active_checkouts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = client(&server);
    let request = CheckoutRequest::new("A. Lee", "Drone-X", 100);
    let staged = StagedRequest::from_request(&request, Default::default());

    assert!(api.delete_staged_request(&staged).await.unwrap_err().is_not_found());
    match api.list_active_checkouts().await.unwrap_err() {
        AppError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(api.current_profile().await, Err(AppError::Authentication(_))));
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/equipment/get_all_types"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_equipment_types().await.unwrap_err();
    assert!(matches!(err, AppError::Serialization(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let api = HttpApi::new(&ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        token: None,
    })
    .unwrap();

    assert!(matches!(api.list_equipment().await, Err(AppError::Network(_))));
}

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jiff::{SignedDuration, Timestamp};
use parkspot_core::{
    ManualClock, Page, PageRequest, ParkingSpot, ParkingSpotPayload, ParkingSpots, ServiceError,
    SpotId, StorageError,
};
use parkspot_gateway::handlers::GREETING;
use parkspot_gateway::{App, AppState};
use parkspot_service::ParkingSpotService;
use parkspot_storage::InMemoryRepository;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with_clock(clock: ManualClock) -> Router {
    let service = ParkingSpotService::with_clock(InMemoryRepository::new(), clock);
    App::router(AppState::new(Arc::new(service)))
}

fn app() -> Router {
    app_with_clock(ManualClock::new(Timestamp::UNIX_EPOCH))
}

fn spot_json(number: &str, plate: &str, apartment: &str, block: &str) -> Value {
    json!({
        "spotNumber": number,
        "licensePlate": plate,
        "brand": "Toyota",
        "model": "Corolla",
        "color": "Silver",
        "responsibleName": "Maria Souza",
        "apartment": apartment,
        "block": block,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, Method::POST, "/parking-spot", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json
}

#[tokio::test]
async fn root_returns_greeting() {
    let (status, body) = send(&app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String(GREETING.to_string()));
}

#[tokio::test]
async fn create_returns_record_with_server_fields() {
    let app = app();
    let created = create(&app, spot_json("A001", "ABC1234", "101", "A")).await;

    assert!(created["id"].as_str().unwrap().parse::<SpotId>().is_ok());
    assert_eq!(created["spotNumber"], "A001");
    assert_eq!(created["licensePlate"], "ABC1234");
    assert!(created["registeredAt"].is_string());

    let uri = format!("/parking-spot/{}", created["id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicates_are_rejected_with_conflict_messages() {
    let app = app();
    create(&app, spot_json("A001", "ABC1234", "101", "A")).await;

    let cases = [
        (
            spot_json("A002", "XYZ9876", "101", "A"),
            "Conflict: Parking Spot already registered for this apartment/block!",
        ),
        (
            spot_json("A002", "ABC1234", "102", "A"),
            "Conflict: License Plate Car is already in use!",
        ),
        (
            spot_json("A001", "XYZ9876", "102", "A"),
            "Conflict: Parking Spot is already in use!",
        ),
    ];

    for (body, message) in cases {
        let (status, json) = send(&app, Method::POST, "/parking-spot", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["status"], 409);
        assert_eq!(json["message"], message);
    }

    let (_, page) = send(&app, Method::GET, "/parking-spot", None).await;
    assert_eq!(page["totalElements"], 1);
}

#[tokio::test]
async fn invalid_payload_lists_field_errors() {
    let mut body = spot_json("A001", "ABC-1234", "101", "A");
    body["brand"] = json!("   ");
    body.as_object_mut().unwrap().remove("color");

    let (status, json) = send(&app(), Method::POST, "/parking-spot", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let fields: Vec<&str> = json["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"licensePlate"));
    assert!(fields.contains(&"brand"));
    assert!(fields.contains(&"color"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/parking-spot")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"spotNumber\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn null_field_is_reported_as_blank() {
    let mut body = spot_json("A001", "ABC1234", "101", "A");
    body["brand"] = Value::Null;

    let (status, json) = send(&app(), Method::POST, "/parking-spot", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors = json["fieldErrors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "brand");
    assert_eq!(errors[0]["message"], "must not be blank");
}

#[tokio::test]
async fn wrongly_typed_field_is_a_bad_request() {
    let app = app();
    let mut body = spot_json("A001", "ABC1234", "101", "A");
    body["spotNumber"] = json!(101);

    let (status, json) = send(&app, Method::POST, "/parking-spot", Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let created = create(&app, spot_json("A001", "ABC1234", "101", "A")).await;
    let uri = format!("/parking-spot/{}", created["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_and_invalid_ids_are_not_found() {
    let app = app();
    let missing = format!("/parking-spot/{}", SpotId::generate());

    for uri in [missing.as_str(), "/parking-spot/not-a-uuid"] {
        let (status, json) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Parking Spot not found.");

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body = spot_json("A001", "ABC1234", "101", "A");
        let (status, _) = send(&app, Method::PUT, uri, Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_registration() {
    let clock = ManualClock::new(Timestamp::UNIX_EPOCH);
    let app = app_with_clock(clock.clone());
    let created = create(&app, spot_json("A001", "ABC1234", "101", "A")).await;
    let uri = format!("/parking-spot/{}", created["id"].as_str().unwrap());

    clock.advance(SignedDuration::from_hours(1));

    let mut body = spot_json("B002", "ABC1234", "101", "A");
    body["color"] = json!("Red");
    let (status, updated) = send(&app, Method::PUT, &uri, Some(body)).await;

    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["registeredAt"], created["registeredAt"]);
    assert_eq!(updated["spotNumber"], "B002");
    assert_eq!(updated["color"], "Red");
}

#[tokio::test]
async fn update_conflicting_with_another_record_is_rejected() {
    let app = app();
    create(&app, spot_json("A001", "ABC1234", "101", "A")).await;
    let second = create(&app, spot_json("A002", "XYZ9876", "102", "A")).await;
    let uri = format!("/parking-spot/{}", second["id"].as_str().unwrap());

    let body = spot_json("A002", "ABC1234", "102", "A");
    let (status, json) = send(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Conflict: License Plate Car is already in use!");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app();
    let created = create(&app, spot_json("A001", "ABC1234", "101", "A")).await;
    let uri = format!("/parking-spot/{}", created["id"].as_str().unwrap());

    let (status, json) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Parking Spot deleted successfully.");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The freed plate can be registered again.
    create(&app, spot_json("A001", "ABC1234", "101", "A")).await;
}

#[tokio::test]
async fn list_pages_in_registration_order() {
    let clock = ManualClock::new(Timestamp::UNIX_EPOCH);
    let app = app_with_clock(clock.clone());
    for i in 0..15 {
        let body = spot_json(
            &format!("S{i:03}"),
            &format!("PLT{i:04}"),
            &format!("{}", 100 + i),
            "A",
        );
        create(&app, body).await;
        clock.advance(SignedDuration::from_secs(1));
    }

    let (status, first) = send(&app, Method::GET, "/parking-spot?page=0&size=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["content"].as_array().unwrap().len(), 10);
    assert_eq!(first["totalElements"], 15);
    assert_eq!(first["totalPages"], 2);
    assert_eq!(first["first"], true);
    assert_eq!(first["last"], false);
    assert_eq!(first["content"][0]["spotNumber"], "S000");

    let (_, second) = send(&app, Method::GET, "/parking-spot?page=1&size=10", None).await;
    assert_eq!(second["numberOfElements"], 5);
    assert_eq!(second["last"], true);
    assert_eq!(second["pageable"]["offset"], 10);

    let (_, desc) = send(
        &app,
        Method::GET,
        "/parking-spot?size=3&sort=spotNumber,desc",
        None,
    )
    .await;
    let numbers: Vec<&str> = desc["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["spotNumber"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["S014", "S013", "S012"]);

    let (_, beyond) = send(&app, Method::GET, "/parking-spot?page=5", None).await;
    assert_eq!(beyond["empty"], true);
    assert_eq!(beyond["totalElements"], 15);
}

#[tokio::test]
async fn bad_paging_parameters_are_rejected() {
    let app = app();
    for uri in [
        "/parking-spot?size=0",
        "/parking-spot?sort=nope",
        "/parking-spot?sort=spotNumber,sideways",
        "/parking-spot?page=-1",
    ] {
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

struct FailingSpots;

#[async_trait]
impl ParkingSpots for FailingSpots {
    async fn create(&self, _payload: ParkingSpotPayload) -> Result<ParkingSpot, ServiceError> {
        Err(StorageError::Unavailable("connection refused".into()).into())
    }

    async fn list(&self, _request: PageRequest) -> Result<Page<ParkingSpot>, ServiceError> {
        Err(StorageError::Timeout("pool timed out".into()).into())
    }

    async fn get(&self, _id: &SpotId) -> Result<ParkingSpot, ServiceError> {
        Err(StorageError::Query("syntax error".into()).into())
    }

    async fn update(
        &self,
        _id: &SpotId,
        _payload: ParkingSpotPayload,
    ) -> Result<ParkingSpot, ServiceError> {
        Err(StorageError::Unavailable("connection refused".into()).into())
    }

    async fn delete(&self, _id: &SpotId) -> Result<(), ServiceError> {
        Err(StorageError::Unavailable("connection refused".into()).into())
    }
}

#[tokio::test]
async fn storage_failures_are_internal_errors_without_details() {
    let app = App::router(AppState::new(Arc::new(FailingSpots)));

    let (status, json) = send(&app, Method::GET, "/parking-spot", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
    assert!(!json["message"].as_str().unwrap().contains("pool"));

    let uri = format!("/parking-spot/{}", SpotId::generate());
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{FixedOffset, TimeZone};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use fleet_dashboard::config::EnvironmentConfig;
use fleet_dashboard::models::{Operator, ScheduleRow, VehicleKind, WhereaboutsPatch};
use fleet_dashboard::repositories::{
    AccountRepository, MemoryAccountRepository, MemoryTableStore, StoreError, TableStore,
};
use fleet_dashboard::routes::create_router;
use fleet_dashboard::services::schedule_exporter::XLSX_CONTENT_TYPE;
use fleet_dashboard::services::FixedClock;
use fleet_dashboard::state::AppState;

const BOUNDARY: &str = "fleet-test-boundary";

const PICKUP_CSV: &str = "vehicle_id,plate_no,driver,time_start,time_end,current_location,status,remarks\n\
V2,GBB2,Lim,08:00,12:00,Depot,Busy,\n\
V1,GBA1,Tan,09:00,10:00,Depot,Available,\n\
V1,GBA1,Tan,13:00,15:00,Site A,Available,\n";

fn test_state(store: Arc<dyn TableStore>) -> AppState {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("JWT_SECRET", "api-test-secret"),
        ("TIPPER_STATUSES", "Available,Busy,Under Repair"),
    ]);
    let config = EnvironmentConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

    // 2025-03-01 09:30 en UTC+8
    let now = FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .unwrap();

    AppState::new(
        store,
        Arc::new(MemoryAccountRepository::new()),
        config,
        Arc::new(FixedClock(now)),
    )
}

fn create_test_app() -> (Router, AppState) {
    let state = test_state(Arc::new(MemoryTableStore::new()));
    (create_router(state.clone()), state)
}

fn token(state: &AppState, can_upload: bool) -> String {
    let operator = Operator {
        username: if can_upload { "dispatcher" } else { "viewer" }.to_string(),
        password_hash: String::new(),
        can_upload,
    };
    state.jwt.issue(&operator).unwrap().0
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(uri: &str, token: Option<&str>, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = content
    );

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

async fn upload_pickups(app: &Router, state: &AppState) {
    let token = token(state, true);
    let (status, body) = send(
        app,
        upload_request("/api/schedules/pickup/upload", Some(&token), "pickup.csv", PICKUP_CSV),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["rows_imported"], 3);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_kinds_includes_configured_statuses() {
    let (app, _) = create_test_app();
    let (status, body) = send(&app, get("/api/schedules")).await;

    assert_eq!(status, StatusCode::OK);
    let kinds = body["data"].as_array().unwrap();
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[1]["kind"], "tipper");
    assert_eq!(kinds[1]["statuses"]["values"], json!(["Available", "Busy", "Under Repair"]));
    assert_eq!(kinds[2]["time_boxed"], false);
}

#[tokio::test]
async fn test_empty_dashboard_asks_for_upload() {
    let (app, _) = create_test_app();
    let (status, body) = send(&app, get("/api/schedules/machinery")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["notice"].as_str().unwrap().contains("upload"));
    assert!(body.get("load_error").is_none());
    assert_eq!(body["schedule"], json!([]));
    assert_eq!(body["now"], "2025-03-01 09:30");
}

#[tokio::test]
async fn test_unknown_kind_is_not_found() {
    let (app, _) = create_test_app();
    let (status, body) = send(&app, get("/api/schedules/forklift")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_upload_requires_session() {
    let (app, _) = create_test_app();
    let (status, body) = send(
        &app,
        upload_request("/api/schedules/pickup/upload", None, "pickup.csv", PICKUP_CSV),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_upload_without_capability_is_forbidden_and_writes_nothing() {
    let (app, state) = create_test_app();
    let token = token(&state, false);
    let (status, body) = send(
        &app,
        upload_request("/api/schedules/pickup/upload", Some(&token), "pickup.csv", PICKUP_CSV),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(state.store.load(VehicleKind::Pickup).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_with_missing_columns_is_rejected() {
    let (app, state) = create_test_app();
    upload_pickups(&app, &state).await;

    let token = token(&state, true);
    let csv = "vehicle_id,plate_no,time_start,time_end,current_location,remarks\nV9,X,08:00,09:00,Depot,\n";
    let (status, body) = send(
        &app,
        upload_request("/api/schedules/pickup/upload", Some(&token), "pickup.csv", csv),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "SCHEMA_ERROR");
    assert_eq!(body["details"]["missing_columns"], json!(["driver", "status"]));
    // La tabla anterior sigue intacta
    assert_eq!(state.store.load(VehicleKind::Pickup).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_after_upload() {
    let (app, state) = create_test_app();
    upload_pickups(&app, &state).await;

    let (status, body) = send(&app, get("/api/schedules/pickup")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("notice").is_none());
    assert_eq!(body["vehicles"], json!(["V2", "V1"]));

    let available = body["available_now"].as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["vehicle_id"], "V1");
    assert_eq!(available[0]["time_start"], "09:00");

    let schedule = body["schedule"].as_array().unwrap();
    let order: Vec<(&str, &str, bool)> = schedule
        .iter()
        .map(|e| {
            (
                e["vehicle_id"].as_str().unwrap(),
                e["time_start"].as_str().unwrap(),
                e["active_now"].as_bool().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![("V1", "09:00", true), ("V1", "13:00", false), ("V2", "08:00", true)]
    );

    let (_, filtered) = send(&app, get("/api/schedules/pickup?vehicles=V2")).await;
    assert_eq!(filtered["schedule"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["available_now"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_append_mode_keeps_existing_rows() {
    let (app, state) = create_test_app();
    upload_pickups(&app, &state).await;

    let token = token(&state, true);
    let csv = "vehicle_id,plate_no,driver,time_start,time_end,current_location,status,remarks\nV3,GBC3,Ong,16:00,18:00,Depot,Available,\n";
    let (status, body) = send(
        &app,
        upload_request("/api/schedules/pickup/upload?mode=append", Some(&token), "extra.csv", csv),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mode"], "append");
    assert_eq!(state.store.load(VehicleKind::Pickup).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_update_whereabouts_edits_active_slot() {
    let (app, state) = create_test_app();
    upload_pickups(&app, &state).await;

    let (status, target) = send(&app, get("/api/schedules/pickup/vehicles/V1/target")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(target["time_start"], "09:00");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/schedules/pickup/vehicles/V1/whereabouts",
            json!({ "current_location": "Site B", "status": "Busy", "remarks": "loading" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "Busy");
    assert_eq!(body["data"]["last_updated"], "2025-03-01 09:30");

    let rows = state.store.load(VehicleKind::Pickup).await.unwrap();
    let v1: Vec<&ScheduleRow> = rows.iter().filter(|r| r.identifier == "V1").collect();
    assert_eq!(v1[0].current_location, "Site B");
    assert_eq!(v1[1].current_location, "Site A");
    assert_eq!(v1[1].status, "Available");

    let (_, dashboard) = send(&app, get("/api/schedules/pickup")).await;
    assert_eq!(dashboard["available_now"], json!([]));
}

#[tokio::test]
async fn test_update_whereabouts_rejects_unknown_status_and_vehicle() {
    let (app, state) = create_test_app();
    upload_pickups(&app, &state).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/schedules/pickup/vehicles/V1/whereabouts",
            json!({ "current_location": "Depot", "status": "Under Repair", "remarks": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/schedules/pickup/vehicles/V404/whereabouts",
            json!({ "current_location": "Depot", "status": "Busy", "remarks": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("vehicle_id"));

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/schedules/pickup/vehicles/V1/whereabouts",
            json!({ "current_location": "Depot" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_export_returns_workbook() {
    let (app, state) = create_test_app();
    upload_pickups(&app, &state).await;

    let response = app.clone().oneshot(get("/api/schedules/pickup/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("pickup_schedule_2025-03-01.xlsx"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // Un xlsx es un zip
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_login_and_me() {
    let (app, state) = create_test_app();
    state
        .accounts
        .upsert(&Operator {
            username: "dispatcher".to_string(),
            password_hash: bcrypt::hash("s3cret-pass", 4).unwrap(),
            can_upload: true,
        })
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        json_request("POST", "/api/auth/login", json!({ "username": "dispatcher", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/auth/login", json!({ "username": "dispatcher", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "dispatcher");
    assert_eq!(body["data"]["can_upload"], true);
}

struct DownStore;

#[async_trait]
impl TableStore for DownStore {
    async fn load(&self, _kind: VehicleKind) -> Result<Vec<ScheduleRow>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn replace(&self, _kind: VehicleKind, _rows: Vec<ScheduleRow>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn append(&self, _kind: VehicleKind, _rows: Vec<ScheduleRow>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn update_row(
        &self,
        _kind: VehicleKind,
        _row_id: i64,
        _identifier: &str,
        _expected_last_updated: &str,
        _patch: &WhereaboutsPatch,
    ) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_failure_keeps_dashboard_usable() {
    let state = test_state(Arc::new(DownStore));
    let app = create_router(state);

    let (status, body) = send(&app, get("/api/schedules/tipper")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["load_error"].as_str().unwrap().contains("connection refused"));
    assert_eq!(body["available_now"], json!([]));

    let (status, body) = send(&app, get("/api/schedules/tipper/available")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");
}

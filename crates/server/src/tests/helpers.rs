// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router test fixtures.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use time::Duration;
use tower::ServiceExt;
use vgss_persistence::Persistence;

use crate::{AppState, build_router};

pub const PASSWORD: &str = "Correct-Horse-42";
pub const OFFICE_EMAIL: &str = "office@vgss.org";

pub fn create_test_app() -> Router {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_router(AppState::new(persistence, Duration::hours(1)))
}

/// Sends one request and returns the status with the JSON body.
///
/// Bodies that are not JSON (framework rejections) come back as `Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["session_token"].as_str().unwrap().to_string()
}

/// Bootstraps the office account and returns its session token.
pub async fn bootstrap_office(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({
            "email": OFFICE_EMAIL,
            "display_name": "Office Admin",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login(app, OFFICE_EMAIL).await
}

/// Provisions a principal through the office and logs it in.
pub async fn principal_token(app: &Router, office_token: &str, email: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/principals",
        Some(office_token),
        Some(json!({
            "email": email,
            "display_name": "Staff Principal",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create principal failed: {body}");
    login(app, email).await
}

/// A database holding one principal per staff role.
pub struct Principals {
    pub office: String,
    pub zone: String,
    pub department: String,
}

pub async fn setup_principals(app: &Router) -> Principals {
    let office: String = bootstrap_office(app).await;
    let zone: String = principal_token(app, &office, "zone.east@vgss.org", "Zone").await;
    let department: String =
        principal_token(app, &office, "media@vgss.org", "ServiceDepartment").await;
    Principals {
        office,
        zone,
        department,
    }
}

pub fn zone_row(phone: &str) -> Value {
    json!({
        "full_name": "Bola Ade",
        "gender": "F",
        "phone": phone,
        "university": "Obafemi Awolowo University",
        "course": "Law",
        "graduation_year": 2025,
    })
}

/// Uploads a record for `phone` and returns its id.
pub async fn upload_record(app: &Router, zone_token: &str, phone: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/zone_records",
        Some(zone_token),
        Some(json!({ "records": [zone_row(phone)] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {body}");
    body["records"][0]["zone_record_id"].as_i64().unwrap()
}

pub fn registration_body(zone_record_id: i64, email: &str) -> Value {
    json!({
        "zone_record_id": zone_record_id,
        "email": email,
        "password": PASSWORD,
        "password_confirmation": PASSWORD,
        "details": {
            "date_of_birth": "2000-09-01",
            "marital_status": "Single",
            "residential_address": "12 Road 7, Ile-Ife",
            "state_of_origin": "Osun",
            "next_of_kin_name": "Kemi Ade",
            "next_of_kin_phone": "+2348022222",
        },
    })
}

/// Uploads, registers and approves a graduate; returns the graduate id.
pub async fn eligible_graduate(
    app: &Router,
    principals: &Principals,
    phone: &str,
    email: &str,
) -> i64 {
    let zone_record_id: i64 = upload_record(app, &principals.zone, phone).await;
    let (status, body) = send(
        app,
        "POST",
        "/registrations",
        None,
        Some(registration_body(zone_record_id, email)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    let graduate_id: i64 = body["graduate"]["graduate_id"].as_i64().unwrap();

    let (status, _) = send(
        app,
        "POST",
        &format!("/graduates/{graduate_id}/actions"),
        Some(principals.office.as_str()),
        Some(json!({ "action": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    graduate_id
}

/// Creates and approves a staff request; returns its id.
pub async fn approved_request(app: &Router, principals: &Principals, number_of_staff: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/staff_requests",
        Some(principals.department.as_str()),
        Some(json!({
            "position_title": "Video Editor",
            "description": "Cut weekly service recordings",
            "number_of_staff": number_of_staff,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create request failed: {body}");
    let staff_request_id: i64 = body["staff_request_id"].as_i64().unwrap();

    let (status, _) = send(
        app,
        "POST",
        &format!("/staff_requests/{staff_request_id}/actions"),
        Some(principals.office.as_str()),
        Some(json!({ "action": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    staff_request_id
}

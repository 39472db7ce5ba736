// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};
use vgss_api::{
    ApiError, AssignGraduateRequest, AssignGraduateResponse, AuditTrailResponse,
    BootstrapOfficeRequest, BootstrapOfficeResponse, ChapterInfo, ChapterNameRequest,
    CreatePrincipalRequest, CreatePrincipalResponse, DeleteResponse, GetStaffRequestResponse,
    GraduateInfo, ListChaptersResponse, ListGraduatesRequest, ListGraduatesResponse,
    ListPrincipalsResponse, ListStaffRequestsRequest, ListStaffRequestsResponse,
    ListZoneRecordsResponse, LoginRequest, LoginResponse, LookupZoneRecordResponse,
    PrincipalStatusResponse, RegisterGraduateRequest, RegisterGraduateResponse,
    StaffRequestActionRequest, StaffRequestFields, StaffRequestInfo, TransitionGraduateRequest,
    UploadZoneRecordsRequest, UploadZoneRecordsResponse, WhoAmIResponse,
};
use vgss_audit::Cause;
use vgss_persistence::{DEFAULT_BUSY_TIMEOUT_MS, Persistence};

use crate::session::{BearerToken, SessionPrincipal};

/// VGSS Server - HTTP server for the VGSS graduate service workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Lifetime of a login session, in hours
    #[arg(long, default_value_t = 720)]
    session_ttl_hours: u32,

    /// How long a write waits for another writer's lock, in milliseconds
    #[arg(long, default_value_t = DEFAULT_BUSY_TIMEOUT_MS)]
    busy_timeout_ms: u32,
}

/// Application state shared across handlers.
///
/// Workflow correctness comes from the database transactions; the mutex
/// only serializes use of the single connection.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    session_ttl: Duration,
}

impl AppState {
    fn new(persistence: Persistence, session_ttl: Duration) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            session_ttl,
        }
    }
}

/// Query parameters for listing zone records.
#[derive(Debug, Default, Deserialize)]
struct ZoneRecordQuery {
    /// Restrict to registered (`true`) or unregistered (`false`) records.
    is_registered: Option<bool>,
}

/// Query parameters for the anonymous zone record lookup.
#[derive(Debug, Deserialize)]
struct LookupQuery {
    phone: String,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always true.
    error: bool,
    /// The error kind (`NotFound`, `Conflict`, ...).
    kind: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. }
            | ApiError::IllegalTransition { .. }
            | ApiError::CapacityExceeded { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message: String = match &err {
            ApiError::AuthenticationFailed { reason } => reason.clone(),
            _ => err.to_string(),
        };
        Self {
            status,
            kind: err.kind(),
            message,
        }
    }
}

type HttpResult<T> = Result<Json<T>, HttpError>;

/// Builds the cause recorded on audit events written by one request.
fn request_cause(operation: &str, now: OffsetDateTime) -> Cause {
    Cause::new(
        format!("http-{}", now.unix_timestamp_nanos()),
        format!("HTTP {operation}"),
    )
}

// ========================================================================
// Identity
// ========================================================================

#[allow(clippy::unused_async)]
async fn handle_health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("ok"),
    })
}

/// Handler for POST `/auth/bootstrap`.
async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BootstrapOfficeRequest>,
) -> HttpResult<BootstrapOfficeResponse> {
    info!(email = %req.email, "Handling bootstrap request");

    let mut persistence = app_state.persistence.lock().await;
    let response: BootstrapOfficeResponse =
        vgss_api::bootstrap_office(&mut persistence, req, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> HttpResult<LoginResponse> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = vgss_api::login(
        &mut persistence,
        &req,
        app_state.session_ttl,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> HttpResult<MessageResponse> {
    let mut persistence = app_state.persistence.lock().await;
    vgss_api::logout(&mut persistence, &token)?;
    Ok(Json(MessageResponse {
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/auth/whoami`.
async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, user): SessionPrincipal,
) -> HttpResult<WhoAmIResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: WhoAmIResponse = vgss_api::whoami(&mut persistence, &actor, &user)?;
    Ok(Json(response))
}

/// Handler for POST `/principals`.
async fn handle_create_principal(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Json(req): Json<CreatePrincipalRequest>,
) -> HttpResult<CreatePrincipalResponse> {
    info!(
        actor_id = actor.user_id,
        email = %req.email,
        role = %req.role,
        "Handling create_principal request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreatePrincipalResponse =
        vgss_api::create_principal(&mut persistence, req, &actor, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for GET `/principals`.
async fn handle_list_principals(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
) -> HttpResult<ListPrincipalsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListPrincipalsResponse = vgss_api::list_principals(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for POST `/principals/{id}/disable`.
async fn handle_disable_principal(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(user_id): Path<i64>,
) -> HttpResult<PrincipalStatusResponse> {
    info!(actor_id = actor.user_id, user_id, "Handling disable_principal request");

    let mut persistence = app_state.persistence.lock().await;
    let response: PrincipalStatusResponse = vgss_api::disable_principal(
        &mut persistence,
        user_id,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/principals/{id}/enable`.
async fn handle_enable_principal(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(user_id): Path<i64>,
) -> HttpResult<PrincipalStatusResponse> {
    info!(actor_id = actor.user_id, user_id, "Handling enable_principal request");

    let mut persistence = app_state.persistence.lock().await;
    let response: PrincipalStatusResponse =
        vgss_api::enable_principal(&mut persistence, user_id, &actor)?;
    Ok(Json(response))
}

// ========================================================================
// Chapters and zone records
// ========================================================================

/// Handler for POST `/chapters`.
async fn handle_create_chapter(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Json(req): Json<ChapterNameRequest>,
) -> HttpResult<ChapterInfo> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: ChapterInfo = vgss_api::create_chapter(
        &mut persistence,
        req,
        &actor,
        request_cause("create_chapter", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/chapters`.
async fn handle_list_chapters(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
) -> HttpResult<ListChaptersResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListChaptersResponse = vgss_api::list_chapters(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for PUT `/chapters/{id}`.
async fn handle_rename_chapter(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(chapter_id): Path<i64>,
    Json(req): Json<ChapterNameRequest>,
) -> HttpResult<ChapterInfo> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: ChapterInfo = vgss_api::rename_chapter(
        &mut persistence,
        chapter_id,
        req,
        &actor,
        request_cause("rename_chapter", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for DELETE `/chapters/{id}`.
async fn handle_delete_chapter(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(chapter_id): Path<i64>,
) -> HttpResult<DeleteResponse> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vgss_api::delete_chapter(
        &mut persistence,
        chapter_id,
        &actor,
        request_cause("delete_chapter", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/zone_records`.
///
/// Uploads one batch of records for the calling zone.
async fn handle_upload_zone_records(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Json(req): Json<UploadZoneRecordsRequest>,
) -> HttpResult<UploadZoneRecordsResponse> {
    info!(
        zone_id = actor.user_id,
        rows = req.records.len(),
        "Handling zone record upload"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: UploadZoneRecordsResponse = vgss_api::upload_zone_records(
        &mut persistence,
        req,
        &actor,
        request_cause("upload_zone_records", now),
        now,
    )?;

    info!(
        zone_id = actor.user_id,
        uploaded = response.uploaded,
        "Zone records uploaded"
    );
    Ok(Json(response))
}

/// Handler for GET `/zone_records`.
async fn handle_list_zone_records(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Query(query): Query<ZoneRecordQuery>,
) -> HttpResult<ListZoneRecordsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListZoneRecordsResponse =
        vgss_api::list_zone_records(&mut persistence, query.is_registered, &actor)?;
    Ok(Json(response))
}

/// Handler for DELETE `/zone_records/{id}`.
async fn handle_delete_zone_record(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(zone_record_id): Path<i64>,
) -> HttpResult<DeleteResponse> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vgss_api::delete_zone_record(
        &mut persistence,
        zone_record_id,
        &actor,
        request_cause("delete_zone_record", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/zone_records/lookup?phone=`.
///
/// Anonymous.
async fn handle_lookup_zone_record(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<LookupQuery>,
) -> HttpResult<LookupZoneRecordResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LookupZoneRecordResponse =
        vgss_api::lookup_zone_record(&mut persistence, &query.phone)?;
    Ok(Json(response))
}

// ========================================================================
// Graduates
// ========================================================================

/// Handler for POST `/registrations`.
///
/// Anonymous self-registration against a zone record.
async fn handle_register_graduate(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterGraduateRequest>,
) -> HttpResult<RegisterGraduateResponse> {
    info!(
        zone_record_id = req.zone_record_id,
        "Handling graduate registration"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterGraduateResponse = vgss_api::register_graduate(
        &mut persistence,
        req,
        request_cause("register_graduate", now),
        now,
    )?;

    info!(
        graduate_id = response.graduate.graduate_id,
        "Graduate registered"
    );
    Ok(Json(response))
}

/// Handler for GET `/graduates`.
async fn handle_list_graduates(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Query(query): Query<ListGraduatesRequest>,
) -> HttpResult<ListGraduatesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListGraduatesResponse =
        vgss_api::list_graduates(&mut persistence, &query, &actor)?;
    Ok(Json(response))
}

/// Handler for GET `/graduates/me`.
async fn handle_my_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
) -> HttpResult<GraduateInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GraduateInfo = vgss_api::my_profile(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for GET `/graduates/{id}`.
async fn handle_get_graduate(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(graduate_id): Path<i64>,
) -> HttpResult<GraduateInfo> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GraduateInfo = vgss_api::get_graduate(&mut persistence, graduate_id, &actor)?;
    Ok(Json(response))
}

/// Handler for POST `/graduates/{id}/actions`.
async fn handle_transition_graduate(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(graduate_id): Path<i64>,
    Json(req): Json<TransitionGraduateRequest>,
) -> HttpResult<GraduateInfo> {
    info!(
        actor_id = actor.user_id,
        graduate_id,
        action = %req.action,
        "Handling graduate transition"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: GraduateInfo = vgss_api::transition_graduate(
        &mut persistence,
        graduate_id,
        &req,
        &actor,
        request_cause("transition_graduate", now),
        now,
    )?;
    Ok(Json(response))
}

// ========================================================================
// Staff requests
// ========================================================================

/// Handler for POST `/staff_requests`.
async fn handle_create_staff_request(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Json(req): Json<StaffRequestFields>,
) -> HttpResult<StaffRequestInfo> {
    info!(
        department_id = actor.user_id,
        position = %req.position_title,
        number_of_staff = req.number_of_staff,
        "Handling create_staff_request"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: StaffRequestInfo = vgss_api::create_staff_request(
        &mut persistence,
        req,
        &actor,
        request_cause("create_staff_request", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/staff_requests`.
async fn handle_list_staff_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Query(query): Query<ListStaffRequestsRequest>,
) -> HttpResult<ListStaffRequestsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListStaffRequestsResponse =
        vgss_api::list_staff_requests(&mut persistence, &query, &actor)?;
    Ok(Json(response))
}

/// Handler for GET `/staff_requests/{id}`.
async fn handle_get_staff_request(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(staff_request_id): Path<i64>,
) -> HttpResult<GetStaffRequestResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GetStaffRequestResponse =
        vgss_api::get_staff_request(&mut persistence, staff_request_id, &actor)?;
    Ok(Json(response))
}

/// Handler for PUT `/staff_requests/{id}`.
async fn handle_edit_staff_request(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(staff_request_id): Path<i64>,
    Json(req): Json<StaffRequestFields>,
) -> HttpResult<StaffRequestInfo> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: StaffRequestInfo = vgss_api::edit_staff_request(
        &mut persistence,
        staff_request_id,
        req,
        &actor,
        request_cause("edit_staff_request", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for DELETE `/staff_requests/{id}`.
async fn handle_delete_staff_request(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(staff_request_id): Path<i64>,
) -> HttpResult<DeleteResponse> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = vgss_api::delete_staff_request(
        &mut persistence,
        staff_request_id,
        &actor,
        request_cause("delete_staff_request", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/staff_requests/{id}/actions`.
///
/// Approves, rejects or cancels a pending request.
async fn handle_staff_request_action(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(staff_request_id): Path<i64>,
    Json(req): Json<StaffRequestActionRequest>,
) -> HttpResult<StaffRequestInfo> {
    info!(
        actor_id = actor.user_id,
        staff_request_id,
        action = %req.action,
        "Handling staff request action"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: StaffRequestInfo = vgss_api::staff_request_action(
        &mut persistence,
        staff_request_id,
        req,
        &actor,
        request_cause("staff_request_action", now),
        now,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/staff_requests/{id}/assignments`.
async fn handle_assign_graduate(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path(staff_request_id): Path<i64>,
    Json(req): Json<AssignGraduateRequest>,
) -> HttpResult<AssignGraduateResponse> {
    info!(
        actor_id = actor.user_id,
        staff_request_id,
        graduate_id = req.graduate_id,
        "Handling assign_graduate"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let response: AssignGraduateResponse = vgss_api::assign_graduate(
        &mut persistence,
        staff_request_id,
        req,
        &actor,
        request_cause("assign_graduate", now),
        now,
    )?;

    info!(
        staff_request_id,
        fulfilled = response.request.fulfilled_count,
        status = %response.request.status,
        "Graduate assigned"
    );
    Ok(Json(response))
}

/// Handler for GET `/audit/{entity_type}/{entity_id}`.
async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(actor, _): SessionPrincipal,
    Path((entity_type, entity_id)): Path<(String, i64)>,
) -> HttpResult<AuditTrailResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTrailResponse =
        vgss_api::get_audit_trail(&mut persistence, &entity_type, entity_id, &actor)?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route(
            "/principals",
            post(handle_create_principal).get(handle_list_principals),
        )
        .route("/principals/{id}/disable", post(handle_disable_principal))
        .route("/principals/{id}/enable", post(handle_enable_principal))
        .route(
            "/chapters",
            post(handle_create_chapter).get(handle_list_chapters),
        )
        .route(
            "/chapters/{id}",
            delete(handle_delete_chapter).put(handle_rename_chapter),
        )
        .route(
            "/zone_records",
            post(handle_upload_zone_records).get(handle_list_zone_records),
        )
        .route("/zone_records/lookup", get(handle_lookup_zone_record))
        .route("/zone_records/{id}", delete(handle_delete_zone_record))
        .route("/registrations", post(handle_register_graduate))
        .route("/graduates", get(handle_list_graduates))
        .route("/graduates/me", get(handle_my_profile))
        .route("/graduates/{id}", get(handle_get_graduate))
        .route(
            "/graduates/{id}/actions",
            post(handle_transition_graduate),
        )
        .route(
            "/staff_requests",
            post(handle_create_staff_request).get(handle_list_staff_requests),
        )
        .route(
            "/staff_requests/{id}",
            get(handle_get_staff_request)
                .put(handle_edit_staff_request)
                .delete(handle_delete_staff_request),
        )
        .route(
            "/staff_requests/{id}/actions",
            post(handle_staff_request_action),
        )
        .route(
            "/staff_requests/{id}/assignments",
            post(handle_assign_graduate),
        )
        .route(
            "/audit/{entity_type}/{entity_id}",
            get(handle_audit_trail),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing VGSS Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!(
            busy_timeout_ms = args.busy_timeout_ms,
            "Using file-based database at: {}", db_path
        );
        Persistence::new_with_file(db_path, args.busy_timeout_ms)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let session_ttl: Duration = Duration::hours(i64::from(args.session_ttl_hours));
    let app: Router = build_router(AppState::new(persistence, session_ttl));

    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

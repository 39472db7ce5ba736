// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler authorizes first, then delegates to the persistence layer,
//! then maps the result into a response DTO. Handlers are synchronous; the
//! server decides how they are scheduled.

use num_traits::cast::ToPrimitive;
use std::str::FromStr;
use time::{Duration, OffsetDateTime};
use tracing::info;
use vgss::{AssignGraduate, ChapterCommand};
use vgss_audit::{Actor, Cause, EntityType};
use vgss_domain::{
    Chapter, DomainError, Gender, GraduateAction, GraduateProfile, GraduateStatus, NewZoneRecord,
    RegistrationForm, StaffRequest, StaffRequestAction, StaffRequestAssignment, StaffRequestDraft,
    StaffRequestStatus, Urgency, ZoneRecord, normalize_phone, require_field, validate_email,
};
use vgss_persistence::{
    GraduateFilter, OFFICE_ROLE, Persistence, StaffRequestFilter, StoredAuditEvent, UserData,
    ZoneRecordFilter,
};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::capabilities::{
    compute_global_capabilities, compute_principal_capabilities, compute_staff_request_capabilities,
};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::{AccountIdentity, PasswordPolicy};
use crate::request_response::{
    AssignGraduateRequest, AssignGraduateResponse, AssignmentInfo, AuditEventInfo,
    AuditTrailResponse, BootstrapOfficeRequest, BootstrapOfficeResponse, ChapterInfo,
    ChapterNameRequest, CreatePrincipalRequest, CreatePrincipalResponse, DeleteResponse,
    GetStaffRequestResponse, GraduateInfo, ListChaptersResponse, ListGraduatesRequest,
    ListGraduatesResponse, ListPrincipalsResponse, ListStaffRequestsRequest,
    ListStaffRequestsResponse, ListZoneRecordsResponse, LoginRequest, LoginResponse,
    LookupZoneRecordResponse, PrincipalInfo, PrincipalStatusResponse, RegisterGraduateRequest,
    RegisterGraduateResponse, StaffRequestActionRequest, StaffRequestFields, StaffRequestInfo,
    TransitionGraduateRequest, UploadZoneRecordsRequest, UploadZoneRecordsResponse, WhoAmIResponse,
    ZoneRecordInfo, ZoneRecordLookupInfo,
};

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

fn read_failed(what: &str) -> impl FnOnce(vgss_persistence::PersistenceError) -> ApiError + '_ {
    move |e| ApiError::Internal {
        message: format!("Failed to {what}: {e}"),
    }
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(T::from_str)
        .transpose()
        .map_err(translate_domain_error)
}

fn staff_request_info(actor: &AuthenticatedActor, request: &StaffRequest) -> StaffRequestInfo {
    StaffRequestInfo::new(request, compute_staff_request_capabilities(actor, request))
}

fn load_staff_request(
    persistence: &mut Persistence,
    staff_request_id: i64,
) -> ApiResult<StaffRequest> {
    persistence
        .get_staff_request(staff_request_id)
        .map_err(read_failed("load staff request"))?
        .ok_or_else(|| translate_domain_error(DomainError::RequestNotFound(staff_request_id)))
}

fn load_graduate(persistence: &mut Persistence, graduate_id: i64) -> ApiResult<GraduateProfile> {
    persistence
        .get_graduate(graduate_id)
        .map_err(read_failed("load graduate"))?
        .ok_or_else(|| translate_domain_error(DomainError::GraduateNotFound(graduate_id)))
}

fn load_principal(persistence: &mut Persistence, user_id: i64) -> ApiResult<UserData> {
    persistence
        .get_user_by_id(user_id)
        .map_err(read_failed("load principal"))?
        .ok_or_else(|| ApiError::not_found("Principal", format!("Principal {user_id} not found")))
}

/// Validates an account's email, display name and password before it is
/// stored.
fn validate_new_account(
    email: &str,
    display_name: &str,
    password: &str,
    password_confirmation: &str,
) -> ApiResult<()> {
    require_field("email", email).map_err(translate_domain_error)?;
    validate_email(email).map_err(translate_domain_error)?;
    require_field("display_name", display_name).map_err(translate_domain_error)?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        password,
        password_confirmation,
        AccountIdentity {
            email,
            display_name,
        },
    )?;
    Ok(())
}

// ========================================================================
// Identity
// ========================================================================

/// Creates the first VGSS office principal.
///
/// Only legal while no principal exists.
///
/// # Errors
///
/// Returns `Conflict` once the system is bootstrapped, a validation or
/// password policy error for bad input, or `Internal` on storage failure.
pub fn bootstrap_office(
    persistence: &mut Persistence,
    request: BootstrapOfficeRequest,
    now: OffsetDateTime,
) -> ApiResult<BootstrapOfficeResponse> {
    validate_new_account(
        &request.email,
        &request.display_name,
        &request.password,
        &request.password_confirmation,
    )?;

    let user_id: i64 = persistence
        .bootstrap_first_user(
            &request.email,
            &request.display_name,
            &request.password,
            OFFICE_ROLE,
            now,
        )
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Conflict {
            rule: String::from("bootstrap_once"),
            message: String::from("The system has already been bootstrapped"),
        })?;

    info!(user_id, "Bootstrapped first office principal");

    Ok(BootstrapOfficeResponse {
        user_id,
        email: request.email.trim().to_lowercase(),
        message: String::from("Office account created"),
    })
}

/// Authenticates a principal and opens a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for bad credentials or a disabled account.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_ttl: Duration,
    now: OffsetDateTime,
) -> ApiResult<LoginResponse> {
    let (session_token, actor, user): (String, AuthenticatedActor, UserData) =
        AuthenticationService::login(
            persistence,
            &request.email,
            &request.password,
            session_ttl,
            now,
        )?;

    Ok(LoginResponse {
        session_token,
        user_id: user.user_id,
        email: user.email,
        display_name: user.display_name,
        role: actor.role.as_str().to_string(),
        expires_at: now + session_ttl,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> ApiResult<()> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Describes the authenticated principal and its capabilities.
///
/// # Errors
///
/// Returns `Internal` if the graduate profile lookup fails.
pub fn whoami(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    user: &UserData,
) -> ApiResult<WhoAmIResponse> {
    let graduate_id: Option<i64> = if actor.role == Role::Graduate {
        persistence
            .get_graduate_by_user(actor.user_id)
            .map_err(read_failed("load graduate profile"))?
            .map(|profile| profile.graduate_id)
    } else {
        None
    };

    Ok(WhoAmIResponse {
        user_id: user.user_id,
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        role: actor.role.as_str().to_string(),
        graduate_id,
        capabilities: compute_global_capabilities(actor),
    })
}

/// Provisions an office, zone or department principal.
///
/// Graduate principals are only created by self-registration.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff, a validation
/// error for bad input, or `Conflict` for a taken email.
pub fn create_principal(
    persistence: &mut Persistence,
    request: CreatePrincipalRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> ApiResult<CreatePrincipalResponse> {
    AuthorizationService::authorize_office(actor, "create_principal")?;

    let role: Role = Role::from_str(&request.role)
        .map_err(|message| ApiError::invalid_input("role", message))?;
    if role == Role::Graduate {
        return Err(ApiError::invalid_input(
            "role",
            "Graduate accounts are created by self-registration",
        ));
    }

    validate_new_account(
        &request.email,
        &request.display_name,
        &request.password,
        &request.password_confirmation,
    )?;

    if persistence
        .get_user_by_email(&request.email)
        .map_err(read_failed("check email"))?
        .is_some()
    {
        return Err(translate_domain_error(DomainError::DuplicateEmail(
            request.email.trim().to_lowercase(),
        )));
    }

    let user_id: i64 = persistence
        .create_user(
            &request.email,
            request.display_name.trim(),
            &request.password,
            role.as_str(),
            now,
        )
        .map_err(translate_persistence_error)?;

    info!(
        user_id,
        created_by = actor.user_id,
        role = %role,
        "Principal created"
    );

    Ok(CreatePrincipalResponse {
        user_id,
        email: request.email.trim().to_lowercase(),
        role: role.as_str().to_string(),
        message: format!("{role} account created"),
    })
}

/// Lists all principals with per-principal capabilities.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff.
pub fn list_principals(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> ApiResult<ListPrincipalsResponse> {
    AuthorizationService::authorize_office(actor, "list_principals")?;

    let active_office_count: i64 = persistence
        .count_active_office_users()
        .map_err(read_failed("count office principals"))?;
    let principals: Vec<PrincipalInfo> = persistence
        .list_users()
        .map_err(read_failed("list principals"))?
        .iter()
        .map(|user| {
            PrincipalInfo::new(
                user,
                compute_principal_capabilities(actor, user, active_office_count),
            )
        })
        .collect();

    Ok(ListPrincipalsResponse { principals })
}

/// Disables a principal and ends its sessions.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff, `NotFound` for
/// an unknown principal, or `Conflict` when the target is the last active
/// office account.
pub fn disable_principal(
    persistence: &mut Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> ApiResult<PrincipalStatusResponse> {
    AuthorizationService::authorize_office(actor, "disable_principal")?;

    let target: UserData = load_principal(persistence, user_id)?;
    if !target.is_disabled && target.role == OFFICE_ROLE {
        let active_office_count: i64 = persistence
            .count_active_office_users()
            .map_err(read_failed("count office principals"))?;
        if active_office_count <= 1 {
            return Err(ApiError::Conflict {
                rule: String::from("last_active_office"),
                message: String::from("Cannot disable the last active office account"),
            });
        }
    }

    persistence
        .disable_user(user_id, now)
        .map_err(translate_persistence_error)?;

    info!(user_id, disabled_by = actor.user_id, "Principal disabled");

    Ok(PrincipalStatusResponse {
        user_id,
        is_disabled: true,
        message: String::from("Principal disabled"),
    })
}

/// Re-enables a disabled principal.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff, or `NotFound`
/// for an unknown principal.
pub fn enable_principal(
    persistence: &mut Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> ApiResult<PrincipalStatusResponse> {
    AuthorizationService::authorize_office(actor, "enable_principal")?;

    load_principal(persistence, user_id)?;
    persistence
        .enable_user(user_id)
        .map_err(translate_persistence_error)?;

    info!(user_id, enabled_by = actor.user_id, "Principal enabled");

    Ok(PrincipalStatusResponse {
        user_id,
        is_disabled: false,
        message: String::from("Principal enabled"),
    })
}

// ========================================================================
// Chapters
// ========================================================================

fn change_chapter(
    persistence: &mut Persistence,
    command: &ChapterCommand,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<Option<Chapter>> {
    AuthorizationService::authorize_zone(actor, command.action_name())?;
    persistence
        .change_chapter(actor.user_id, command, actor.to_audit_actor(), cause, now)
        .map_err(translate_persistence_error)
}

fn expect_chapter(chapter: Option<Chapter>) -> ApiResult<ChapterInfo> {
    chapter
        .as_ref()
        .map(ChapterInfo::from)
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Chapter change returned no chapter"),
        })
}

/// Creates a chapter in the caller's zone.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is a zone, a validation error
/// for an empty name, or `Conflict` for a name already used in the zone.
pub fn create_chapter(
    persistence: &mut Persistence,
    request: ChapterNameRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<ChapterInfo> {
    let command: ChapterCommand = ChapterCommand::Create { name: request.name };
    expect_chapter(change_chapter(persistence, &command, actor, cause, now)?)
}

/// Renames a chapter of the caller's zone.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is a zone, `NotFound` for a
/// chapter outside the zone, or `Conflict` for a taken name.
pub fn rename_chapter(
    persistence: &mut Persistence,
    chapter_id: i64,
    request: ChapterNameRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<ChapterInfo> {
    let command: ChapterCommand = ChapterCommand::Rename {
        chapter_id,
        name: request.name,
    };
    expect_chapter(change_chapter(persistence, &command, actor, cause, now)?)
}

/// Deletes a chapter of the caller's zone.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is a zone, or `NotFound` for a
/// chapter outside the zone.
pub fn delete_chapter(
    persistence: &mut Persistence,
    chapter_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<DeleteResponse> {
    let command: ChapterCommand = ChapterCommand::Delete { chapter_id };
    change_chapter(persistence, &command, actor, cause, now)?;
    Ok(DeleteResponse {
        id: chapter_id,
        message: String::from("Chapter deleted"),
    })
}

/// Lists chapters: a zone sees its own, office staff see all.
///
/// # Errors
///
/// Returns `Unauthorized` for other roles.
pub fn list_chapters(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> ApiResult<ListChaptersResponse> {
    AuthorizationService::authorize_zone_or_office(actor, "list_chapters")?;

    let zone_id: Option<i64> = (actor.role == Role::Zone).then_some(actor.user_id);
    let chapters: Vec<ChapterInfo> = persistence
        .list_chapters(zone_id)
        .map_err(read_failed("list chapters"))?
        .iter()
        .map(ChapterInfo::from)
        .collect();

    Ok(ListChaptersResponse { chapters })
}

// ========================================================================
// Zone records
// ========================================================================

/// Uploads a batch of zone records for the caller's zone.
///
/// The batch is stored entirely or not at all.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is a zone, a validation error
/// naming the first bad row, or `Conflict` for a duplicated phone.
pub fn upload_zone_records(
    persistence: &mut Persistence,
    request: UploadZoneRecordsRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<UploadZoneRecordsResponse> {
    AuthorizationService::authorize_zone(actor, "upload_zone_records")?;

    let records: Vec<NewZoneRecord> = request
        .records
        .into_iter()
        .map(|row| -> ApiResult<NewZoneRecord> {
            Ok(NewZoneRecord {
                gender: Gender::from_str(&row.gender).map_err(translate_domain_error)?,
                full_name: row.full_name,
                phone: row.phone,
                university: row.university,
                course: row.course,
                graduation_year: row.graduation_year,
                chapter_id: row.chapter_id,
                pastor_name: row.pastor_name,
                pastor_phone: row.pastor_phone,
            })
        })
        .collect::<ApiResult<Vec<NewZoneRecord>>>()?;

    let stored: Vec<ZoneRecord> = persistence
        .upload_zone_records(actor.user_id, &records, actor.to_audit_actor(), cause, now)
        .map_err(translate_persistence_error)?;

    Ok(UploadZoneRecordsResponse {
        zone_id: actor.user_id,
        uploaded: stored.len(),
        records: stored.iter().map(ZoneRecordInfo::from).collect(),
        message: format!("Uploaded {} records", stored.len()),
    })
}

/// Lists zone records: a zone sees its own, office staff see all.
///
/// # Errors
///
/// Returns `Unauthorized` for other roles.
pub fn list_zone_records(
    persistence: &mut Persistence,
    is_registered: Option<bool>,
    actor: &AuthenticatedActor,
) -> ApiResult<ListZoneRecordsResponse> {
    AuthorizationService::authorize_zone_or_office(actor, "list_zone_records")?;

    let filter: ZoneRecordFilter = ZoneRecordFilter {
        zone_id: (actor.role == Role::Zone).then_some(actor.user_id),
        is_registered,
    };
    let records: Vec<ZoneRecordInfo> = persistence
        .list_zone_records(filter)
        .map_err(read_failed("list zone records"))?
        .iter()
        .map(ZoneRecordInfo::from)
        .collect();

    Ok(ListZoneRecordsResponse { records })
}

/// Deletes an unregistered record owned by the caller's zone.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is the owning zone, `NotFound`
/// for an unknown record, or `IllegalTransition` for a registered record.
pub fn delete_zone_record(
    persistence: &mut Persistence,
    zone_record_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<DeleteResponse> {
    let action: &str = "delete_zone_record";
    AuthorizationService::authorize_zone(actor, action)?;

    let record: Option<ZoneRecord> = persistence
        .get_zone_record(zone_record_id)
        .map_err(read_failed("load zone record"))?;
    if record.is_some_and(|r| r.zone_id != actor.user_id) {
        return Err(ApiError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("owning Zone"),
        });
    }

    persistence
        .delete_zone_record(zone_record_id, actor.to_audit_actor(), cause, now)
        .map_err(translate_persistence_error)?;

    Ok(DeleteResponse {
        id: zone_record_id,
        message: String::from("Zone record deleted"),
    })
}

/// Finds unregistered records by phone for self-registration.
///
/// Anonymous; returns only the fields a graduate needs to recognise their
/// own record.
///
/// # Errors
///
/// Returns a validation error for an empty phone.
pub fn lookup_zone_record(
    persistence: &mut Persistence,
    phone: &str,
) -> ApiResult<LookupZoneRecordResponse> {
    require_field("phone", phone).map_err(translate_domain_error)?;

    let matches: Vec<ZoneRecordLookupInfo> = persistence
        .find_unregistered_by_phone(&normalize_phone(phone))
        .map_err(read_failed("look up zone record"))?
        .iter()
        .map(ZoneRecordLookupInfo::from)
        .collect();

    Ok(LookupZoneRecordResponse { matches })
}

// ========================================================================
// Graduates
// ========================================================================

/// Registers a graduate against an unregistered zone record.
///
/// Anonymous. The password policy is checked once the record is known to
/// be claimable and a password was supplied; the remaining rules are
/// enforced inside the registration transaction.
///
/// # Errors
///
/// Returns `NotFound` for an unknown record, `Conflict` for a registered
/// record or taken email, or a validation or password policy error.
pub fn register_graduate(
    persistence: &mut Persistence,
    request: RegisterGraduateRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<RegisterGraduateResponse> {
    let record: Option<ZoneRecord> = persistence
        .get_zone_record(request.zone_record_id)
        .map_err(read_failed("load zone record"))?;

    if let Some(record) = record.as_ref().filter(|r| !r.is_registered)
        && !request.password.trim().is_empty()
    {
        let policy: PasswordPolicy = PasswordPolicy::default();
        policy.validate(
            &request.password,
            &request.password_confirmation,
            AccountIdentity {
                email: &request.email,
                display_name: &record.full_name,
            },
        )?;
    }

    let form: RegistrationForm = RegistrationForm {
        email: request.email,
        password: request.password,
        password_confirmation: request.password_confirmation,
        details: request.details.into(),
    };

    let profile: GraduateProfile = persistence
        .register_graduate(
            request.zone_record_id,
            &form,
            Actor::anonymous(),
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    Ok(RegisterGraduateResponse {
        graduate: GraduateInfo::from(&profile),
        message: String::from("Registration received and under review"),
    })
}

/// Reads one graduate profile.
///
/// # Errors
///
/// Returns `NotFound` for an unknown graduate, or `Unauthorized` when the
/// actor may not see the profile.
pub fn get_graduate(
    persistence: &mut Persistence,
    graduate_id: i64,
    actor: &AuthenticatedActor,
) -> ApiResult<GraduateInfo> {
    let profile: GraduateProfile = load_graduate(persistence, graduate_id)?;
    AuthorizationService::authorize_view_graduate(actor, &profile)?;
    Ok(GraduateInfo::from(&profile))
}

/// Reads the calling graduate's own profile.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is a graduate, or `NotFound` if
/// the principal has no profile.
pub fn my_profile(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> ApiResult<GraduateInfo> {
    AuthorizationService::authorize_graduate(actor, "my_profile")?;

    let profile: GraduateProfile = persistence
        .get_graduate_by_user(actor.user_id)
        .map_err(read_failed("load graduate profile"))?
        .ok_or_else(|| {
            ApiError::not_found(
                "Graduate",
                format!("No profile for principal {}", actor.user_id),
            )
        })?;

    Ok(GraduateInfo::from(&profile))
}

/// Lists graduates.
///
/// Office staff may filter by status, approval and availability; a
/// department sees the graduates serving it.
///
/// # Errors
///
/// Returns `Unauthorized` for other roles, or a validation error for an
/// unknown status.
pub fn list_graduates(
    persistence: &mut Persistence,
    request: &ListGraduatesRequest,
    actor: &AuthenticatedActor,
) -> ApiResult<ListGraduatesResponse> {
    let status: Option<GraduateStatus> = parse_optional(request.status.as_deref())?;

    let filter: GraduateFilter = match actor.role {
        Role::VgssOffice => GraduateFilter {
            status,
            is_approved: request.is_approved,
            available_only: request.available_only,
            service_department_id: None,
        },
        Role::ServiceDepartment => GraduateFilter {
            status,
            service_department_id: Some(actor.user_id),
            ..GraduateFilter::default()
        },
        Role::Zone | Role::Graduate => {
            return Err(ApiError::Unauthorized {
                action: String::from("list_graduates"),
                required_role: String::from("VgssOffice or ServiceDepartment"),
            });
        }
    };

    let graduates: Vec<GraduateInfo> = persistence
        .list_graduates(filter)
        .map_err(read_failed("list graduates"))?
        .iter()
        .map(GraduateInfo::from)
        .collect();

    Ok(ListGraduatesResponse { graduates })
}

/// Applies an office action to a graduate profile.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff, a validation
/// error for an unknown action or status, or `NotFound` for an unknown
/// graduate.
pub fn transition_graduate(
    persistence: &mut Persistence,
    graduate_id: i64,
    request: &TransitionGraduateRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<GraduateInfo> {
    AuthorizationService::authorize_office(actor, "transition_graduate")?;

    let action: GraduateAction = GraduateAction::parse(&request.action, request.status.as_deref())
        .map_err(translate_domain_error)?;

    let profile: GraduateProfile = persistence
        .transition_graduate(
            graduate_id,
            action,
            request.comments.as_deref(),
            actor.to_audit_actor(),
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    Ok(GraduateInfo::from(&profile))
}

// ========================================================================
// Staff requests
// ========================================================================

fn build_draft(fields: StaffRequestFields) -> ApiResult<StaffRequestDraft> {
    let number_of_staff: u8 = fields.number_of_staff.to_u8().ok_or_else(|| {
        translate_domain_error(DomainError::InvalidField {
            field: "number_of_staff",
            reason: format!("{} is out of range", fields.number_of_staff),
        })
    })?;
    let urgency: Urgency = parse_optional(fields.urgency.as_deref())?.unwrap_or_default();
    let preferred_gender: Option<Gender> = parse_optional(fields.preferred_gender.as_deref())?;

    Ok(StaffRequestDraft {
        position_title: fields.position_title,
        description: fields.description,
        number_of_staff,
        skills: fields.skills,
        qualifications: fields.qualifications,
        preferred_gender,
        urgency,
    })
}

/// Creates a pending staff request for the calling department.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is a department, or a
/// validation error for bad fields.
pub fn create_staff_request(
    persistence: &mut Persistence,
    fields: StaffRequestFields,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<StaffRequestInfo> {
    AuthorizationService::authorize_department(actor, "create_staff_request")?;

    let draft: StaffRequestDraft = build_draft(fields)?;
    let request: StaffRequest = persistence
        .create_staff_request(actor.user_id, &draft, actor.to_audit_actor(), cause, now)
        .map_err(translate_persistence_error)?;

    Ok(staff_request_info(actor, &request))
}

/// Lists staff requests, newest first.
///
/// Office staff see all requests, a department its own.
///
/// # Errors
///
/// Returns `Unauthorized` for other roles, or a validation error for an
/// unknown status.
pub fn list_staff_requests(
    persistence: &mut Persistence,
    request: &ListStaffRequestsRequest,
    actor: &AuthenticatedActor,
) -> ApiResult<ListStaffRequestsResponse> {
    let status: Option<StaffRequestStatus> = parse_optional(request.status.as_deref())?;

    let department_id: Option<i64> = match actor.role {
        Role::VgssOffice => None,
        Role::ServiceDepartment => Some(actor.user_id),
        Role::Zone | Role::Graduate => {
            return Err(ApiError::Unauthorized {
                action: String::from("list_staff_requests"),
                required_role: String::from("VgssOffice or ServiceDepartment"),
            });
        }
    };

    let requests: Vec<StaffRequestInfo> = persistence
        .list_staff_requests(StaffRequestFilter {
            department_id,
            status,
        })
        .map_err(read_failed("list staff requests"))?
        .iter()
        .map(|r| staff_request_info(actor, r))
        .collect();

    Ok(ListStaffRequestsResponse { requests })
}

/// Reads a staff request with its assignments.
///
/// # Errors
///
/// Returns `NotFound` for an unknown request, or `Unauthorized` unless the
/// actor is office staff or the owning department.
pub fn get_staff_request(
    persistence: &mut Persistence,
    staff_request_id: i64,
    actor: &AuthenticatedActor,
) -> ApiResult<GetStaffRequestResponse> {
    let request: StaffRequest = load_staff_request(persistence, staff_request_id)?;
    AuthorizationService::authorize_request_owner_or_office(actor, &request, "view_staff_request")?;

    let assignments: Vec<StaffRequestAssignment> = persistence
        .list_assignments(staff_request_id)
        .map_err(read_failed("list assignments"))?;

    Ok(GetStaffRequestResponse {
        request: staff_request_info(actor, &request),
        assignments: assignments.iter().map(AssignmentInfo::from).collect(),
    })
}

fn apply_staff_request_action(
    persistence: &mut Persistence,
    staff_request_id: i64,
    action: &StaffRequestAction,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<StaffRequestInfo> {
    let request: StaffRequest = load_staff_request(persistence, staff_request_id)?;
    AuthorizationService::authorize_staff_request_action(actor, &request, action)?;

    let updated: StaffRequest = persistence
        .transition_staff_request(
            staff_request_id,
            action,
            actor.to_audit_actor(),
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    Ok(staff_request_info(actor, &updated))
}

/// Replaces the fields of a pending request owned by the caller.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized` for anyone but the owning department,
/// `IllegalTransition` unless the request is pending, or a validation error.
pub fn edit_staff_request(
    persistence: &mut Persistence,
    staff_request_id: i64,
    fields: StaffRequestFields,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<StaffRequestInfo> {
    let action: StaffRequestAction = StaffRequestAction::Edit(build_draft(fields)?);
    apply_staff_request_action(persistence, staff_request_id, &action, actor, cause, now)
}

/// Approves, rejects or cancels a staff request.
///
/// # Errors
///
/// Returns a validation error for an unknown action, `NotFound`,
/// `Unauthorized` for the wrong role or owner, or `IllegalTransition`
/// unless the request is pending.
pub fn staff_request_action(
    persistence: &mut Persistence,
    staff_request_id: i64,
    request: StaffRequestActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<StaffRequestInfo> {
    let action: StaffRequestAction = match request.action.trim() {
        "approve" => StaffRequestAction::Approve,
        "reject" => StaffRequestAction::Reject {
            reason: request.reason.unwrap_or_default(),
        },
        "cancel" => StaffRequestAction::Cancel,
        other => {
            return Err(translate_domain_error(DomainError::InvalidAction(
                other.to_string(),
            )));
        }
    };
    apply_staff_request_action(persistence, staff_request_id, &action, actor, cause, now)
}

/// Deletes a pending or cancelled staff request.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized` unless the actor is office staff or
/// the owning department, or `IllegalTransition` for other statuses.
pub fn delete_staff_request(
    persistence: &mut Persistence,
    staff_request_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<DeleteResponse> {
    let request: StaffRequest = load_staff_request(persistence, staff_request_id)?;
    AuthorizationService::authorize_request_owner_or_office(
        actor,
        &request,
        "delete_staff_request",
    )?;

    persistence
        .delete_staff_request(staff_request_id, actor.to_audit_actor(), cause, now)
        .map_err(translate_persistence_error)?;

    Ok(DeleteResponse {
        id: staff_request_id,
        message: String::from("Staff request deleted"),
    })
}

/// Assigns a graduate to an approved staff request.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff, or the
/// assignment rejection (`NotFound`, `IllegalTransition`,
/// `CapacityExceeded` or `Conflict`).
pub fn assign_graduate(
    persistence: &mut Persistence,
    staff_request_id: i64,
    request: AssignGraduateRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> ApiResult<AssignGraduateResponse> {
    AuthorizationService::authorize_office(actor, "assign_graduate")?;

    let command: AssignGraduate = AssignGraduate {
        staff_request_id,
        graduate_id: request.graduate_id,
        notes: request.notes.filter(|n| !n.trim().is_empty()),
    };
    let updated: StaffRequest = persistence
        .assign_graduate(&command, actor.to_audit_actor(), cause, now)
        .map_err(translate_persistence_error)?;

    Ok(AssignGraduateResponse {
        message: format!(
            "Graduate {} assigned ({}/{})",
            request.graduate_id, updated.fulfilled_count, updated.number_of_staff
        ),
        request: staff_request_info(actor, &updated),
        graduate_id: request.graduate_id,
    })
}

// ========================================================================
// Audit
// ========================================================================

/// Reads the audit trail of one entity, oldest first.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor is office staff, or a
/// validation error for an unknown entity type.
pub fn get_audit_trail(
    persistence: &mut Persistence,
    entity_type: &str,
    entity_id: i64,
    actor: &AuthenticatedActor,
) -> ApiResult<AuditTrailResponse> {
    AuthorizationService::authorize_office(actor, "get_audit_trail")?;

    let entity_type: EntityType = EntityType::from_str(entity_type)
        .map_err(|message| ApiError::invalid_input("entity_type", message))?;
    let events: Vec<StoredAuditEvent> = persistence
        .get_audit_trail(entity_type, entity_id)
        .map_err(translate_persistence_error)?;

    Ok(AuditTrailResponse {
        entity_type: entity_type.as_str().to_string(),
        entity_id,
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}

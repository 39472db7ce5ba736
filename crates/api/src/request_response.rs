// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps are serialized as RFC 3339 strings.

use time::OffsetDateTime;
use vgss_audit::AuditEvent;
use vgss_domain::{
    Chapter, GraduateDetails, GraduateProfile, StaffRequest, StaffRequestAssignment, ZoneRecord,
};
use vgss_persistence::{StoredAuditEvent, UserData};

// ========================================================================
// Capabilities
// ========================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(value))
    }
}

/// Role-level capabilities of the authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlobalCapabilities {
    pub can_manage_principals: Capability,
    pub can_manage_chapters: Capability,
    pub can_upload_zone_records: Capability,
    pub can_review_graduates: Capability,
    pub can_create_staff_requests: Capability,
    pub can_approve_staff_requests: Capability,
    pub can_assign_graduates: Capability,
    pub can_view_audit: Capability,
}

/// Actions available on one principal account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrincipalCapabilities {
    /// False for the last active office account.
    pub can_disable: Capability,
    pub can_enable: Capability,
}

/// Actions available on one staff request for the viewing principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffRequestCapabilities {
    pub can_approve: Capability,
    pub can_reject: Capability,
    pub can_cancel: Capability,
    pub can_edit: Capability,
    pub can_delete: Capability,
    pub can_assign: Capability,
}

// ========================================================================
// Identity
// ========================================================================

/// API request to create the first VGSS office account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapOfficeRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
}

/// API response for a successful bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapOfficeResponse {
    pub user_id: i64,
    pub email: String,
    pub message: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The login email (case-insensitive).
    pub email: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque).
    pub session_token: String,
    pub user_id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// API response for the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// The profile id when the principal is a graduate.
    pub graduate_id: Option<i64>,
    pub capabilities: GlobalCapabilities,
}

/// API request to provision a principal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePrincipalRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
    /// `VgssOffice`, `Zone` or `ServiceDepartment`.
    pub role: String,
}

/// API response for a provisioned principal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePrincipalResponse {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub message: String,
}

/// A principal account as listed to office staff.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrincipalInfo {
    pub user_id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub is_disabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub disabled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
    pub capabilities: PrincipalCapabilities,
}

impl PrincipalInfo {
    /// Builds the listing entry for `user`.
    #[must_use]
    pub fn new(user: &UserData, capabilities: PrincipalCapabilities) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            is_disabled: user.is_disabled,
            created_at: user.created_at,
            disabled_at: user.disabled_at,
            last_login_at: user.last_login_at,
            capabilities,
        }
    }
}

/// API response listing principals.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPrincipalsResponse {
    pub principals: Vec<PrincipalInfo>,
}

/// API response after disabling or enabling a principal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrincipalStatusResponse {
    pub user_id: i64,
    pub is_disabled: bool,
    pub message: String,
}

// ========================================================================
// Chapters
// ========================================================================

/// API request to create or rename a chapter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChapterNameRequest {
    pub name: String,
}

/// A chapter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChapterInfo {
    pub chapter_id: i64,
    pub zone_id: i64,
    pub name: String,
}

impl From<&Chapter> for ChapterInfo {
    fn from(chapter: &Chapter) -> Self {
        Self {
            chapter_id: chapter.chapter_id,
            zone_id: chapter.zone_id,
            name: chapter.name.clone(),
        }
    }
}

/// API response listing chapters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListChaptersResponse {
    pub chapters: Vec<ChapterInfo>,
}

// ========================================================================
// Zone records
// ========================================================================

/// One row of a zone upload batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ZoneRecordRow {
    pub full_name: String,
    /// `Male` or `Female` (case-insensitive, `M`/`F` accepted).
    pub gender: String,
    pub phone: String,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub pastor_name: Option<String>,
    #[serde(default)]
    pub pastor_phone: Option<String>,
}

/// API request to upload a batch of zone records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadZoneRecordsRequest {
    pub records: Vec<ZoneRecordRow>,
}

/// A stored zone record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ZoneRecordInfo {
    pub zone_record_id: i64,
    pub zone_id: i64,
    pub full_name: String,
    pub gender: String,
    pub phone: String,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    pub chapter_id: Option<i64>,
    pub pastor_name: Option<String>,
    pub pastor_phone: Option<String>,
    pub is_registered: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub registered_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&ZoneRecord> for ZoneRecordInfo {
    fn from(record: &ZoneRecord) -> Self {
        Self {
            zone_record_id: record.zone_record_id,
            zone_id: record.zone_id,
            full_name: record.full_name.clone(),
            gender: record.gender.as_str().to_string(),
            phone: record.phone.clone(),
            university: record.university.clone(),
            course: record.course.clone(),
            graduation_year: record.graduation_year,
            chapter_id: record.chapter_id,
            pastor_name: record.pastor_name.clone(),
            pastor_phone: record.pastor_phone.clone(),
            is_registered: record.is_registered,
            registered_at: record.registered_at,
            created_at: record.created_at,
        }
    }
}

/// API response for an uploaded batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadZoneRecordsResponse {
    pub zone_id: i64,
    pub uploaded: usize,
    pub records: Vec<ZoneRecordInfo>,
    pub message: String,
}

/// API response listing zone records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListZoneRecordsResponse {
    pub records: Vec<ZoneRecordInfo>,
}

/// The minimal view of an unregistered record returned to anonymous callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ZoneRecordLookupInfo {
    pub zone_record_id: i64,
    pub full_name: String,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
}

impl From<&ZoneRecord> for ZoneRecordLookupInfo {
    fn from(record: &ZoneRecord) -> Self {
        Self {
            zone_record_id: record.zone_record_id,
            full_name: record.full_name.clone(),
            university: record.university.clone(),
            course: record.course.clone(),
            graduation_year: record.graduation_year,
        }
    }
}

/// API response for a phone lookup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LookupZoneRecordResponse {
    pub matches: Vec<ZoneRecordLookupInfo>,
}

// ========================================================================
// Graduates
// ========================================================================

/// Personal, family and spiritual-journey fields of a graduate.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GraduateDetailsInfo {
    pub date_of_birth: Option<String>,
    pub marital_status: Option<String>,
    pub residential_address: Option<String>,
    pub state_of_origin: Option<String>,
    pub next_of_kin_name: Option<String>,
    pub next_of_kin_phone: Option<String>,
    pub next_of_kin_relationship: Option<String>,
    pub year_born_again: Option<String>,
    pub home_church: Option<String>,
    pub spiritual_gifts: Option<String>,
    pub testimony: Option<String>,
}

impl From<GraduateDetailsInfo> for GraduateDetails {
    fn from(info: GraduateDetailsInfo) -> Self {
        Self {
            date_of_birth: info.date_of_birth,
            marital_status: info.marital_status,
            residential_address: info.residential_address,
            state_of_origin: info.state_of_origin,
            next_of_kin_name: info.next_of_kin_name,
            next_of_kin_phone: info.next_of_kin_phone,
            next_of_kin_relationship: info.next_of_kin_relationship,
            year_born_again: info.year_born_again,
            home_church: info.home_church,
            spiritual_gifts: info.spiritual_gifts,
            testimony: info.testimony,
        }
    }
}

impl From<&GraduateDetails> for GraduateDetailsInfo {
    fn from(details: &GraduateDetails) -> Self {
        Self {
            date_of_birth: details.date_of_birth.clone(),
            marital_status: details.marital_status.clone(),
            residential_address: details.residential_address.clone(),
            state_of_origin: details.state_of_origin.clone(),
            next_of_kin_name: details.next_of_kin_name.clone(),
            next_of_kin_phone: details.next_of_kin_phone.clone(),
            next_of_kin_relationship: details.next_of_kin_relationship.clone(),
            year_born_again: details.year_born_again.clone(),
            home_church: details.home_church.clone(),
            spiritual_gifts: details.spiritual_gifts.clone(),
            testimony: details.testimony.clone(),
        }
    }
}

/// API request for graduate self-registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterGraduateRequest {
    /// The zone record being claimed.
    pub zone_record_id: i64,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub details: GraduateDetailsInfo,
}

/// A graduate profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraduateInfo {
    pub graduate_id: i64,
    pub user_id: i64,
    pub zone_record_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    pub chapter_id: Option<i64>,
    pub details: GraduateDetailsInfo,
    pub status: String,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub comments: Option<String>,
    pub service_department_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub service_started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub service_completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&GraduateProfile> for GraduateInfo {
    fn from(profile: &GraduateProfile) -> Self {
        Self {
            graduate_id: profile.graduate_id,
            user_id: profile.user_id,
            zone_record_id: profile.zone_record_id,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            gender: profile.gender.as_str().to_string(),
            university: profile.university.clone(),
            course: profile.course.clone(),
            graduation_year: profile.graduation_year,
            chapter_id: profile.chapter_id,
            details: GraduateDetailsInfo::from(&profile.details),
            status: profile.status.as_str().to_string(),
            is_approved: profile.is_approved,
            approved_by: profile.approved_by,
            approved_at: profile.approved_at,
            comments: profile.comments.clone(),
            service_department_id: profile.service_department_id,
            service_started_at: profile.service_started_at,
            service_completed_at: profile.service_completed_at,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterGraduateResponse {
    pub graduate: GraduateInfo,
    pub message: String,
}

/// Filters for listing graduates.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ListGraduatesRequest {
    pub status: Option<String>,
    pub is_approved: Option<bool>,
    /// Only approved, unassigned graduates at an assignable status.
    pub available_only: bool,
}

/// API response listing graduates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListGraduatesResponse {
    pub graduates: Vec<GraduateInfo>,
}

/// API request to apply an action to a graduate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionGraduateRequest {
    /// `approve`, `reject`, `update_status`, `start_service`,
    /// `complete_service` or `add_comments`.
    pub action: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

// ========================================================================
// Staff requests
// ========================================================================

/// The editable fields of a staff request, used for create and edit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffRequestFields {
    pub position_title: String,
    pub description: String,
    /// Between 1 and 10.
    pub number_of_staff: i64,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub preferred_gender: Option<String>,
    /// `Low`, `Medium`, `High` or `Urgent`; `Medium` when omitted.
    #[serde(default)]
    pub urgency: Option<String>,
}

/// A staff request as seen by one principal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffRequestInfo {
    pub staff_request_id: i64,
    pub department_id: i64,
    pub position_title: String,
    pub description: String,
    pub number_of_staff: u8,
    pub skills: Option<String>,
    pub qualifications: Option<String>,
    pub preferred_gender: Option<String>,
    pub urgency: String,
    pub status: String,
    pub fulfilled_count: u8,
    pub remaining_slots: u8,
    pub approved_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub rejection_reason: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub fulfilled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub capabilities: StaffRequestCapabilities,
}

impl StaffRequestInfo {
    /// Builds the view of `request` carrying the viewer's capabilities.
    #[must_use]
    pub fn new(request: &StaffRequest, capabilities: StaffRequestCapabilities) -> Self {
        Self {
            staff_request_id: request.staff_request_id,
            department_id: request.department_id,
            position_title: request.position_title.clone(),
            description: request.description.clone(),
            number_of_staff: request.number_of_staff,
            skills: request.skills.clone(),
            qualifications: request.qualifications.clone(),
            preferred_gender: request.preferred_gender.map(|g| g.as_str().to_string()),
            urgency: request.urgency.as_str().to_string(),
            status: request.status.as_str().to_string(),
            fulfilled_count: request.fulfilled_count,
            remaining_slots: request.remaining_slots(),
            approved_by: request.approved_by,
            approved_at: request.approved_at,
            rejection_reason: request.rejection_reason.clone(),
            fulfilled_at: request.fulfilled_at,
            created_at: request.created_at,
            updated_at: request.updated_at,
            capabilities,
        }
    }
}

/// One graduate assigned to a staff request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignmentInfo {
    pub assignment_id: i64,
    pub staff_request_id: i64,
    pub graduate_id: i64,
    pub assigned_by: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    pub notes: Option<String>,
}

impl From<&StaffRequestAssignment> for AssignmentInfo {
    fn from(assignment: &StaffRequestAssignment) -> Self {
        Self {
            assignment_id: assignment.assignment_id,
            staff_request_id: assignment.staff_request_id,
            graduate_id: assignment.graduate_id,
            assigned_by: assignment.assigned_by,
            assigned_at: assignment.assigned_at,
            notes: assignment.notes.clone(),
        }
    }
}

/// API response for a single staff request with its assignments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetStaffRequestResponse {
    pub request: StaffRequestInfo,
    pub assignments: Vec<AssignmentInfo>,
}

/// Filters for listing staff requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ListStaffRequestsRequest {
    pub status: Option<String>,
}

/// API response listing staff requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListStaffRequestsResponse {
    pub requests: Vec<StaffRequestInfo>,
}

/// API request to approve, reject or cancel a staff request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffRequestActionRequest {
    /// `approve`, `reject` or `cancel`.
    pub action: String,
    /// Required for `reject`.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to assign a graduate to a staff request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignGraduateRequest {
    pub graduate_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// API response for a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignGraduateResponse {
    pub request: StaffRequestInfo,
    pub graduate_id: i64,
    pub message: String,
}

/// API response for a removed entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteResponse {
    pub id: i64,
    pub message: String,
}

// ========================================================================
// Audit
// ========================================================================

/// One recorded audit event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    pub event_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub actor_id: String,
    pub actor_type: String,
    pub actor_user_id: Option<i64>,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
}

impl From<&StoredAuditEvent> for AuditEventInfo {
    fn from(stored: &StoredAuditEvent) -> Self {
        let event: &AuditEvent = &stored.event;
        Self {
            event_id: stored.event_id,
            created_at: stored.created_at,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            actor_user_id: event.actor.user_id,
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
            entity_type: event.entity_type.as_str().to_string(),
            entity_id: event.entity_id,
        }
    }
}

/// API response for an entity's audit trail, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditTrailResponse {
    pub entity_type: String,
    pub entity_id: i64,
    pub events: Vec<AuditEventInfo>,
}

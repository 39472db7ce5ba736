// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vgss_audit::{AuditEvent, StateSnapshot};
use vgss_domain::{
    Chapter, GraduateProfile, NewAssignment, NewGraduateProfile, NewStaffRequest, NewZoneRecord,
    StaffRequest, ZoneRecord,
};

/// Audit snapshot of a zone record.
#[must_use]
pub fn zone_record_snapshot(record: &ZoneRecord) -> StateSnapshot {
    StateSnapshot::new(format!(
        "zone_record_id={},phone={},is_registered={}",
        record.zone_record_id, record.phone, record.is_registered
    ))
}

/// Audit snapshot of a graduate profile.
#[must_use]
pub fn graduate_snapshot(profile: &GraduateProfile) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},is_approved={},service_department_id={}",
        profile.status,
        profile.is_approved,
        profile
            .service_department_id
            .map_or_else(|| String::from("none"), |id| id.to_string())
    ))
}

/// Audit snapshot of a staff request.
#[must_use]
pub fn staff_request_snapshot(request: &StaffRequest) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},fulfilled_count={}/{}",
        request.status, request.fulfilled_count, request.number_of_staff
    ))
}

/// The result of a successful self-registration.
///
/// The three writes (principal, profile, record flag) and the audit event
/// must be persisted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResult {
    /// The zone record, now flagged as registered.
    pub registered_record: ZoneRecord,
    /// The profile to insert.
    pub new_profile: NewGraduateProfile,
    pub audit_event: AuditEvent,
}

/// The result of a graduate status action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraduateTransition {
    pub new_profile: GraduateProfile,
    pub audit_event: AuditEvent,
}

/// The result of raising a staff request.
///
/// The audit event has no entity id until the request is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRequestCreation {
    pub new_request: NewStaffRequest,
    pub audit_event: AuditEvent,
}

/// The result of a staff request action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRequestTransition {
    pub new_request: StaffRequest,
    pub audit_event: AuditEvent,
}

/// The result of a successful assignment.
///
/// Transitions are atomic: all of these writes succeed together or none do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    /// The request with its counter incremented.
    pub new_request: StaffRequest,
    /// The graduate placed with the request's department.
    pub new_graduate: GraduateProfile,
    pub new_assignment: NewAssignment,
    pub audit_event: AuditEvent,
}

/// The result of a zone upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneUploadResult {
    /// The normalized records to insert.
    pub records: Vec<NewZoneRecord>,
    pub audit_event: AuditEvent,
}

/// The result of a chapter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterResult {
    /// The chapter after the change; `None` for a deletion.
    ///
    /// A newly created chapter carries `chapter_id` 0 until inserted.
    pub chapter: Option<Chapter>,
    pub audit_event: AuditEvent,
}

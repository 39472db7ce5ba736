// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vgss_audit::AuditEvent;
use vgss_domain::{GraduateStatus, StaffRequestStatus};

/// Stored role label of VGSS office principals.
pub const OFFICE_ROLE: &str = "VgssOffice";
/// Stored role label of zone principals.
pub const ZONE_ROLE: &str = "Zone";
/// Stored role label of service department principals.
pub const DEPARTMENT_ROLE: &str = "ServiceDepartment";
/// Stored role label of graduate principals.
pub const GRADUATE_ROLE: &str = "Graduate";

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A principal account as stored.
///
/// The role is kept as its stored string; the API layer parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: OffsetDateTime,
    pub disabled_at: Option<OffsetDateTime>,
    pub last_login_at: Option<OffsetDateTime>,
}

/// A login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub last_activity_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// An audit event read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuditEvent {
    pub event_id: i64,
    pub created_at: OffsetDateTime,
    pub event: AuditEvent,
}

/// Optional filters for listing zone records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneRecordFilter {
    pub zone_id: Option<i64>,
    pub is_registered: Option<bool>,
}

/// Optional filters for listing graduate profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraduateFilter {
    pub status: Option<GraduateStatus>,
    pub is_approved: Option<bool>,
    /// Only approved, unassigned graduates at an assignable status.
    pub available_only: bool,
    pub service_department_id: Option<i64>,
}

/// Optional filters for listing staff requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaffRequestFilter {
    pub department_id: Option<i64>,
    pub status: Option<StaffRequestStatus>,
}

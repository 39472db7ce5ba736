// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff request lifecycle.
//!
//! A request starts `Pending`. From there the office approves or rejects
//! it and the owner may cancel or edit it. An approved request moves to
//! `Fulfilled` on its own once the assignment counter reaches capacity.
//! `Rejected`, `Fulfilled` and `Cancelled` are terminal.

use crate::error::DomainError;
use crate::types::{Gender, normalize_label};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Smallest number of graduates a request may ask for.
pub const MIN_STAFF_PER_REQUEST: u8 = 1;
/// Largest number of graduates a request may ask for.
pub const MAX_STAFF_PER_REQUEST: u8 = 10;

/// Status of a staff request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StaffRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Fulfilled,
    Cancelled,
}

impl StaffRequestStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Fulfilled,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Fulfilled => "Fulfilled",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for StaffRequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|status| normalize_label(status.as_str()) == wanted)
            .ok_or_else(|| DomainError::InvalidRequestStatus(s.to_string()))
    }
}

impl std::fmt::Display for StaffRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How soon the department needs the position filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Urgency {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl FromStr for Urgency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(DomainError::InvalidUrgency(s.to_string())),
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The department-editable fields of a staff request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRequestDraft {
    pub position_title: String,
    pub description: String,
    pub number_of_staff: u8,
    pub skills: Option<String>,
    pub qualifications: Option<String>,
    pub preferred_gender: Option<Gender>,
    pub urgency: Urgency,
}

/// A staff request ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffRequest {
    pub department_id: i64,
    pub draft: StaffRequestDraft,
    pub created_at: OffsetDateTime,
}

impl NewStaffRequest {
    /// Validates `draft` and builds a request owned by `department_id`.
    ///
    /// Title and description are trimmed.
    ///
    /// # Errors
    ///
    /// Returns draft validation errors.
    pub fn new(
        department_id: i64,
        draft: &StaffRequestDraft,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        crate::validation::validate_staff_request_draft(draft)?;
        Ok(Self {
            department_id,
            draft: StaffRequestDraft {
                position_title: draft.position_title.trim().to_string(),
                description: draft.description.trim().to_string(),
                ..draft.clone()
            },
            created_at: now,
        })
    }
}

/// A department's request for graduates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRequest {
    pub staff_request_id: i64,
    /// The service department principal that raised the request.
    pub department_id: i64,
    pub position_title: String,
    pub description: String,
    pub number_of_staff: u8,
    pub skills: Option<String>,
    pub qualifications: Option<String>,
    pub preferred_gender: Option<Gender>,
    pub urgency: Urgency,
    pub status: StaffRequestStatus,
    pub fulfilled_count: u8,
    pub approved_by: Option<i64>,
    pub approved_at: Option<OffsetDateTime>,
    pub rejection_reason: Option<String>,
    pub fulfilled_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A status-changing action on a staff request.
///
/// Deletion is not an action here; it removes the row and is checked by
/// [`StaffRequest::ensure_deletable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffRequestAction {
    Approve,
    Reject { reason: String },
    Cancel,
    Edit(StaffRequestDraft),
}

impl StaffRequestAction {
    /// Returns the wire name of this action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
            Self::Cancel => "cancel",
            Self::Edit(_) => "edit",
        }
    }
}

impl StaffRequest {
    fn illegal(&self, action: &str, reason: &str) -> DomainError {
        DomainError::IllegalTransition {
            from: self.status.as_str().to_string(),
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns how many more graduates can be assigned.
    #[must_use]
    pub const fn remaining_slots(&self) -> u8 {
        self.number_of_staff.saturating_sub(self.fulfilled_count)
    }

    /// Applies an approve, reject, cancel or edit action.
    ///
    /// All four are only legal while the request is `Pending`. Role and
    /// ownership checks happen before this is called.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` when the request is not `Pending`,
    /// `MissingField("rejection_reason")` for a reject with a blank reason,
    /// and draft validation errors for an edit.
    pub fn apply_action(
        &self,
        action: &StaffRequestAction,
        actor_id: i64,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if self.status != StaffRequestStatus::Pending {
            return Err(self.illegal(action.name(), "only pending requests can change"));
        }

        let mut next: Self = self.clone();
        match action {
            StaffRequestAction::Approve => {
                next.status = StaffRequestStatus::Approved;
                next.approved_by = Some(actor_id);
                next.approved_at = Some(now);
            }
            StaffRequestAction::Reject { reason } => {
                let reason: &str = reason.trim();
                if reason.is_empty() {
                    return Err(DomainError::MissingField("rejection_reason"));
                }
                next.status = StaffRequestStatus::Rejected;
                next.rejection_reason = Some(reason.to_string());
            }
            StaffRequestAction::Cancel => {
                next.status = StaffRequestStatus::Cancelled;
            }
            StaffRequestAction::Edit(draft) => {
                crate::validation::validate_staff_request_draft(draft)?;
                next.position_title = draft.position_title.trim().to_string();
                next.description = draft.description.trim().to_string();
                next.number_of_staff = draft.number_of_staff;
                next.skills.clone_from(&draft.skills);
                next.qualifications.clone_from(&draft.qualifications);
                next.preferred_gender = draft.preferred_gender;
                next.urgency = draft.urgency;
            }
        }
        next.updated_at = now;
        Ok(next)
    }

    /// Only pending or cancelled requests may be removed.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` for any other status.
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        match self.status {
            StaffRequestStatus::Pending | StaffRequestStatus::Cancelled => Ok(()),
            _ => Err(self.illegal("delete", "only pending or cancelled requests can be deleted")),
        }
    }

    /// Checks that the request can take one more graduate.
    ///
    /// A `Fulfilled` request is an approved request with no slot left, so it
    /// reports `CapacityExceeded` rather than `IllegalTransition`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` unless `Approved` or `Fulfilled`, and
    /// `CapacityExceeded` when every slot is filled.
    pub fn ensure_accepts_assignment(&self) -> Result<(), DomainError> {
        if !matches!(
            self.status,
            StaffRequestStatus::Approved | StaffRequestStatus::Fulfilled
        ) {
            return Err(self.illegal("assign", "only approved requests accept assignments"));
        }
        if self.status == StaffRequestStatus::Fulfilled
            || self.fulfilled_count >= self.number_of_staff
        {
            return Err(DomainError::CapacityExceeded {
                request_id: self.staff_request_id,
                number_of_staff: self.number_of_staff,
            });
        }
        Ok(())
    }

    /// Returns the request with one more slot filled.
    ///
    /// Reaching capacity moves the request to `Fulfilled` and stamps
    /// `fulfilled_at`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ensure_accepts_assignment`].
    pub fn record_assignment(&self, now: OffsetDateTime) -> Result<Self, DomainError> {
        self.ensure_accepts_assignment()?;

        let fulfilled_count: u8 = self.fulfilled_count + 1;
        let mut next: Self = Self {
            fulfilled_count,
            updated_at: now,
            ..self.clone()
        };
        if fulfilled_count == self.number_of_staff {
            next.status = StaffRequestStatus::Fulfilled;
            next.fulfilled_at = Some(now);
        }
        Ok(next)
    }
}

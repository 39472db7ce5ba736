// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Graduate profile status and office actions.
//!
//! The status set is deliberately loose: the office may move a profile to
//! any status through `update_status`. The named actions (`approve`,
//! `reject`, `start_service`, `complete_service`, `add_comments`) carry the
//! side effects on approval and service dates.

use crate::error::DomainError;
use crate::types::{Gender, normalize_label};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Review and service status of a graduate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GraduateStatus {
    /// Initial status after registration.
    #[default]
    UnderReview,
    InvitedForInterview,
    Interviewed,
    /// Awaiting placement after interview.
    Sighting,
    /// Assigned to, or started at, a service department.
    Serving,
    NotAccepted,
}

impl GraduateStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::UnderReview,
        Self::InvitedForInterview,
        Self::Interviewed,
        Self::Sighting,
        Self::Serving,
        Self::NotAccepted,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnderReview => "UnderReview",
            Self::InvitedForInterview => "InvitedForInterview",
            Self::Interviewed => "Interviewed",
            Self::Sighting => "Sighting",
            Self::Serving => "Serving",
            Self::NotAccepted => "NotAccepted",
        }
    }

    /// Returns true if a graduate at this status may be assigned to a department.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(self, Self::Interviewed | Self::Sighting)
    }
}

impl FromStr for GraduateStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|status| normalize_label(status.as_str()) == wanted)
            .ok_or_else(|| DomainError::InvalidGraduateStatus(s.to_string()))
    }
}

impl std::fmt::Display for GraduateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An office action against a graduate profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraduateAction {
    /// Approve the graduate, optionally forcing a status.
    Approve { status: Option<GraduateStatus> },
    /// Reject the graduate; forces `NotAccepted`.
    Reject,
    /// Set an arbitrary status.
    UpdateStatus(GraduateStatus),
    /// Mark the graduate as serving from now.
    StartService,
    /// Record service completion; status is left as-is.
    CompleteService,
    /// Replace the office comments only.
    AddComments,
}

impl GraduateAction {
    /// Returns the wire name of this action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Reject => "reject",
            Self::UpdateStatus(_) => "update_status",
            Self::StartService => "start_service",
            Self::CompleteService => "complete_service",
            Self::AddComments => "add_comments",
        }
    }

    /// Parses an action name plus its optional status argument.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAction` for unknown names, `MissingField("status")` when
    /// `update_status` has no target, and `InvalidGraduateStatus` for an
    /// unparseable status.
    pub fn parse(action: &str, status: Option<&str>) -> Result<Self, DomainError> {
        let status: Option<GraduateStatus> = status
            .filter(|s| !s.trim().is_empty())
            .map(GraduateStatus::from_str)
            .transpose()?;

        match action.trim() {
            "approve" => Ok(Self::Approve { status }),
            "reject" => Ok(Self::Reject),
            "update_status" => status
                .map(Self::UpdateStatus)
                .ok_or(DomainError::MissingField("status")),
            "start_service" => Ok(Self::StartService),
            "complete_service" => Ok(Self::CompleteService),
            "add_comments" => Ok(Self::AddComments),
            other => Err(DomainError::InvalidAction(other.to_string())),
        }
    }
}

/// Personal, family and spiritual-journey fields collected at registration.
///
/// The workflow never inspects these; they are stored as an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraduateDetails {
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

/// A graduate profile ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGraduateProfile {
    pub zone_record_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    pub chapter_id: Option<i64>,
    pub details: GraduateDetails,
    pub status: GraduateStatus,
    pub is_approved: bool,
    pub created_at: OffsetDateTime,
}

/// The canonical record for a registered graduate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraduateProfile {
    pub graduate_id: i64,
    /// The graduate's own principal.
    pub user_id: i64,
    pub zone_record_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    pub chapter_id: Option<i64>,
    pub details: GraduateDetails,
    pub status: GraduateStatus,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<OffsetDateTime>,
    pub comments: Option<String>,
    /// `None` means the graduate is available for assignment.
    pub service_department_id: Option<i64>,
    pub service_started_at: Option<OffsetDateTime>,
    pub service_completed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl GraduateProfile {
    /// Applies an office action, returning the updated profile.
    ///
    /// # Arguments
    ///
    /// * `action` - The action to apply
    /// * `comments` - Optional comments; replace stored comments when present
    /// * `actor_id` - The principal performing the action
    /// * `now` - The transition timestamp
    ///
    /// # Errors
    ///
    /// Returns `MissingField("comments")` for `add_comments` without comments.
    pub fn apply_action(
        &self,
        action: GraduateAction,
        comments: Option<&str>,
        actor_id: i64,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let comments: Option<&str> = comments.map(str::trim).filter(|c| !c.is_empty());
        let mut next: Self = self.clone();

        match action {
            GraduateAction::Approve { status } => {
                next.is_approved = true;
                next.approved_by = Some(actor_id);
                next.approved_at = Some(now);
                next.status = match status {
                    Some(explicit) => explicit,
                    None if self.status == GraduateStatus::UnderReview => {
                        GraduateStatus::Interviewed
                    }
                    None => self.status,
                };
            }
            GraduateAction::Reject => {
                next.is_approved = false;
                next.approved_by = None;
                next.approved_at = None;
                next.status = GraduateStatus::NotAccepted;
            }
            GraduateAction::UpdateStatus(status) => {
                next.status = status;
            }
            GraduateAction::StartService => {
                next.status = GraduateStatus::Serving;
                next.service_started_at = Some(now);
            }
            GraduateAction::CompleteService => {
                next.service_completed_at = Some(now);
            }
            GraduateAction::AddComments => {
                if comments.is_none() {
                    return Err(DomainError::MissingField("comments"));
                }
            }
        }

        if let Some(text) = comments {
            next.comments = Some(text.to_string());
        }
        next.updated_at = now;
        Ok(next)
    }

    /// Checks that the graduate can be placed with a department.
    ///
    /// The `AlreadyAssigned` check comes first so a serving graduate reports
    /// the conflict rather than an eligibility failure.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyAssigned` if a department is set, and
    /// `GraduateNotEligible` if the graduate is unapproved or at a status
    /// other than `Interviewed` or `Sighting`.
    pub fn ensure_assignable(&self) -> Result<(), DomainError> {
        if let Some(department_id) = self.service_department_id {
            return Err(DomainError::AlreadyAssigned {
                graduate_id: self.graduate_id,
                department_id,
            });
        }
        if !self.is_approved {
            return Err(DomainError::GraduateNotEligible {
                graduate_id: self.graduate_id,
                reason: String::from("graduate has not been approved"),
            });
        }
        if !self.status.is_assignable() {
            return Err(DomainError::GraduateNotEligible {
                graduate_id: self.graduate_id,
                reason: format!(
                    "status {} is not Interviewed or Sighting",
                    self.status.as_str()
                ),
            });
        }
        Ok(())
    }

    /// Returns the profile placed with `department_id` from `now`.
    #[must_use]
    pub fn assigned_to(&self, department_id: i64, now: OffsetDateTime) -> Self {
        Self {
            service_department_id: Some(department_id),
            status: GraduateStatus::Serving,
            service_started_at: Some(now),
            updated_at: now,
            ..self.clone()
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Coarse classification of domain failures.
///
/// Every `DomainError` belongs to exactly one kind. Callers outside the
/// domain use the kind to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An entity identifier could not be resolved.
    NotFound,
    /// Input was missing or malformed.
    ValidationFailed,
    /// The entity's current status does not permit the requested action.
    IllegalTransition,
    /// A uniqueness rule was violated.
    Conflict,
    /// A staff request has no remaining slots.
    CapacityExceeded,
}

impl ErrorKind {
    /// Returns the stable string form of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::ValidationFailed => "ValidationFailed",
            Self::IllegalTransition => "IllegalTransition",
            Self::Conflict => "Conflict",
            Self::CapacityExceeded => "CapacityExceeded",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during domain validation and workflow transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is empty.
    MissingField(&'static str),
    /// A field is present but malformed.
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The email address failed the format check.
    InvalidEmail(String),
    /// The email address is already used by a principal.
    DuplicateEmail(String),
    /// The phone number is already used by another record in the zone.
    DuplicatePhone {
        /// The zone owning the records.
        zone_id: i64,
        /// The duplicated phone number.
        phone: String,
    },
    /// The chapter name is already used within the zone.
    DuplicateChapterName {
        /// The zone owning the chapter.
        zone_id: i64,
        /// The duplicated name.
        name: String,
    },
    /// A zone record does not exist.
    ZoneRecordNotFound(i64),
    /// A zone record has already been claimed by a registration.
    AlreadyRegistered(i64),
    /// A chapter does not exist.
    ChapterNotFound(i64),
    /// A graduate profile does not exist.
    GraduateNotFound(i64),
    /// A staff request does not exist.
    RequestNotFound(i64),
    /// The graduate action name is not recognised.
    InvalidAction(String),
    /// The graduate status name is not recognised.
    InvalidGraduateStatus(String),
    /// The staff request status name is not recognised.
    InvalidRequestStatus(String),
    /// The urgency name is not recognised.
    InvalidUrgency(String),
    /// The gender name is not recognised.
    InvalidGender(String),
    /// The current status does not permit the requested action.
    IllegalTransition {
        /// The current status.
        from: String,
        /// The requested action.
        action: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// A staff request already holds as many graduates as it asked for.
    CapacityExceeded {
        /// The staff request.
        request_id: i64,
        /// The request's capacity.
        number_of_staff: u8,
    },
    /// The graduate is already assigned to this staff request.
    DuplicateAssignment {
        /// The staff request.
        request_id: i64,
        /// The graduate.
        graduate_id: i64,
    },
    /// The graduate is already serving a department.
    AlreadyAssigned {
        /// The graduate.
        graduate_id: i64,
        /// The department the graduate is serving.
        department_id: i64,
    },
    /// The graduate is not approved or not at an assignable status.
    GraduateNotEligible {
        /// The graduate.
        graduate_id: i64,
        /// Why the graduate cannot be assigned.
        reason: String,
    },
}

impl DomainError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_)
            | Self::InvalidField { .. }
            | Self::InvalidEmail(_)
            | Self::InvalidAction(_)
            | Self::InvalidGraduateStatus(_)
            | Self::InvalidRequestStatus(_)
            | Self::InvalidUrgency(_)
            | Self::InvalidGender(_) => ErrorKind::ValidationFailed,
            Self::DuplicateEmail(_)
            | Self::DuplicatePhone { .. }
            | Self::DuplicateChapterName { .. }
            | Self::AlreadyRegistered(_)
            | Self::DuplicateAssignment { .. }
            | Self::AlreadyAssigned { .. } => ErrorKind::Conflict,
            Self::ZoneRecordNotFound(_)
            | Self::ChapterNotFound(_)
            | Self::GraduateNotFound(_)
            | Self::RequestNotFound(_) => ErrorKind::NotFound,
            Self::IllegalTransition { .. } | Self::GraduateNotEligible { .. } => {
                ErrorKind::IllegalTransition
            }
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Required field '{field}' is missing"),
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{email}'"),
            Self::DuplicateEmail(email) => {
                write!(f, "Email '{email}' is already registered")
            }
            Self::DuplicatePhone { zone_id, phone } => {
                write!(f, "Phone '{phone}' already exists in zone {zone_id}")
            }
            Self::DuplicateChapterName { zone_id, name } => {
                write!(f, "Chapter '{name}' already exists in zone {zone_id}")
            }
            Self::ZoneRecordNotFound(id) => write!(f, "Zone record {id} not found"),
            Self::AlreadyRegistered(id) => {
                write!(f, "Zone record {id} has already been registered")
            }
            Self::ChapterNotFound(id) => write!(f, "Chapter {id} not found"),
            Self::GraduateNotFound(id) => write!(f, "Graduate {id} not found"),
            Self::RequestNotFound(id) => write!(f, "Staff request {id} not found"),
            Self::InvalidAction(action) => write!(f, "Invalid action: '{action}'"),
            Self::InvalidGraduateStatus(status) => {
                write!(f, "Invalid graduate status: '{status}'")
            }
            Self::InvalidRequestStatus(status) => {
                write!(f, "Invalid staff request status: '{status}'")
            }
            Self::InvalidUrgency(urgency) => write!(f, "Invalid urgency: '{urgency}'"),
            Self::InvalidGender(gender) => write!(f, "Invalid gender: '{gender}'"),
            Self::IllegalTransition {
                from,
                action,
                reason,
            } => {
                write!(f, "Cannot {action} from status {from}: {reason}")
            }
            Self::CapacityExceeded {
                request_id,
                number_of_staff,
            } => {
                write!(
                    f,
                    "Staff request {request_id} already has all {number_of_staff} positions filled"
                )
            }
            Self::DuplicateAssignment {
                request_id,
                graduate_id,
            } => {
                write!(
                    f,
                    "Graduate {graduate_id} is already assigned to staff request {request_id}"
                )
            }
            Self::AlreadyAssigned {
                graduate_id,
                department_id,
            } => {
                write!(
                    f,
                    "Graduate {graduate_id} is already serving department {department_id}"
                )
            }
            Self::GraduateNotEligible {
                graduate_id,
                reason,
            } => {
                write!(f, "Graduate {graduate_id} cannot be assigned: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

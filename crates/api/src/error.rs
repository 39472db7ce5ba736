// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use vgss::CoreError;
use vgss_domain::{DomainError, ErrorKind};
use vgss_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credentials or session were not accepted.
    AuthenticationFailed {
        /// Why authentication failed.
        reason: String,
    },
    /// The authenticated principal may not perform the action.
    Unauthorized {
        /// The attempted action.
        action: String,
        /// The role (or ownership) the action requires.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are the errors exposed to callers. Lower-layer errors are
/// translated explicitly and never leak through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Credentials or session were rejected.
    AuthenticationFailed { reason: String },
    /// The principal lacks the role or ownership required.
    Unauthorized {
        action: String,
        required_role: String,
    },
    /// Input was missing or malformed.
    InvalidInput { field: String, message: String },
    /// A referenced entity does not exist.
    ResourceNotFound {
        resource_type: String,
        message: String,
    },
    /// A uniqueness rule was violated.
    Conflict { rule: String, message: String },
    /// The entity's current status does not permit the action.
    IllegalTransition { message: String },
    /// The staff request has no remaining slots.
    CapacityExceeded { message: String },
    /// A new password does not satisfy the password policy.
    PasswordPolicyViolation { message: String },
    /// An unexpected failure.
    Internal { message: String },
}

impl ApiError {
    /// Returns the stable error kind reported to clients.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "AuthenticationFailed",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::InvalidInput { .. } | Self::PasswordPolicyViolation { .. } => "ValidationFailed",
            Self::ResourceNotFound { .. } => "NotFound",
            Self::Conflict { .. } => "Conflict",
            Self::IllegalTransition { .. } => "IllegalTransition",
            Self::CapacityExceeded { .. } => "CapacityExceeded",
            Self::Internal { .. } => "Internal",
        }
    }

    /// Builds an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Builds a `ResourceNotFound` error.
    #[must_use]
    pub fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::IllegalTransition { message } => write!(f, "Illegal transition: {message}"),
            Self::CapacityExceeded { message } => write!(f, "Capacity exceeded: {message}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn conflict(rule: &str, message: String) -> ApiError {
    ApiError::Conflict {
        rule: rule.to_string(),
        message,
    }
}

/// The field, rule or resource a domain error refers to.
fn error_subject(err: &DomainError) -> &'static str {
    match err {
        DomainError::MissingField(field) | DomainError::InvalidField { field, .. } => *field,
        DomainError::InvalidEmail(_) => "email",
        DomainError::InvalidAction(_) => "action",
        DomainError::InvalidGraduateStatus(_) | DomainError::InvalidRequestStatus(_) => "status",
        DomainError::InvalidUrgency(_) => "urgency",
        DomainError::InvalidGender(_) => "gender",
        DomainError::DuplicateEmail(_) => "unique_email",
        DomainError::DuplicatePhone { .. } => "unique_zone_phone",
        DomainError::DuplicateChapterName { .. } => "unique_chapter_name",
        DomainError::AlreadyRegistered(_) => "single_registration",
        DomainError::DuplicateAssignment { .. } => "unique_assignment",
        DomainError::AlreadyAssigned { .. } => "single_department",
        DomainError::ZoneRecordNotFound(_) => "Zone record",
        DomainError::ChapterNotFound(_) => "Chapter",
        DomainError::GraduateNotFound(_) => "Graduate",
        DomainError::RequestNotFound(_) => "Staff request",
        DomainError::IllegalTransition { .. }
        | DomainError::GraduateNotEligible { .. }
        | DomainError::CapacityExceeded { .. } => "",
    }
}

/// Translates a domain error into an API error.
///
/// The error's kind picks the API category.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    let subject: &str = error_subject(&err);
    match err.kind() {
        ErrorKind::ValidationFailed => ApiError::invalid_input(subject, message),
        ErrorKind::Conflict => conflict(subject, message),
        ErrorKind::NotFound => ApiError::not_found(subject, message),
        ErrorKind::IllegalTransition => ApiError::IllegalTransition { message },
        ErrorKind::CapacityExceeded => ApiError::CapacityExceeded { message },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Workflow rejections keep their domain category; storage failures become
/// `Internal`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::UniqueViolation(message) => ApiError::Conflict {
            rule: String::from("unique"),
            message,
        },
        PersistenceError::NotFound(message) => ApiError::not_found("Resource", message),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

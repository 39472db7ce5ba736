// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use std::str::FromStr;

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use vgss_audit::Actor;
use vgss_domain::{GraduateProfile, StaffRequest, StaffRequestAction};
use vgss_persistence::{
    DEPARTMENT_ROLE, GRADUATE_ROLE, OFFICE_ROLE, Persistence, SessionData, UserData, ZONE_ROLE,
    verify_password,
};

use crate::error::AuthError;

/// Principal roles for authorization.
///
/// Every principal holds exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// VGSS office staff: approve graduates and staff requests, perform
    /// assignments and provision accounts.
    VgssOffice,
    /// Zone coordinators: upload zone records and manage chapters.
    Zone,
    /// Service departments: raise staff requests and receive graduates.
    ServiceDepartment,
    /// Registered graduates: read their own profile.
    Graduate,
}

impl Role {
    /// Returns the stored string form of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VgssOffice => OFFICE_ROLE,
            Self::Zone => ZONE_ROLE,
            Self::ServiceDepartment => DEPARTMENT_ROLE,
            Self::Graduate => GRADUATE_ROLE,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            OFFICE_ROLE => Ok(Self::VgssOffice),
            ZONE_ROLE => Ok(Self::Zone),
            DEPARTMENT_ROLE => Ok(Self::ServiceDepartment),
            GRADUATE_ROLE => Ok(Self::Graduate),
            other => Err(format!("Invalid role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated principal with its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The principal's user id.
    pub user_id: i64,
    /// The principal's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The principal's user id
    /// * `role` - The role held by the principal
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Converts this actor into the audit actor recorded on events.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::principal(self.user_id, self.role.as_str())
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Ownership checks (a department acting on its own request, a graduate
/// reading its own profile) are made here as well, once, at the boundary.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require(
        actor: &AuthenticatedActor,
        action: &str,
        allowed: &[Role],
    ) -> Result<(), AuthError> {
        if allowed.contains(&actor.role) {
            return Ok(());
        }
        let required_role: String = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<&str>>()
            .join(" or ");
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role,
        })
    }

    fn not_owner(action: &str, owner: &str) -> AuthError {
        AuthError::Unauthorized {
            action: action.to_string(),
            required_role: format!("owning {owner}"),
        }
    }

    /// Checks that the actor is VGSS office staff.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_office(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::VgssOffice])
    }

    /// Checks that the actor is a zone.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_zone(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Zone])
    }

    /// Checks that the actor is a zone or VGSS office staff.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_zone_or_office(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Zone, Role::VgssOffice])
    }

    /// Checks that the actor is a service department.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_department(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::ServiceDepartment])
    }

    /// Checks that the actor is a graduate.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_graduate(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Graduate])
    }

    /// Checks that the actor may apply `action` to `request`.
    ///
    /// - approve and reject: VGSS office
    /// - cancel: VGSS office or the owning department
    /// - edit: the owning department
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for the wrong role or a non-owning department.
    pub fn authorize_staff_request_action(
        actor: &AuthenticatedActor,
        request: &StaffRequest,
        action: &StaffRequestAction,
    ) -> Result<(), AuthError> {
        let name: &str = action.name();
        match action {
            StaffRequestAction::Approve | StaffRequestAction::Reject { .. } => {
                Self::authorize_office(actor, name)
            }
            StaffRequestAction::Cancel => {
                Self::authorize_request_owner_or_office(actor, request, name)
            }
            StaffRequestAction::Edit(_) => {
                Self::authorize_department(actor, name)?;
                if request.department_id != actor.user_id {
                    return Err(Self::not_owner(name, DEPARTMENT_ROLE));
                }
                Ok(())
            }
        }
    }

    /// Checks that the actor is VGSS office staff or the department owning
    /// `request`.
    ///
    /// Used for cancel, delete and read access.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other principal.
    pub fn authorize_request_owner_or_office(
        actor: &AuthenticatedActor,
        request: &StaffRequest,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::VgssOffice, Role::ServiceDepartment])?;
        if actor.role == Role::ServiceDepartment && request.department_id != actor.user_id {
            return Err(Self::not_owner(action, DEPARTMENT_ROLE));
        }
        Ok(())
    }

    /// Checks that the actor may read `profile`.
    ///
    /// Office staff may read any profile, a department only graduates
    /// serving it, and a graduate only its own profile.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn authorize_view_graduate(
        actor: &AuthenticatedActor,
        profile: &GraduateProfile,
    ) -> Result<(), AuthError> {
        let action: &str = "view_graduate";
        match actor.role {
            Role::VgssOffice => Ok(()),
            Role::ServiceDepartment if profile.service_department_id == Some(actor.user_id) => {
                Ok(())
            }
            Role::Graduate if profile.user_id == actor.user_id => Ok(()),
            Role::ServiceDepartment => Err(Self::not_owner(action, DEPARTMENT_ROLE)),
            Role::Graduate => Err(Self::not_owner(action, GRADUATE_ROLE)),
            Role::Zone => Self::authorize_office(actor, action),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime (30 days).
    pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(720);

    fn parse_role(user: &UserData) -> Result<Role, AuthError> {
        Role::from_str(&user.role).map_err(|reason| AuthError::AuthenticationFailed { reason })
    }

    /// Verifies credentials and creates a session.
    ///
    /// Unknown emails and wrong passwords report the same reason.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The login email (case-insensitive)
    /// * `password` - The plaintext password
    /// * `session_ttl` - How long the new session stays valid
    /// * `now` - The login time
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for bad credentials, a disabled
    /// principal, or a storage failure.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        session_ttl: Duration,
        now: OffsetDateTime,
    ) -> Result<(String, AuthenticatedActor, UserData), AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(invalid)?;

        let password_ok: bool = verify_password(password, &user.password_hash).map_err(|e| {
            AuthError::AuthenticationFailed {
                reason: format!("Password verification failed: {e}"),
            }
        })?;
        if !password_ok {
            warn!(user_id = user.user_id, "Login rejected: wrong password");
            return Err(invalid());
        }

        if user.is_disabled {
            warn!(user_id = user.user_id, "Login rejected: principal disabled");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let role: Role = Self::parse_role(&user)?;
        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = now + session_ttl;

        persistence
            .create_session(&session_token, user.user_id, now, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(user.user_id, now)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(user_id = user.user_id, role = %role, "Principal logged in");

        Ok((
            session_token,
            AuthenticatedActor::new(user.user_id, role),
            user,
        ))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// Expired sessions are deleted when they are presented.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    /// * `now` - The request time
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the session is unknown or expired,
    /// or the principal is missing or disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if now > session.expires_at {
            debug!(session_id = session.session_id, "Removing expired session");
            persistence
                .delete_session(session_token)
                .map_err(|e| AuthError::AuthenticationFailed {
                    reason: format!("Failed to delete expired session: {e}"),
                })?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Principal not found"),
            })?;

        if user.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let role: Role = Self::parse_role(&user)?;

        persistence
            .update_session_activity(session.session_id, now)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update session activity: {e}"),
            })?;

        Ok((AuthenticatedActor::new(user.user_id, role), user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }
}

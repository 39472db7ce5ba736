// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction at the server boundary.
//!
//! Handlers that need a principal take [`SessionPrincipal`]; logout takes
//! [`BearerToken`] since it only needs the raw token.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;
use tracing::{debug, warn};
use vgss_api::{AuthenticatedActor, AuthenticationService};
use vgss_persistence::UserData;

use crate::{AppState, HttpError};

/// The authenticated principal behind a request's bearer token.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the token via `AuthenticationService::validate_session`,
///    which rejects expired sessions and disabled principals
/// 3. Return the `AuthenticatedActor` and the principal's `UserData`
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing or malformed, or the
/// session is unknown, expired or belongs to a disabled principal.
pub struct SessionPrincipal(pub AuthenticatedActor, pub UserData);

/// The raw bearer token of a request.
pub struct BearerToken(pub String);

fn bearer_token(parts: &Parts) -> Result<String, SessionError> {
    let header: &str = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            warn!("Authorization header does not carry a bearer token");
            SessionError::InvalidAuthorizationHeader
        })
}

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts).map(Self)
    }
}

impl FromRequestParts<AppState> for SessionPrincipal {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = bearer_token(parts)?;

        let mut persistence = state.persistence.lock().await;
        let (actor, user): (AuthenticatedActor, UserData) =
            AuthenticationService::validate_session(
                &mut persistence,
                &token,
                OffsetDateTime::now_utc(),
            )
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;

        debug!(
            user_id = user.user_id,
            role = %actor.role,
            "Session validated"
        );

        Ok(Self(actor, user))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => reason,
        };

        HttpError {
            status: StatusCode::UNAUTHORIZED,
            kind: "AuthenticationFailed",
            message,
        }
        .into_response()
    }
}

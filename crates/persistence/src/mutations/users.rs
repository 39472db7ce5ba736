// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::convert::format_timestamp;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Hashes a plain-text password with bcrypt.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

/// Inserts a principal with an already-hashed password.
///
/// The email is normalized to lowercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The login email (will be normalized)
/// * `display_name` - The display name
/// * `password_hash` - The bcrypt hash of the password
/// * `role` - The stored role label
/// * `now` - The creation timestamp
///
/// # Errors
///
/// Returns `UniqueViolation` if the email already exists, or another error
/// if the insert fails.
pub fn insert_user(
    conn: &mut SqliteConnection,
    email: &str,
    display_name: &str,
    password_hash: &str,
    role: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    info!(
        "Creating user with email: {}, display_name: {}, role: {}",
        normalized_email, display_name, role
    );

    diesel::insert_into(users::table)
        .values((
            users::email.eq(&normalized_email),
            users::display_name.eq(display_name.trim()),
            users::password_hash.eq(password_hash),
            users::role.eq(role),
            users::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, "User created successfully");
    Ok(user_id)
}

/// Creates a principal, hashing `password` first.
///
/// # Errors
///
/// Returns an error if hashing fails, the email already exists, or the
/// insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    email: &str,
    display_name: &str,
    password: &str,
    role: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let password_hash: String = hash_password(password)?;
    insert_user(conn, email, display_name, &password_hash, role, now)
}

/// Updates the last login timestamp for a principal.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(Some(format_timestamp(now)?)))
        .execute(conn)?;

    Ok(())
}

/// Disables a principal and removes its sessions.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn disable_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    info!("Disabling user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::is_disabled.eq(1),
            users::disabled_at.eq(Some(format_timestamp(now)?)),
        ))
        .execute(conn)?;

    delete_sessions_for_user(conn, user_id)?;
    Ok(())
}

/// Re-enables a disabled principal.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn enable_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    info!("Re-enabling user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((users::is_disabled.eq(0), users::disabled_at.eq(None::<String>)))
        .execute(conn)?;

    Ok(())
}

/// Creates a new session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The principal the session belongs to
/// * `now` - The creation timestamp
/// * `expires_at` - The expiration timestamp
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    now: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(now)?;
    let expires_at: String = format_timestamp(expires_at)?;

    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(&created_at),
            sessions::last_activity_at.eq(&created_at),
            sessions::expires_at.eq(&expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(format_timestamp(now)?))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes all sessions for a principal.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::user_id.eq(user_id))
        .execute(conn)?;

    info!(
        "Deleted {} sessions for user ID: {}",
        rows_affected, user_id
    );
    Ok(rows_affected)
}

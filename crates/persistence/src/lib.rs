// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the VGSS graduate service system.
//!
//! This crate stores principals, sessions, chapters, zone records, graduate
//! profiles, staff requests, assignments and audit events in `SQLite`
//! through Diesel.
//!
//! ## Transactions
//!
//! Workflow operations (registration, graduate and staff request
//! transitions, assignment, zone uploads, chapter changes) each run in one
//! `BEGIN IMMEDIATE` transaction. The write lock is acquired before any
//! precondition is read, so two connections working on the same rows are
//! serialized and the second sees what the first committed. Each committed
//! operation writes exactly one audit event.
//!
//! File databases run in WAL mode with a `busy_timeout`, so a contending
//! writer waits for the lock instead of failing immediately.
//!
//! ## Migrations
//!
//! The schema lives in `migrations/` and is embedded into the binary. It is
//! applied on every open, and foreign key enforcement is verified before the
//! adapter is handed out.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory` gives every caller its own shared-cache
//! in-memory database, so tests are isolated without touching the disk.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use vgss::{AssignGraduate, ChapterCommand};
use vgss_audit::{Actor, Cause, EntityType};
use vgss_domain::{
    Chapter, GraduateAction, GraduateProfile, NewZoneRecord, RegistrationForm, StaffRequest,
    StaffRequestAction, StaffRequestAssignment, StaffRequestDraft, ZoneRecord,
};

mod backend;
mod convert;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::PersistenceBackend;
pub use backend::sqlite::DEFAULT_BUSY_TIMEOUT_MS;
pub use data_models::{
    DEPARTMENT_ROLE, GRADUATE_ROLE, GraduateFilter, OFFICE_ROLE, SessionData, StaffRequestFilter,
    StoredAuditEvent, UserData, ZONE_ROLE, ZoneRecordFilter,
};
pub use error::PersistenceError;
pub use queries::users::verify_password;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:vgss_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(
            &shared_memory_url,
            backend::sqlite::DEFAULT_BUSY_TIMEOUT_MS,
        )?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    /// * `busy_timeout_ms` - How long a write waits on another writer's lock
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(
        path: P,
        busy_timeout_ms: u32,
    ) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(path_str, busy_timeout_ms)?;

        // Enable WAL mode for better read concurrency
        backend::sqlite::enable_wal_mode(&mut conn)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Principals & Sessions
    // ========================================================================

    /// Creates the first principal if and only if none exists yet.
    ///
    /// # Returns
    ///
    /// The new principal id, or `None` if the system was already bootstrapped.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the insert fails.
    pub fn bootstrap_first_user(
        &mut self,
        email: &str,
        display_name: &str,
        password: &str,
        role: &str,
        now: OffsetDateTime,
    ) -> Result<Option<i64>, PersistenceError> {
        let password_hash: String = mutations::users::hash_password(password)?;
        mutations::workflow::bootstrap_first_user(
            &mut self.conn,
            email,
            display_name,
            &password_hash,
            role,
            now,
        )
    }

    /// Creates a principal.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the email exists, or another error if
    /// hashing or the insert fails.
    pub fn create_user(
        &mut self,
        email: &str,
        display_name: &str,
        password: &str,
        role: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, email, display_name, password, role, now)
    }

    /// Retrieves a principal by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a principal by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists all principals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Counts all principals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    /// Counts enabled office principals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_active_office_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_active_office_users(&mut self.conn)
    }

    /// Updates the last login timestamp for a principal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(
        &mut self,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_last_login(&mut self.conn, user_id, now)
    }

    /// Disables a principal and deletes its sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn disable_user(
        &mut self,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::users::disable_user(&mut self.conn, user_id, now)
    }

    /// Re-enables a principal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn enable_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::enable_user(&mut self.conn, user_id)
    }

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        now: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, now, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id, now)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    // ========================================================================
    // Chapters
    // ========================================================================

    /// Retrieves a chapter by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_chapter(&mut self, chapter_id: i64) -> Result<Option<Chapter>, PersistenceError> {
        queries::chapters::get_chapter(&mut self.conn, chapter_id)
    }

    /// Lists chapters, optionally for one zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_chapters(
        &mut self,
        zone_id: Option<i64>,
    ) -> Result<Vec<Chapter>, PersistenceError> {
        queries::chapters::list_chapters(&mut self.conn, zone_id)
    }

    /// Creates, renames or deletes a chapter of `zone_id`.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for workflow rule violations, or a database error.
    pub fn change_chapter(
        &mut self,
        zone_id: i64,
        command: &ChapterCommand,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Option<Chapter>, PersistenceError> {
        mutations::workflow::change_chapter(&mut self.conn, zone_id, command, actor, cause, now)
    }

    // ========================================================================
    // Zone records
    // ========================================================================

    /// Retrieves a zone record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_zone_record(
        &mut self,
        zone_record_id: i64,
    ) -> Result<Option<ZoneRecord>, PersistenceError> {
        queries::zone_records::get_zone_record(&mut self.conn, zone_record_id)
    }

    /// Lists zone records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_zone_records(
        &mut self,
        filter: ZoneRecordFilter,
    ) -> Result<Vec<ZoneRecord>, PersistenceError> {
        queries::zone_records::list_zone_records(&mut self.conn, filter)
    }

    /// Finds unregistered records by normalized phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_unregistered_by_phone(
        &mut self,
        phone: &str,
    ) -> Result<Vec<ZoneRecord>, PersistenceError> {
        queries::zone_records::find_unregistered_by_phone(&mut self.conn, phone)
    }

    /// Stores a zone's batch upload atomically.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for an invalid batch, or a database error.
    pub fn upload_zone_records(
        &mut self,
        zone_id: i64,
        records: &[NewZoneRecord],
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Vec<ZoneRecord>, PersistenceError> {
        mutations::workflow::upload_zone_records(
            &mut self.conn,
            zone_id,
            records,
            actor,
            cause,
            now,
        )
    }

    /// Deletes an unregistered zone record.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the record is missing or registered, or a
    /// database error.
    pub fn delete_zone_record(
        &mut self,
        zone_record_id: i64,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::workflow::delete_zone_record(&mut self.conn, zone_record_id, actor, cause, now)
    }

    // ========================================================================
    // Graduates
    // ========================================================================

    /// Registers a graduate against a zone record.
    ///
    /// The password is hashed before the transaction opens.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for workflow rule violations, or a database error.
    pub fn register_graduate(
        &mut self,
        zone_record_id: i64,
        form: &RegistrationForm,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<GraduateProfile, PersistenceError> {
        let password_hash: String = mutations::users::hash_password(&form.password)?;
        mutations::workflow::register_graduate(
            &mut self.conn,
            zone_record_id,
            form,
            &password_hash,
            actor,
            cause,
            now,
        )
    }

    /// Retrieves a graduate profile by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_graduate(
        &mut self,
        graduate_id: i64,
    ) -> Result<Option<GraduateProfile>, PersistenceError> {
        queries::graduates::get_graduate(&mut self.conn, graduate_id)
    }

    /// Retrieves the profile owned by a graduate principal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_graduate_by_user(
        &mut self,
        user_id: i64,
    ) -> Result<Option<GraduateProfile>, PersistenceError> {
        queries::graduates::get_graduate_by_user(&mut self.conn, user_id)
    }

    /// Lists graduate profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_graduates(
        &mut self,
        filter: GraduateFilter,
    ) -> Result<Vec<GraduateProfile>, PersistenceError> {
        queries::graduates::list_graduates(&mut self.conn, filter)
    }

    /// Applies a graduate status action.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for workflow rule violations, or a database error.
    pub fn transition_graduate(
        &mut self,
        graduate_id: i64,
        action: GraduateAction,
        comments: Option<&str>,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<GraduateProfile, PersistenceError> {
        mutations::workflow::transition_graduate(
            &mut self.conn,
            graduate_id,
            action,
            comments,
            actor,
            cause,
            now,
        )
    }

    // ========================================================================
    // Staff requests
    // ========================================================================

    /// Creates a pending staff request.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for validation failures, or a database error.
    pub fn create_staff_request(
        &mut self,
        department_id: i64,
        draft: &StaffRequestDraft,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<StaffRequest, PersistenceError> {
        mutations::workflow::create_staff_request(
            &mut self.conn,
            department_id,
            draft,
            actor,
            cause,
            now,
        )
    }

    /// Retrieves a staff request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_staff_request(
        &mut self,
        staff_request_id: i64,
    ) -> Result<Option<StaffRequest>, PersistenceError> {
        queries::staff_requests::get_staff_request(&mut self.conn, staff_request_id)
    }

    /// Lists staff requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_staff_requests(
        &mut self,
        filter: StaffRequestFilter,
    ) -> Result<Vec<StaffRequest>, PersistenceError> {
        queries::staff_requests::list_staff_requests(&mut self.conn, filter)
    }

    /// Lists the assignments of a staff request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_assignments(
        &mut self,
        staff_request_id: i64,
    ) -> Result<Vec<StaffRequestAssignment>, PersistenceError> {
        queries::staff_requests::list_assignments(&mut self.conn, staff_request_id)
    }

    /// Applies an approve, reject, cancel or edit action.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for workflow rule violations, or a database error.
    pub fn transition_staff_request(
        &mut self,
        staff_request_id: i64,
        action: &StaffRequestAction,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<StaffRequest, PersistenceError> {
        mutations::workflow::transition_staff_request(
            &mut self.conn,
            staff_request_id,
            action,
            actor,
            cause,
            now,
        )
    }

    /// Deletes a pending or cancelled staff request.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for workflow rule violations, or a database error.
    pub fn delete_staff_request(
        &mut self,
        staff_request_id: i64,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::workflow::delete_staff_request(
            &mut self.conn,
            staff_request_id,
            actor,
            cause,
            now,
        )
    }

    /// Assigns a graduate to an approved staff request.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for workflow rule violations, or a database error.
    pub fn assign_graduate(
        &mut self,
        command: &AssignGraduate,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<StaffRequest, PersistenceError> {
        mutations::workflow::assign_graduate(&mut self.conn, command, actor, cause, now)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a deserialization error.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<StoredAuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit trail of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_trail(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
        queries::audit::get_audit_trail(&mut self.conn, entity_type, entity_id)
    }

    /// Counts all recorded audit events.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_audit_events(&mut self) -> Result<i64, PersistenceError> {
        queries::audit::count_audit_events(&mut self.conn)
    }
}

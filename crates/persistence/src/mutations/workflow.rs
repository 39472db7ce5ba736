// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional workflow orchestration.
//!
//! Every function here runs inside one `BEGIN IMMEDIATE` transaction: the
//! write lock is taken before any precondition is read, the core layer
//! decides the transition, and the entity rows plus exactly one audit event
//! are written before commit. A rejection from the core layer surfaces as
//! `PersistenceError::Rejected` and rolls the transaction back.

use diesel::SqliteConnection;
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::{debug, info};
use vgss::{
    AssignGraduate, AssignmentResult, ChapterCommand, ChapterResult, GraduateTransition,
    RegistrationResult, StaffRequestCreation, StaffRequestTransition, ZoneUploadResult,
    apply_assignment, apply_chapter_command, apply_graduate_action, apply_new_staff_request,
    apply_registration, apply_staff_request_action, apply_staff_request_deletion,
    apply_zone_record_deletion, apply_zone_upload,
};
use vgss_audit::{Actor, AuditEvent, Cause};
use vgss_domain::{
    Chapter, DomainError, GraduateAction, GraduateProfile, NewZoneRecord, RegistrationForm,
    StaffRequest, StaffRequestAction, StaffRequestDraft, ZoneRecord,
};

use crate::data_models::GRADUATE_ROLE;
use crate::error::PersistenceError;
use crate::mutations::{audit, chapters, graduates, staff_requests, users, zone_records};
use crate::queries;

fn reloaded<T>(value: Option<T>, what: &str, id: i64) -> Result<T, PersistenceError> {
    value.ok_or_else(|| PersistenceError::NotFound(format!("{what} {id} vanished after write")))
}

/// Registers a graduate against a zone record.
///
/// Creates the graduate principal and profile, flips the record to
/// registered, and records the audit event.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `zone_record_id` - The record being claimed
/// * `form` - The registration form
/// * `password_hash` - The bcrypt hash of the form's password
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The registration timestamp
///
/// # Errors
///
/// Returns `Rejected` for workflow rule violations, or a database error.
pub fn register_graduate(
    conn: &mut SqliteConnection,
    zone_record_id: i64,
    form: &RegistrationForm,
    password_hash: &str,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<GraduateProfile, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let record: Option<ZoneRecord> =
            queries::zone_records::get_zone_record(conn, zone_record_id)?;
        let email_taken: bool = queries::users::email_exists(conn, &form.email)?;

        let result: RegistrationResult = apply_registration(
            record.as_ref(),
            zone_record_id,
            form,
            email_taken,
            actor,
            cause,
            now,
        )?;

        let user_id: i64 = users::insert_user(
            conn,
            &result.new_profile.email,
            &result.new_profile.full_name,
            password_hash,
            GRADUATE_ROLE,
            now,
        )?;
        let graduate_id: i64 = graduates::insert_graduate(conn, user_id, &result.new_profile)?;
        zone_records::update_registration(conn, &result.registered_record)?;
        let event_id: i64 = audit::persist_audit_event(conn, &result.audit_event, now)?;

        info!(
            event_id,
            zone_record_id, user_id, graduate_id, "Graduate registered"
        );
        reloaded(
            queries::graduates::get_graduate(conn, graduate_id)?,
            "Graduate",
            graduate_id,
        )
    })
}

/// Applies a graduate status action.
///
/// # Errors
///
/// Returns `Rejected` with `GraduateNotFound` or a transition failure, or a
/// database error.
pub fn transition_graduate(
    conn: &mut SqliteConnection,
    graduate_id: i64,
    action: GraduateAction,
    comments: Option<&str>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<GraduateProfile, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let profile: GraduateProfile = queries::graduates::get_graduate(conn, graduate_id)?
            .ok_or(DomainError::GraduateNotFound(graduate_id))?;

        let transition: GraduateTransition =
            apply_graduate_action(&profile, action, comments, actor, cause, now)?;

        graduates::update_graduate(conn, &transition.new_profile)?;
        let event_id: i64 = audit::persist_audit_event(conn, &transition.audit_event, now)?;

        info!(
            event_id,
            graduate_id,
            status = %transition.new_profile.status,
            "Graduate transitioned"
        );
        Ok(transition.new_profile)
    })
}

/// Creates a pending staff request owned by `department_id`.
///
/// # Errors
///
/// Returns `Rejected` for draft validation failures, or a database error.
pub fn create_staff_request(
    conn: &mut SqliteConnection,
    department_id: i64,
    draft: &StaffRequestDraft,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<StaffRequest, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let creation: StaffRequestCreation =
            apply_new_staff_request(department_id, draft, actor, cause, now)?;

        let staff_request_id: i64 =
            staff_requests::insert_staff_request(conn, &creation.new_request)?;
        let event: AuditEvent = creation.audit_event.for_entity(staff_request_id);
        let event_id: i64 = audit::persist_audit_event(conn, &event, now)?;

        info!(event_id, staff_request_id, department_id, "Staff request created");
        reloaded(
            queries::staff_requests::get_staff_request(conn, staff_request_id)?,
            "Staff request",
            staff_request_id,
        )
    })
}

/// Applies an approve, reject, cancel or edit action to a staff request.
///
/// # Errors
///
/// Returns `Rejected` with `RequestNotFound`, `IllegalTransition` or a
/// validation failure, or a database error.
pub fn transition_staff_request(
    conn: &mut SqliteConnection,
    staff_request_id: i64,
    action: &StaffRequestAction,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<StaffRequest, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let request: StaffRequest =
            queries::staff_requests::get_staff_request(conn, staff_request_id)?
                .ok_or(DomainError::RequestNotFound(staff_request_id))?;

        let transition: StaffRequestTransition =
            apply_staff_request_action(&request, action, actor, cause, now)?;

        staff_requests::update_staff_request(conn, &transition.new_request)?;
        let event_id: i64 = audit::persist_audit_event(conn, &transition.audit_event, now)?;

        info!(
            event_id,
            staff_request_id,
            action = action.name(),
            status = %transition.new_request.status,
            "Staff request transitioned"
        );
        Ok(transition.new_request)
    })
}

/// Deletes a pending or cancelled staff request.
///
/// # Errors
///
/// Returns `Rejected` with `RequestNotFound` or `IllegalTransition`, or a
/// database error.
pub fn delete_staff_request(
    conn: &mut SqliteConnection,
    staff_request_id: i64,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let request: StaffRequest =
            queries::staff_requests::get_staff_request(conn, staff_request_id)?
                .ok_or(DomainError::RequestNotFound(staff_request_id))?;

        let event: AuditEvent = apply_staff_request_deletion(&request, actor, cause)?;

        staff_requests::delete_staff_request(conn, staff_request_id)?;
        let event_id: i64 = audit::persist_audit_event(conn, &event, now)?;

        info!(event_id, staff_request_id, "Staff request deleted");
        Ok(())
    })
}

/// Assigns a graduate to an approved staff request.
///
/// The request row is read after the write lock is held, so concurrent
/// assignments against one request are serialized and each observes the
/// counter the previous one committed.
///
/// # Errors
///
/// Returns `Rejected` with `RequestNotFound`, `IllegalTransition`,
/// `CapacityExceeded`, `DuplicateAssignment`, `GraduateNotFound`,
/// `AlreadyAssigned` or `GraduateNotEligible`, or a database error.
pub fn assign_graduate(
    conn: &mut SqliteConnection,
    command: &AssignGraduate,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<StaffRequest, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let request: Option<StaffRequest> =
            queries::staff_requests::get_staff_request(conn, command.staff_request_id)?;
        let already_paired: bool = queries::staff_requests::assignment_exists(
            conn,
            command.staff_request_id,
            command.graduate_id,
        )?;
        let graduate: Option<GraduateProfile> =
            queries::graduates::get_graduate(conn, command.graduate_id)?;

        let result: AssignmentResult = apply_assignment(
            command,
            request.as_ref(),
            already_paired,
            graduate.as_ref(),
            actor,
            cause,
            now,
        )?;

        let assignment_id: i64 = staff_requests::insert_assignment(conn, &result.new_assignment)?;
        graduates::update_graduate(conn, &result.new_graduate)?;
        staff_requests::update_staff_request(conn, &result.new_request)?;
        let event_id: i64 = audit::persist_audit_event(conn, &result.audit_event, now)?;

        info!(
            event_id,
            assignment_id,
            staff_request_id = command.staff_request_id,
            graduate_id = command.graduate_id,
            fulfilled_count = result.new_request.fulfilled_count,
            "Graduate assigned"
        );
        Ok(result.new_request)
    })
}

/// Stores a zone's batch upload, all or nothing.
///
/// # Errors
///
/// Returns `Rejected` for an empty batch, an invalid row, a chapter the
/// zone does not own or a duplicate phone, or a database error.
pub fn upload_zone_records(
    conn: &mut SqliteConnection,
    zone_id: i64,
    records: &[NewZoneRecord],
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<Vec<ZoneRecord>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let existing_phones: HashSet<String> = queries::zone_records::zone_phones(conn, zone_id)?;
        let zone_chapter_ids: HashSet<i64> = queries::chapters::zone_chapter_ids(conn, zone_id)?;

        let upload: ZoneUploadResult = apply_zone_upload(
            zone_id,
            records,
            &existing_phones,
            &zone_chapter_ids,
            actor,
            cause,
        )?;

        let mut stored: Vec<ZoneRecord> = Vec::with_capacity(upload.records.len());
        for record in &upload.records {
            let zone_record_id: i64 =
                zone_records::insert_zone_record(conn, zone_id, record, now)?;
            stored.push(reloaded(
                queries::zone_records::get_zone_record(conn, zone_record_id)?,
                "Zone record",
                zone_record_id,
            )?);
        }
        let event_id: i64 = audit::persist_audit_event(conn, &upload.audit_event, now)?;

        info!(event_id, zone_id, count = stored.len(), "Zone records uploaded");
        Ok(stored)
    })
}

/// Deletes an unregistered zone record.
///
/// # Errors
///
/// Returns `Rejected` with `ZoneRecordNotFound` or `IllegalTransition`, or
/// a database error.
pub fn delete_zone_record(
    conn: &mut SqliteConnection,
    zone_record_id: i64,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let record: ZoneRecord = queries::zone_records::get_zone_record(conn, zone_record_id)?
            .ok_or(DomainError::ZoneRecordNotFound(zone_record_id))?;

        let event: AuditEvent = apply_zone_record_deletion(&record, actor, cause)?;

        zone_records::delete_zone_record(conn, zone_record_id)?;
        let event_id: i64 = audit::persist_audit_event(conn, &event, now)?;

        info!(event_id, zone_record_id, "Zone record deleted");
        Ok(())
    })
}

/// Creates, renames or deletes a chapter of `zone_id`.
///
/// # Returns
///
/// The chapter after the change, or `None` after a deletion.
///
/// # Errors
///
/// Returns `Rejected` with `ChapterNotFound`, `DuplicateChapterName` or a
/// validation failure, or a database error.
pub fn change_chapter(
    conn: &mut SqliteConnection,
    zone_id: i64,
    command: &ChapterCommand,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<Option<Chapter>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let (existing, name_taken): (Option<Chapter>, bool) = match command {
            ChapterCommand::Create { name } => (
                None,
                queries::chapters::chapter_name_taken(conn, zone_id, name, None)?,
            ),
            ChapterCommand::Rename { chapter_id, name } => (
                queries::chapters::get_chapter(conn, *chapter_id)?,
                queries::chapters::chapter_name_taken(conn, zone_id, name, Some(*chapter_id))?,
            ),
            ChapterCommand::Delete { chapter_id } => {
                (queries::chapters::get_chapter(conn, *chapter_id)?, false)
            }
        };

        let result: ChapterResult = apply_chapter_command(
            zone_id,
            existing.as_ref(),
            command,
            name_taken,
            actor,
            cause,
        )?;

        let (chapter, event): (Option<Chapter>, AuditEvent) = match (command, result.chapter) {
            (ChapterCommand::Create { .. }, Some(chapter)) => {
                let chapter_id: i64 = chapters::insert_chapter(conn, zone_id, &chapter.name)?;
                (
                    Some(Chapter {
                        chapter_id,
                        ..chapter
                    }),
                    result.audit_event.for_entity(chapter_id),
                )
            }
            (ChapterCommand::Rename { chapter_id, .. }, Some(chapter)) => {
                chapters::rename_chapter(conn, *chapter_id, &chapter.name)?;
                (Some(chapter), result.audit_event)
            }
            (ChapterCommand::Delete { chapter_id }, _) => {
                chapters::delete_chapter(conn, *chapter_id)?;
                (None, result.audit_event)
            }
            (_, None) => {
                return Err(PersistenceError::Other(format!(
                    "{} produced no chapter",
                    command.action_name()
                )));
            }
        };
        let event_id: i64 = audit::persist_audit_event(conn, &event, now)?;

        debug!(event_id, zone_id, action = command.action_name(), "Chapter changed");
        Ok(chapter)
    })
}

/// Creates the first principal, only while no principal exists.
///
/// # Returns
///
/// The new principal's id, or `None` if the system is already bootstrapped.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn bootstrap_first_user(
    conn: &mut SqliteConnection,
    email: &str,
    display_name: &str,
    password_hash: &str,
    role: &str,
    now: OffsetDateTime,
) -> Result<Option<i64>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        if queries::users::count_users(conn)? > 0 {
            return Ok(None);
        }
        let user_id: i64 = users::insert_user(conn, email, display_name, password_hash, role, now)?;
        info!(user_id, "System bootstrapped");
        Ok(Some(user_id))
    })
}

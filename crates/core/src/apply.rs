// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{AssignGraduate, ChapterCommand};
use crate::error::CoreError;
use crate::state::{
    AssignmentResult, ChapterResult, GraduateTransition, RegistrationResult, StaffRequestCreation,
    StaffRequestTransition, ZoneUploadResult, graduate_snapshot, staff_request_snapshot,
    zone_record_snapshot,
};
use std::collections::HashSet;
use time::OffsetDateTime;
use vgss_audit::{Action, Actor, AuditEvent, Cause, EntityType, StateSnapshot};
use vgss_domain::{
    Chapter, DomainError, GraduateAction, GraduateProfile, NewAssignment, NewGraduateProfile,
    NewStaffRequest, NewZoneRecord, RegistrationForm, StaffRequest, StaffRequestAction,
    StaffRequestDraft, ZoneRecord, normalize_email, normalize_phone, validate_chapter_name,
    validate_zone_phones_unique, validate_zone_record,
};

/// Returns the principal id behind `actor`.
fn principal_id(actor: &Actor) -> Result<i64, CoreError> {
    actor
        .user_id
        .ok_or(CoreError::DomainViolation(DomainError::MissingField("actor")))
}

/// Resolves the chapter a rename or delete targets, hiding other zones' chapters.
fn owned_chapter(
    existing: Option<&Chapter>,
    zone_id: i64,
    chapter_id: i64,
) -> Result<&Chapter, DomainError> {
    existing
        .filter(|c| c.chapter_id == chapter_id && c.zone_id == zone_id)
        .ok_or(DomainError::ChapterNotFound(chapter_id))
}

/// Applies a self-registration against a zone record.
///
/// Checks run in this order: the record exists, it is unregistered, the
/// form is complete and well-formed, and the email is unused.
///
/// # Arguments
///
/// * `record` - The zone record, if it exists
/// * `zone_record_id` - The requested zone record id
/// * `form` - The submitted registration form
/// * `email_taken` - Whether a principal already uses the form's email
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The registration timestamp
///
/// # Errors
///
/// Returns `ZoneRecordNotFound`, `AlreadyRegistered`, form validation
/// errors, or `DuplicateEmail`.
pub fn apply_registration(
    record: Option<&ZoneRecord>,
    zone_record_id: i64,
    form: &RegistrationForm,
    email_taken: bool,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RegistrationResult, CoreError> {
    let record: &ZoneRecord = record.ok_or(DomainError::ZoneRecordNotFound(zone_record_id))?;
    let registered_record: ZoneRecord = record.mark_registered(now)?;

    form.validate()?;
    if email_taken {
        return Err(DomainError::DuplicateEmail(normalize_email(&form.email)).into());
    }

    let new_profile: NewGraduateProfile = form.to_profile(record, now);
    let action: Action = Action::new(
        String::from("RegisterGraduate"),
        Some(format!(
            "Graduate '{}' registered with email {}",
            new_profile.full_name, new_profile.email
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        zone_record_snapshot(record),
        zone_record_snapshot(&registered_record),
        EntityType::ZoneRecord,
        Some(record.zone_record_id),
    );

    Ok(RegistrationResult {
        registered_record,
        new_profile,
        audit_event,
    })
}

/// Applies an office action to a graduate profile.
///
/// # Errors
///
/// Returns an error if the action's own requirements are not met.
pub fn apply_graduate_action(
    profile: &GraduateProfile,
    action: GraduateAction,
    comments: Option<&str>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<GraduateTransition, CoreError> {
    let actor_id: i64 = principal_id(&actor)?;
    let new_profile: GraduateProfile = profile.apply_action(action, comments, actor_id, now)?;

    let audit_action: Action = Action::new(
        String::from("GraduateAction"),
        Some(format!(
            "{} on graduate {}: {} -> {}",
            action.name(),
            profile.graduate_id,
            profile.status,
            new_profile.status
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        audit_action,
        graduate_snapshot(profile),
        graduate_snapshot(&new_profile),
        EntityType::Graduate,
        Some(profile.graduate_id),
    );

    Ok(GraduateTransition {
        new_profile,
        audit_event,
    })
}

/// Applies the creation of a staff request by `department_id`.
///
/// # Errors
///
/// Returns draft validation errors.
pub fn apply_new_staff_request(
    department_id: i64,
    draft: &StaffRequestDraft,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<StaffRequestCreation, CoreError> {
    let new_request: NewStaffRequest = NewStaffRequest::new(department_id, draft, now)?;

    let action: Action = Action::new(
        String::from("CreateStaffRequest"),
        Some(format!(
            "Department {department_id} requested {} x '{}'",
            new_request.draft.number_of_staff, new_request.draft.position_title
        )),
    );
    let after: StateSnapshot = StateSnapshot::new(format!(
        "status=Pending,fulfilled_count=0/{}",
        new_request.draft.number_of_staff
    ));
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::absent(),
        after,
        EntityType::StaffRequest,
        None,
    );

    Ok(StaffRequestCreation {
        new_request,
        audit_event,
    })
}

/// Applies an approve, reject, cancel or edit action to a staff request.
///
/// # Errors
///
/// Returns `IllegalTransition` if the request is not pending, or the
/// action's validation errors.
pub fn apply_staff_request_action(
    request: &StaffRequest,
    action: &StaffRequestAction,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<StaffRequestTransition, CoreError> {
    let actor_id: i64 = principal_id(&actor)?;
    let new_request: StaffRequest = request.apply_action(action, actor_id, now)?;

    let details: String = match action {
        StaffRequestAction::Reject { reason } => format!(
            "reject staff request {}: {}",
            request.staff_request_id,
            reason.trim()
        ),
        other => format!("{} staff request {}", other.name(), request.staff_request_id),
    };
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from("StaffRequestAction"), Some(details)),
        staff_request_snapshot(request),
        staff_request_snapshot(&new_request),
        EntityType::StaffRequest,
        Some(request.staff_request_id),
    );

    Ok(StaffRequestTransition {
        new_request,
        audit_event,
    })
}

/// Validates the deletion of a staff request.
///
/// # Errors
///
/// Returns `IllegalTransition` unless the request is pending or cancelled.
pub fn apply_staff_request_deletion(
    request: &StaffRequest,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    request.ensure_deletable()?;

    Ok(AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("DeleteStaffRequest"),
            Some(format!("Deleted staff request {}", request.staff_request_id)),
        ),
        staff_request_snapshot(request),
        StateSnapshot::absent(),
        EntityType::StaffRequest,
        Some(request.staff_request_id),
    ))
}

/// Applies the assignment of a graduate to a staff request.
///
/// Checks run in a fixed order so concurrent callers observe consistent
/// failures:
/// 1. the request exists
/// 2. the request is `Approved`
/// 3. the request has a free slot
/// 4. the pair is not already assigned
/// 5. the graduate exists
/// 6. the graduate is not serving elsewhere
/// 7. the graduate is approved and `Interviewed` or `Sighting`
///
/// # Arguments
///
/// * `command` - The assignment request
/// * `request` - The staff request, if it exists
/// * `already_paired` - Whether an assignment row for the pair exists
/// * `graduate` - The graduate, if it exists
/// * `actor` - The office principal performing the assignment
/// * `cause` - The cause or reason for this action
/// * `now` - The assignment timestamp
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn apply_assignment(
    command: &AssignGraduate,
    request: Option<&StaffRequest>,
    already_paired: bool,
    graduate: Option<&GraduateProfile>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<AssignmentResult, CoreError> {
    let assigned_by: i64 = principal_id(&actor)?;

    let request: &StaffRequest =
        request.ok_or(DomainError::RequestNotFound(command.staff_request_id))?;
    request.ensure_accepts_assignment()?;

    if already_paired {
        return Err(DomainError::DuplicateAssignment {
            request_id: request.staff_request_id,
            graduate_id: command.graduate_id,
        }
        .into());
    }

    let graduate: &GraduateProfile =
        graduate.ok_or(DomainError::GraduateNotFound(command.graduate_id))?;
    graduate.ensure_assignable()?;

    let new_request: StaffRequest = request.record_assignment(now)?;
    let new_graduate: GraduateProfile = graduate.assigned_to(request.department_id, now);
    let new_assignment: NewAssignment = NewAssignment {
        staff_request_id: request.staff_request_id,
        graduate_id: graduate.graduate_id,
        assigned_by,
        assigned_at: now,
        notes: command
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from),
    };

    let action: Action = Action::new(
        String::from("AssignGraduate"),
        Some(format!(
            "Assigned graduate {} to staff request {} ({}/{})",
            graduate.graduate_id,
            request.staff_request_id,
            new_request.fulfilled_count,
            new_request.number_of_staff
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        staff_request_snapshot(request),
        staff_request_snapshot(&new_request),
        EntityType::StaffRequest,
        Some(request.staff_request_id),
    );

    Ok(AssignmentResult {
        new_request,
        new_graduate,
        new_assignment,
        audit_event,
    })
}

/// Applies a zone's batch upload.
///
/// Phones are normalized and text fields trimmed before validation. The
/// batch is all-or-nothing: any invalid row or duplicate phone fails it.
///
/// # Arguments
///
/// * `zone_id` - The uploading zone
/// * `records` - The submitted records
/// * `existing_phones` - Phones already stored for the zone
/// * `zone_chapter_ids` - Chapters owned by the zone
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `MissingField("records")` for an empty batch, row validation
/// errors, `ChapterNotFound` for a chapter the zone does not own, or
/// `DuplicatePhone` naming the offending phone.
pub fn apply_zone_upload(
    zone_id: i64,
    records: &[NewZoneRecord],
    existing_phones: &HashSet<String>,
    zone_chapter_ids: &HashSet<i64>,
    actor: Actor,
    cause: Cause,
) -> Result<ZoneUploadResult, CoreError> {
    if records.is_empty() {
        return Err(DomainError::MissingField("records").into());
    }

    let records: Vec<NewZoneRecord> = records
        .iter()
        .map(|r| NewZoneRecord {
            full_name: r.full_name.trim().to_string(),
            phone: normalize_phone(&r.phone),
            university: r.university.trim().to_string(),
            course: r.course.trim().to_string(),
            pastor_phone: r.pastor_phone.as_deref().map(normalize_phone),
            ..r.clone()
        })
        .collect();

    for record in &records {
        validate_zone_record(record)?;
        if let Some(chapter_id) = record.chapter_id
            && !zone_chapter_ids.contains(&chapter_id)
        {
            return Err(DomainError::ChapterNotFound(chapter_id).into());
        }
    }
    validate_zone_phones_unique(zone_id, &records, existing_phones)?;

    let action: Action = Action::new(
        String::from("UploadZoneRecords"),
        Some(format!("Zone {zone_id} uploaded {} records", records.len())),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::new(format!("zone_records={}", existing_phones.len())),
        StateSnapshot::new(format!(
            "zone_records={}",
            existing_phones.len() + records.len()
        )),
        EntityType::Principal,
        Some(zone_id),
    );

    Ok(ZoneUploadResult {
        records,
        audit_event,
    })
}

/// Validates the deletion of a zone record.
///
/// # Errors
///
/// Returns `IllegalTransition` for registered records.
pub fn apply_zone_record_deletion(
    record: &ZoneRecord,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    record.ensure_deletable()?;

    Ok(AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("DeleteZoneRecord"),
            Some(format!("Deleted zone record {}", record.zone_record_id)),
        ),
        zone_record_snapshot(record),
        StateSnapshot::absent(),
        EntityType::ZoneRecord,
        Some(record.zone_record_id),
    ))
}

/// Applies a chapter change for `zone_id`.
///
/// A chapter belonging to another zone is reported as not found.
///
/// # Arguments
///
/// * `zone_id` - The zone making the change
/// * `existing` - The chapter being renamed or deleted, if it exists
/// * `command` - The change
/// * `name_taken` - Whether another chapter in the zone already uses the name
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `MissingField("name")`, `ChapterNotFound`, or
/// `DuplicateChapterName`.
pub fn apply_chapter_command(
    zone_id: i64,
    existing: Option<&Chapter>,
    command: &ChapterCommand,
    name_taken: bool,
    actor: Actor,
    cause: Cause,
) -> Result<ChapterResult, CoreError> {
    let check_name = |name: &str| -> Result<String, DomainError> {
        validate_chapter_name(name)?;
        let name: String = name.trim().to_string();
        if name_taken {
            return Err(DomainError::DuplicateChapterName { zone_id, name });
        }
        Ok(name)
    };
    let snapshot = |chapter: Option<&Chapter>| -> StateSnapshot {
        chapter.map_or_else(StateSnapshot::absent, |c| {
            StateSnapshot::new(format!("name={}", c.name))
        })
    };

    let (before, chapter): (Option<&Chapter>, Option<Chapter>) = match command {
        ChapterCommand::Create { name } => (
            None,
            Some(Chapter {
                chapter_id: 0,
                zone_id,
                name: check_name(name.as_str())?,
            }),
        ),
        ChapterCommand::Rename { chapter_id, name } => {
            let current: &Chapter = owned_chapter(existing, zone_id, *chapter_id)?;
            let name: String = check_name(name.as_str())?;
            (
                Some(current),
                Some(Chapter {
                    name,
                    ..current.clone()
                }),
            )
        }
        ChapterCommand::Delete { chapter_id } => {
            (Some(owned_chapter(existing, zone_id, *chapter_id)?), None)
        }
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(command.action_name()), None),
        snapshot(before),
        snapshot(chapter.as_ref()),
        EntityType::Chapter,
        before.map(|c| c.chapter_id),
    );

    Ok(ChapterResult {
        chapter,
        audit_event,
    })
}

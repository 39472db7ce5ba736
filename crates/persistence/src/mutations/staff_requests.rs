// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use vgss_domain::{NewAssignment, NewStaffRequest, StaffRequest, StaffRequestStatus};

use crate::backend::PersistenceBackend;
use crate::convert::{format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{staff_request_assignments, staff_requests};
use crate::error::PersistenceError;

/// Inserts a pending request and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_staff_request(
    conn: &mut SqliteConnection,
    request: &NewStaffRequest,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(request.created_at)?;

    diesel::insert_into(staff_requests::table)
        .values((
            staff_requests::department_id.eq(request.department_id),
            staff_requests::position_title.eq(&request.draft.position_title),
            staff_requests::description.eq(&request.draft.description),
            staff_requests::number_of_staff.eq(i32::from(request.draft.number_of_staff)),
            staff_requests::skills.eq(&request.draft.skills),
            staff_requests::qualifications.eq(&request.draft.qualifications),
            staff_requests::preferred_gender.eq(request.draft.preferred_gender.map(|g| g.as_str())),
            staff_requests::urgency.eq(request.draft.urgency.as_str()),
            staff_requests::status.eq(StaffRequestStatus::Pending.as_str()),
            staff_requests::fulfilled_count.eq(0),
            staff_requests::created_at.eq(&created_at),
            staff_requests::updated_at.eq(&created_at),
        ))
        .execute(conn)?;

    let staff_request_id: i64 = conn.get_last_insert_rowid()?;
    debug!(staff_request_id, "Staff request inserted");
    Ok(staff_request_id)
}

/// Writes every mutable column of a request.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_staff_request(
    conn: &mut SqliteConnection,
    request: &StaffRequest,
) -> Result<(), PersistenceError> {
    diesel::update(staff_requests::table)
        .filter(staff_requests::staff_request_id.eq(request.staff_request_id))
        .set((
            staff_requests::position_title.eq(&request.position_title),
            staff_requests::description.eq(&request.description),
            staff_requests::number_of_staff.eq(i32::from(request.number_of_staff)),
            staff_requests::skills.eq(&request.skills),
            staff_requests::qualifications.eq(&request.qualifications),
            staff_requests::preferred_gender.eq(request.preferred_gender.map(|g| g.as_str())),
            staff_requests::urgency.eq(request.urgency.as_str()),
            staff_requests::status.eq(request.status.as_str()),
            staff_requests::fulfilled_count.eq(i32::from(request.fulfilled_count)),
            staff_requests::approved_by.eq(request.approved_by),
            staff_requests::approved_at.eq(format_optional_timestamp(request.approved_at)?),
            staff_requests::rejection_reason.eq(&request.rejection_reason),
            staff_requests::fulfilled_at.eq(format_optional_timestamp(request.fulfilled_at)?),
            staff_requests::updated_at.eq(format_timestamp(request.updated_at)?),
        ))
        .execute(conn)?;
    Ok(())
}

/// Deletes a request.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_staff_request(
    conn: &mut SqliteConnection,
    staff_request_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(staff_requests::table)
        .filter(staff_requests::staff_request_id.eq(staff_request_id))
        .execute(conn)?;
    Ok(())
}

/// Inserts an assignment row and returns its id.
///
/// # Errors
///
/// Returns `UniqueViolation` if the graduate is already assigned.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    assignment: &NewAssignment,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(staff_request_assignments::table)
        .values((
            staff_request_assignments::staff_request_id.eq(assignment.staff_request_id),
            staff_request_assignments::graduate_id.eq(assignment.graduate_id),
            staff_request_assignments::assigned_by.eq(assignment.assigned_by),
            staff_request_assignments::assigned_at.eq(format_timestamp(assignment.assigned_at)?),
            staff_request_assignments::notes.eq(&assignment.notes),
        ))
        .execute(conn)?;

    let assignment_id: i64 = conn.get_last_insert_rowid()?;
    debug!(assignment_id, "Assignment inserted");
    Ok(assignment_id)
}

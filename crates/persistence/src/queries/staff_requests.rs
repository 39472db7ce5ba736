// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff request and assignment queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use vgss_domain::{StaffRequest, StaffRequestAssignment};

use crate::convert::{parse_label, parse_optional_timestamp, parse_timestamp, to_u8};
use crate::data_models::StaffRequestFilter;
use crate::diesel_schema::{staff_request_assignments, staff_requests};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = staff_requests)]
struct StaffRequestRow {
    staff_request_id: i64,
    department_id: i64,
    position_title: String,
    description: String,
    number_of_staff: i32,
    skills: Option<String>,
    qualifications: Option<String>,
    preferred_gender: Option<String>,
    urgency: String,
    status: String,
    fulfilled_count: i32,
    approved_by: Option<i64>,
    approved_at: Option<String>,
    rejection_reason: Option<String>,
    fulfilled_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl StaffRequestRow {
    fn into_request(self) -> Result<StaffRequest, PersistenceError> {
        Ok(StaffRequest {
            staff_request_id: self.staff_request_id,
            department_id: self.department_id,
            position_title: self.position_title,
            description: self.description,
            number_of_staff: to_u8(self.number_of_staff, "number_of_staff")?,
            skills: self.skills,
            qualifications: self.qualifications,
            preferred_gender: self
                .preferred_gender
                .as_deref()
                .map(parse_label)
                .transpose()?,
            urgency: parse_label(&self.urgency)?,
            status: parse_label(&self.status)?,
            fulfilled_count: to_u8(self.fulfilled_count, "fulfilled_count")?,
            approved_by: self.approved_by,
            approved_at: parse_optional_timestamp(self.approved_at.as_deref())?,
            rejection_reason: self.rejection_reason,
            fulfilled_at: parse_optional_timestamp(self.fulfilled_at.as_deref())?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = staff_request_assignments)]
struct AssignmentRow {
    assignment_id: i64,
    staff_request_id: i64,
    graduate_id: i64,
    assigned_by: i64,
    assigned_at: String,
    notes: Option<String>,
}

/// Retrieves a staff request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the request is not found.
pub fn get_staff_request(
    conn: &mut SqliteConnection,
    staff_request_id: i64,
) -> Result<Option<StaffRequest>, PersistenceError> {
    debug!("Looking up staff request by ID: {}", staff_request_id);

    let result: Result<StaffRequestRow, diesel::result::Error> = staff_requests::table
        .filter(staff_requests::staff_request_id.eq(staff_request_id))
        .select(StaffRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_request()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists staff requests, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_staff_requests(
    conn: &mut SqliteConnection,
    filter: StaffRequestFilter,
) -> Result<Vec<StaffRequest>, PersistenceError> {
    let mut query = staff_requests::table
        .select(StaffRequestRow::as_select())
        .order(staff_requests::staff_request_id.desc())
        .into_boxed();

    if let Some(department_id) = filter.department_id {
        query = query.filter(staff_requests::department_id.eq(department_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(staff_requests::status.eq(status.as_str()));
    }

    let rows: Vec<StaffRequestRow> = query.load(conn)?;
    rows.into_iter().map(StaffRequestRow::into_request).collect()
}

/// Lists the assignments made against a staff request, in assignment order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_assignments(
    conn: &mut SqliteConnection,
    staff_request_id: i64,
) -> Result<Vec<StaffRequestAssignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = staff_request_assignments::table
        .filter(staff_request_assignments::staff_request_id.eq(staff_request_id))
        .select(AssignmentRow::as_select())
        .order(staff_request_assignments::assignment_id.asc())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(StaffRequestAssignment {
                assignment_id: row.assignment_id,
                staff_request_id: row.staff_request_id,
                graduate_id: row.graduate_id,
                assigned_by: row.assigned_by,
                assigned_at: parse_timestamp(&row.assigned_at)?,
                notes: row.notes,
            })
        })
        .collect()
}

/// Returns true if the graduate is already assigned to the request.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn assignment_exists(
    conn: &mut SqliteConnection,
    staff_request_id: i64,
    graduate_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = staff_request_assignments::table
        .filter(staff_request_assignments::staff_request_id.eq(staff_request_id))
        .filter(staff_request_assignments::graduate_id.eq(graduate_id))
        .select(diesel::dsl::count(staff_request_assignments::assignment_id))
        .first(conn)?;
    Ok(count > 0)
}

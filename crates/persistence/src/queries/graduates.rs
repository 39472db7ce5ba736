// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Graduate profile queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use vgss_domain::{GraduateDetails, GraduateProfile, GraduateStatus};

use crate::convert::{from_flag, parse_label, parse_optional_timestamp, parse_timestamp, to_u16};
use crate::data_models::GraduateFilter;
use crate::diesel_schema::graduate_profiles;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = graduate_profiles)]
struct GraduateRow {
    graduate_id: i64,
    user_id: i64,
    zone_record_id: Option<i64>,
    full_name: String,
    email: String,
    phone: String,
    gender: String,
    university: String,
    course: String,
    graduation_year: i32,
    chapter_id: Option<i64>,
    details_json: String,
    status: String,
    is_approved: i32,
    approved_by: Option<i64>,
    approved_at: Option<String>,
    comments: Option<String>,
    service_department_id: Option<i64>,
    service_started_at: Option<String>,
    service_completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl GraduateRow {
    fn into_profile(self) -> Result<GraduateProfile, PersistenceError> {
        let details: GraduateDetails = serde_json::from_str(&self.details_json)?;

        Ok(GraduateProfile {
            graduate_id: self.graduate_id,
            user_id: self.user_id,
            zone_record_id: self.zone_record_id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            gender: parse_label(&self.gender)?,
            university: self.university,
            course: self.course,
            graduation_year: to_u16(self.graduation_year, "graduation_year")?,
            chapter_id: self.chapter_id,
            details,
            status: parse_label(&self.status)?,
            is_approved: from_flag(self.is_approved),
            approved_by: self.approved_by,
            approved_at: parse_optional_timestamp(self.approved_at.as_deref())?,
            comments: self.comments,
            service_department_id: self.service_department_id,
            service_started_at: parse_optional_timestamp(self.service_started_at.as_deref())?,
            service_completed_at: parse_optional_timestamp(
                self.service_completed_at.as_deref(),
            )?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Retrieves a graduate profile by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the profile is not found.
pub fn get_graduate(
    conn: &mut SqliteConnection,
    graduate_id: i64,
) -> Result<Option<GraduateProfile>, PersistenceError> {
    debug!("Looking up graduate by ID: {}", graduate_id);

    let result: Result<GraduateRow, diesel::result::Error> = graduate_profiles::table
        .filter(graduate_profiles::graduate_id.eq(graduate_id))
        .select(GraduateRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_profile()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the profile owned by a graduate principal.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the principal has no profile.
pub fn get_graduate_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<GraduateProfile>, PersistenceError> {
    debug!("Looking up graduate by user ID: {}", user_id);

    let result: Result<GraduateRow, diesel::result::Error> = graduate_profiles::table
        .filter(graduate_profiles::user_id.eq(user_id))
        .select(GraduateRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_profile()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists graduate profiles ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_graduates(
    conn: &mut SqliteConnection,
    filter: GraduateFilter,
) -> Result<Vec<GraduateProfile>, PersistenceError> {
    let mut query = graduate_profiles::table
        .select(GraduateRow::as_select())
        .order(graduate_profiles::graduate_id.asc())
        .into_boxed();

    if let Some(status) = filter.status {
        query = query.filter(graduate_profiles::status.eq(status.as_str()));
    }
    if let Some(is_approved) = filter.is_approved {
        query = query.filter(graduate_profiles::is_approved.eq(i32::from(is_approved)));
    }
    if let Some(department_id) = filter.service_department_id {
        query = query.filter(graduate_profiles::service_department_id.eq(department_id));
    }
    if filter.available_only {
        let assignable: Vec<&str> = GraduateStatus::ALL
            .iter()
            .filter(|s| s.is_assignable())
            .map(GraduateStatus::as_str)
            .collect();
        query = query
            .filter(graduate_profiles::is_approved.eq(1))
            .filter(graduate_profiles::service_department_id.is_null())
            .filter(graduate_profiles::status.eq_any(assignable));
    }

    let rows: Vec<GraduateRow> = query.load(conn)?;
    rows.into_iter().map(GraduateRow::into_profile).collect()
}

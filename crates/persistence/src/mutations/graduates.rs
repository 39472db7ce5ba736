// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use vgss_domain::{GraduateProfile, NewGraduateProfile};

use crate::backend::PersistenceBackend;
use crate::convert::{format_optional_timestamp, format_timestamp, to_flag};
use crate::diesel_schema::graduate_profiles;
use crate::error::PersistenceError;

/// Inserts a profile owned by `user_id` and returns its id.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_graduate(
    conn: &mut SqliteConnection,
    user_id: i64,
    profile: &NewGraduateProfile,
) -> Result<i64, PersistenceError> {
    let details_json: String = serde_json::to_string(&profile.details)?;
    let created_at: String = format_timestamp(profile.created_at)?;

    diesel::insert_into(graduate_profiles::table)
        .values((
            graduate_profiles::user_id.eq(user_id),
            graduate_profiles::zone_record_id.eq(profile.zone_record_id),
            graduate_profiles::full_name.eq(&profile.full_name),
            graduate_profiles::email.eq(&profile.email),
            graduate_profiles::phone.eq(&profile.phone),
            graduate_profiles::gender.eq(profile.gender.as_str()),
            graduate_profiles::university.eq(&profile.university),
            graduate_profiles::course.eq(&profile.course),
            graduate_profiles::graduation_year.eq(i32::from(profile.graduation_year)),
            graduate_profiles::chapter_id.eq(profile.chapter_id),
            graduate_profiles::details_json.eq(details_json),
            graduate_profiles::status.eq(profile.status.as_str()),
            graduate_profiles::is_approved.eq(to_flag(profile.is_approved)),
            graduate_profiles::created_at.eq(&created_at),
            graduate_profiles::updated_at.eq(&created_at),
        ))
        .execute(conn)?;

    let graduate_id: i64 = conn.get_last_insert_rowid()?;
    debug!(graduate_id, user_id, "Graduate profile inserted");
    Ok(graduate_id)
}

/// Writes the workflow fields of a profile.
///
/// Identity, education and details are fixed at registration and are not
/// touched here.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_graduate(
    conn: &mut SqliteConnection,
    profile: &GraduateProfile,
) -> Result<(), PersistenceError> {
    diesel::update(graduate_profiles::table)
        .filter(graduate_profiles::graduate_id.eq(profile.graduate_id))
        .set((
            graduate_profiles::status.eq(profile.status.as_str()),
            graduate_profiles::is_approved.eq(to_flag(profile.is_approved)),
            graduate_profiles::approved_by.eq(profile.approved_by),
            graduate_profiles::approved_at.eq(format_optional_timestamp(profile.approved_at)?),
            graduate_profiles::comments.eq(&profile.comments),
            graduate_profiles::service_department_id.eq(profile.service_department_id),
            graduate_profiles::service_started_at
                .eq(format_optional_timestamp(profile.service_started_at)?),
            graduate_profiles::service_completed_at
                .eq(format_optional_timestamp(profile.service_completed_at)?),
            graduate_profiles::updated_at.eq(format_timestamp(profile.updated_at)?),
        ))
        .execute(conn)?;
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;
use vgss_domain::{NewZoneRecord, ZoneRecord};

use crate::backend::PersistenceBackend;
use crate::convert::{format_optional_timestamp, format_timestamp, to_flag};
use crate::diesel_schema::zone_records;
use crate::error::PersistenceError;

/// Inserts one uploaded record for `zone_id` and returns its id.
///
/// # Errors
///
/// Returns `UniqueViolation` if the phone already exists in the zone.
pub fn insert_zone_record(
    conn: &mut SqliteConnection,
    zone_id: i64,
    record: &NewZoneRecord,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(zone_records::table)
        .values((
            zone_records::zone_id.eq(zone_id),
            zone_records::full_name.eq(&record.full_name),
            zone_records::gender.eq(record.gender.as_str()),
            zone_records::phone.eq(&record.phone),
            zone_records::university.eq(&record.university),
            zone_records::course.eq(&record.course),
            zone_records::graduation_year.eq(i32::from(record.graduation_year)),
            zone_records::chapter_id.eq(record.chapter_id),
            zone_records::pastor_name.eq(&record.pastor_name),
            zone_records::pastor_phone.eq(&record.pastor_phone),
            zone_records::is_registered.eq(0),
            zone_records::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let zone_record_id: i64 = conn.get_last_insert_rowid()?;
    debug!(zone_record_id, zone_id, "Zone record inserted");
    Ok(zone_record_id)
}

/// Writes the registration flag of a record.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_registration(
    conn: &mut SqliteConnection,
    record: &ZoneRecord,
) -> Result<(), PersistenceError> {
    diesel::update(zone_records::table)
        .filter(zone_records::zone_record_id.eq(record.zone_record_id))
        .set((
            zone_records::is_registered.eq(to_flag(record.is_registered)),
            zone_records::registered_at.eq(format_optional_timestamp(record.registered_at)?),
        ))
        .execute(conn)?;
    Ok(())
}

/// Deletes a zone record.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_zone_record(
    conn: &mut SqliteConnection,
    zone_record_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(zone_records::table)
        .filter(zone_records::zone_record_id.eq(zone_record_id))
        .execute(conn)?;
    Ok(())
}

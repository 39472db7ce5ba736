// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::HashSet;
use tracing::debug;
use vgss_domain::ZoneRecord;

use crate::convert::{from_flag, parse_label, parse_optional_timestamp, parse_timestamp, to_u16};
use crate::data_models::ZoneRecordFilter;
use crate::diesel_schema::zone_records;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = zone_records)]
struct ZoneRecordRow {
    zone_record_id: i64,
    zone_id: i64,
    full_name: String,
    gender: String,
    phone: String,
    university: String,
    course: String,
    graduation_year: i32,
    chapter_id: Option<i64>,
    pastor_name: Option<String>,
    pastor_phone: Option<String>,
    is_registered: i32,
    registered_at: Option<String>,
    created_at: String,
}

impl ZoneRecordRow {
    fn into_record(self) -> Result<ZoneRecord, PersistenceError> {
        Ok(ZoneRecord {
            zone_record_id: self.zone_record_id,
            zone_id: self.zone_id,
            full_name: self.full_name,
            gender: parse_label(&self.gender)?,
            phone: self.phone,
            university: self.university,
            course: self.course,
            graduation_year: to_u16(self.graduation_year, "graduation_year")?,
            chapter_id: self.chapter_id,
            pastor_name: self.pastor_name,
            pastor_phone: self.pastor_phone,
            is_registered: from_flag(self.is_registered),
            registered_at: parse_optional_timestamp(self.registered_at.as_deref())?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Retrieves a zone record by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the record is not found.
pub fn get_zone_record(
    conn: &mut SqliteConnection,
    zone_record_id: i64,
) -> Result<Option<ZoneRecord>, PersistenceError> {
    debug!("Looking up zone record by ID: {}", zone_record_id);

    let result: Result<ZoneRecordRow, diesel::result::Error> = zone_records::table
        .filter(zone_records::zone_record_id.eq(zone_record_id))
        .select(ZoneRecordRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_record()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists zone records ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_zone_records(
    conn: &mut SqliteConnection,
    filter: ZoneRecordFilter,
) -> Result<Vec<ZoneRecord>, PersistenceError> {
    let mut query = zone_records::table
        .select(ZoneRecordRow::as_select())
        .order(zone_records::zone_record_id.asc())
        .into_boxed();

    if let Some(zone_id) = filter.zone_id {
        query = query.filter(zone_records::zone_id.eq(zone_id));
    }
    if let Some(is_registered) = filter.is_registered {
        query = query.filter(zone_records::is_registered.eq(i32::from(is_registered)));
    }

    let rows: Vec<ZoneRecordRow> = query.load(conn)?;
    rows.into_iter().map(ZoneRecordRow::into_record).collect()
}

/// Returns every phone already stored for a zone.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn zone_phones(
    conn: &mut SqliteConnection,
    zone_id: i64,
) -> Result<HashSet<String>, PersistenceError> {
    let phones: Vec<String> = zone_records::table
        .filter(zone_records::zone_id.eq(zone_id))
        .select(zone_records::phone)
        .load(conn)?;
    Ok(phones.into_iter().collect())
}

/// Finds unregistered records carrying `phone`, across all zones.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_unregistered_by_phone(
    conn: &mut SqliteConnection,
    phone: &str,
) -> Result<Vec<ZoneRecord>, PersistenceError> {
    debug!("Looking up unregistered zone records by phone");

    let rows: Vec<ZoneRecordRow> = zone_records::table
        .filter(zone_records::phone.eq(phone))
        .filter(zone_records::is_registered.eq(0))
        .select(ZoneRecordRow::as_select())
        .order(zone_records::zone_record_id.asc())
        .load(conn)?;

    rows.into_iter().map(ZoneRecordRow::into_record).collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::HashSet;
use tracing::debug;
use vgss_domain::Chapter;

use crate::diesel_schema::chapters;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = chapters)]
struct ChapterRow {
    chapter_id: i64,
    zone_id: i64,
    name: String,
}

impl From<ChapterRow> for Chapter {
    fn from(row: ChapterRow) -> Self {
        Self {
            chapter_id: row.chapter_id,
            zone_id: row.zone_id,
            name: row.name,
        }
    }
}

/// Case-insensitive key used for per-zone name uniqueness.
pub fn chapter_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Retrieves a chapter by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the chapter is not found.
pub fn get_chapter(
    conn: &mut SqliteConnection,
    chapter_id: i64,
) -> Result<Option<Chapter>, PersistenceError> {
    debug!("Looking up chapter by ID: {}", chapter_id);

    let result: Result<ChapterRow, diesel::result::Error> = chapters::table
        .filter(chapters::chapter_id.eq(chapter_id))
        .select(ChapterRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists chapters ordered by name, optionally restricted to one zone.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_chapters(
    conn: &mut SqliteConnection,
    zone_id: Option<i64>,
) -> Result<Vec<Chapter>, PersistenceError> {
    let mut query = chapters::table
        .select(ChapterRow::as_select())
        .order((chapters::zone_id.asc(), chapters::name_key.asc()))
        .into_boxed();

    if let Some(zone_id) = zone_id {
        query = query.filter(chapters::zone_id.eq(zone_id));
    }

    let rows: Vec<ChapterRow> = query.load(conn)?;
    Ok(rows.into_iter().map(Chapter::from).collect())
}

/// Returns the ids of the chapters owned by `zone_id`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn zone_chapter_ids(
    conn: &mut SqliteConnection,
    zone_id: i64,
) -> Result<HashSet<i64>, PersistenceError> {
    let ids: Vec<i64> = chapters::table
        .filter(chapters::zone_id.eq(zone_id))
        .select(chapters::chapter_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}

/// Returns true if another chapter in the zone already uses `name`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `zone_id` - The zone to search
/// * `name` - The candidate name, compared case-insensitively
/// * `except_chapter_id` - A chapter to ignore, for renames
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn chapter_name_taken(
    conn: &mut SqliteConnection,
    zone_id: i64,
    name: &str,
    except_chapter_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = chapters::table
        .filter(chapters::zone_id.eq(zone_id))
        .filter(chapters::name_key.eq(chapter_name_key(name)))
        .select(diesel::dsl::count(chapters::chapter_id))
        .into_boxed();

    if let Some(chapter_id) = except_chapter_id {
        query = query.filter(chapters::chapter_id.ne(chapter_id));
    }

    let count: i64 = query.first(conn)?;
    Ok(count > 0)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::chapters;
use crate::error::PersistenceError;
use crate::queries::chapters::chapter_name_key;

/// Inserts a chapter and returns its id.
///
/// # Errors
///
/// Returns `UniqueViolation` if the zone already has the name.
pub fn insert_chapter(
    conn: &mut SqliteConnection,
    zone_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(chapters::table)
        .values((
            chapters::zone_id.eq(zone_id),
            chapters::name.eq(name),
            chapters::name_key.eq(chapter_name_key(name)),
        ))
        .execute(conn)?;

    let chapter_id: i64 = conn.get_last_insert_rowid()?;
    info!(chapter_id, zone_id, "Chapter created");
    Ok(chapter_id)
}

/// Renames a chapter.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn rename_chapter(
    conn: &mut SqliteConnection,
    chapter_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    diesel::update(chapters::table)
        .filter(chapters::chapter_id.eq(chapter_id))
        .set((
            chapters::name.eq(name),
            chapters::name_key.eq(chapter_name_key(name)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Deletes a chapter. Records referencing it keep a null chapter.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_chapter(
    conn: &mut SqliteConnection,
    chapter_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(chapters::table)
        .filter(chapters::chapter_id.eq(chapter_id))
        .execute(conn)?;
    info!(chapter_id, "Chapter deleted");
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use vgss_audit::{Action, Actor, AuditEvent, Cause, EntityType, StateSnapshot};

use crate::convert::parse_timestamp;
use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData, StoredAuditEvent};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    entity_type: String,
    entity_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    created_at: String,
}

impl AuditEventRow {
    fn into_stored(self) -> Result<StoredAuditEvent, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let entity_type: EntityType = self
            .entity_type
            .parse()
            .map_err(PersistenceError::SerializationError)?;

        let actor: Actor = Actor {
            user_id: actor_data.user_id,
            ..Actor::new(actor_data.id, actor_data.actor_type)
        };

        Ok(StoredAuditEvent {
            event_id: self.event_id,
            created_at: parse_timestamp(&self.created_at)?,
            event: AuditEvent::new(
                actor,
                Cause::new(cause_data.id, cause_data.description),
                Action::new(action_data.name, action_data.details),
                StateSnapshot::new(before_data.data),
                StateSnapshot::new(after_data.data),
                entity_type,
                self.entity_id,
            ),
        })
    }
}

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns `NotFound` if no such event exists, or an error if it cannot be
/// deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<StoredAuditEvent, PersistenceError> {
    let result: Result<AuditEventRow, diesel::result::Error> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_stored(),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Audit event {event_id}"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the audit trail of one entity, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `entity_type` - The kind of entity
/// * `entity_id` - The entity's identifier
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_trail(
    conn: &mut SqliteConnection,
    entity_type: EntityType,
    entity_id: i64,
) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::entity_type.eq(entity_type.as_str()))
        .filter(audit_events::entity_id.eq(entity_id))
        .select(AuditEventRow::as_select())
        .order(audit_events::event_id.asc())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_stored).collect()
}

/// Counts all recorded audit events.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_audit_events(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let count: i64 = audit_events::table
        .select(diesel::dsl::count(audit_events::event_id))
        .first(conn)?;
    Ok(count)
}

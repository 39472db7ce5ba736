// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::str::FromStr;

/// Represents the principal performing an action.
///
/// Self-registration is performed before the graduate has a principal, so
/// `user_id` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// A stable identifier for this actor (e.g., "user:12", "anonymous").
    pub id: String,
    /// The type of actor, usually the principal's role.
    pub actor_type: String,
    /// The principal id, if the actor is an authenticated principal.
    pub user_id: Option<i64>,
}

impl Actor {
    /// Creates a new Actor that is not tied to a principal.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            user_id: None,
        }
    }

    /// Creates an Actor for an authenticated principal.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The principal id
    /// * `role` - The principal's role name
    #[must_use]
    pub fn principal(user_id: i64, role: &str) -> Self {
        Self {
            id: format!("user:{user_id}"),
            actor_type: role.to_string(),
            user_id: Some(user_id),
        }
    }

    /// Creates the Actor used for unauthenticated self-service calls.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(String::from("anonymous"), String::from("anonymous"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`AssignGraduate`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A textual snapshot of the audited entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot used when the entity did not exist before, or was removed.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("none"))
    }
}

/// The kind of entity an audit event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Principal,
    Chapter,
    ZoneRecord,
    Graduate,
    StaffRequest,
}

impl EntityType {
    /// Returns the stored name of this entity type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Principal => "principal",
            Self::Chapter => "chapter",
            Self::ZoneRecord => "zone_record",
            Self::Graduate => "graduate",
            Self::StaffRequest => "staff_request",
        }
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "principal" => Ok(Self::Principal),
            "chapter" => Ok(Self::Chapter),
            "zone_record" => Ok(Self::ZoneRecord),
            "graduate" => Ok(Self::Graduate),
            "staff_request" => Ok(Self::StaffRequest),
            other => Err(format!("Unknown entity type: '{other}'")),
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit event representing a workflow state change.
///
/// Every successful workflow mutation produces exactly one audit event,
/// persisted in the same transaction as the mutation. Events capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The entity it concerns (entity type and id)
/// - The state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    pub entity_type: EntityType,
    /// `None` until the entity has been inserted and has an id.
    pub entity_id: Option<i64>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `entity_type` - The kind of entity changed
    /// * `entity_id` - The entity id, if it exists yet
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        entity_type: EntityType,
        entity_id: Option<i64>,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            entity_type,
            entity_id,
        }
    }

    /// Returns this event attached to a freshly inserted entity.
    #[must_use]
    pub fn for_entity(self, entity_id: i64) -> Self {
        Self {
            entity_id: Some(entity_id),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(entity_id: Option<i64>) -> AuditEvent {
        AuditEvent::new(
            Actor::principal(3, "VgssOffice"),
            Cause::new(String::from("req-456"), String::from("Office action")),
            Action::new(String::from("ApproveStaffRequest"), None),
            StateSnapshot::new(String::from("status=Pending")),
            StateSnapshot::new(String::from("status=Approved")),
            EntityType::StaffRequest,
            entity_id,
        )
    }

    #[test]
    fn test_principal_actor_carries_user_id() {
        let actor: Actor = Actor::principal(12, "Zone");

        assert_eq!(actor.id, "user:12");
        assert_eq!(actor.actor_type, "Zone");
        assert_eq!(actor.user_id, Some(12));
    }

    #[test]
    fn test_anonymous_actor_has_no_user() {
        let actor: Actor = Actor::anonymous();

        assert_eq!(actor.id, "anonymous");
        assert_eq!(actor.user_id, None);
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("AssignGraduate"),
            Some(String::from("graduate_id=4")),
        );

        assert_eq!(action.name, "AssignGraduate");
        assert_eq!(action.details, Some(String::from("graduate_id=4")));
    }

    #[test]
    fn test_entity_type_names_round_trip() {
        for entity_type in [
            EntityType::Principal,
            EntityType::Chapter,
            EntityType::ZoneRecord,
            EntityType::Graduate,
            EntityType::StaffRequest,
        ] {
            assert_eq!(entity_type.as_str().parse(), Ok(entity_type));
        }
        assert!("invoice".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_for_entity_attaches_id() {
        let event: AuditEvent = sample_event(None);
        let attached: AuditEvent = event.clone().for_entity(42);

        assert_eq!(event.entity_id, None);
        assert_eq!(attached.entity_id, Some(42));
        assert_eq!(attached.action, event.action);
        assert_eq!(attached.before, event.before);
    }

    #[test]
    fn test_audit_event_equality() {
        assert_eq!(sample_event(Some(1)), sample_event(Some(1)));
        assert_ne!(sample_event(Some(1)), sample_event(Some(2)));
    }
}

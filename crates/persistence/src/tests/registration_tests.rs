// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Graduate registration and office transition tests.

use vgss_audit::{Actor, EntityType};
use vgss_domain::{DomainError, GraduateAction, GraduateProfile, GraduateStatus, ZoneRecord};

use super::{Fixture, NOW, TEST_PASSWORD_HASH, create_test_cause, registration_form};
use crate::mutations::workflow;
use crate::{GRADUATE_ROLE, GraduateFilter, PersistenceError, UserData, verify_password};

fn register_against(
    fixture: &mut Fixture,
    zone_record_id: i64,
    email: &str,
) -> Result<GraduateProfile, PersistenceError> {
    workflow::register_graduate(
        &mut fixture.persistence.conn,
        zone_record_id,
        &registration_form(email),
        TEST_PASSWORD_HASH,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    )
}

fn rejection(result: &Result<GraduateProfile, PersistenceError>) -> Option<&DomainError> {
    match result {
        Err(PersistenceError::Rejected(err)) => Some(err.domain_error()),
        _ => None,
    }
}

#[test]
fn test_registration_claims_record_once() {
    let mut fixture: Fixture = Fixture::new();
    let record: ZoneRecord = fixture.upload(&["+2340001"]).remove(0);

    let profile: GraduateProfile =
        register_against(&mut fixture, record.zone_record_id, "bola@example.com").unwrap();

    assert_eq!(profile.status, GraduateStatus::UnderReview);
    assert!(!profile.is_approved);
    assert_eq!(profile.zone_record_id, Some(record.zone_record_id));
    assert_eq!(profile.phone, "+2340001");
    assert_eq!(profile.details.home_church.as_deref(), Some("Ife Fellowship"));

    let again = register_against(&mut fixture, record.zone_record_id, "other@example.com");
    assert!(matches!(
        rejection(&again),
        Some(DomainError::AlreadyRegistered(_))
    ));
}

#[test]
fn test_registration_creates_graduate_principal() {
    let mut fixture: Fixture = Fixture::new();
    let profile: GraduateProfile = fixture.register("+2348000001", "Bola@Example.com");

    let user: UserData = fixture
        .persistence
        .get_user_by_email("bola@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(user.role, GRADUATE_ROLE);
    assert_eq!(user.user_id, profile.user_id);
    assert_eq!(
        fixture
            .persistence
            .get_graduate_by_user(user.user_id)
            .unwrap(),
        Some(profile.clone())
    );

    let trail = fixture
        .persistence
        .get_audit_trail(EntityType::ZoneRecord, profile.zone_record_id.unwrap())
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].event.action.name, "RegisterGraduate");
    assert_eq!(trail[0].event.actor.user_id, None);
}

#[test]
fn test_registration_hashes_password() {
    let mut fixture: Fixture = Fixture::new();
    let record: ZoneRecord = fixture.upload(&["+2348000001"]).remove(0);

    fixture
        .persistence
        .register_graduate(
            record.zone_record_id,
            &registration_form("bola@example.com"),
            Actor::anonymous(),
            create_test_cause(),
            NOW,
        )
        .unwrap();

    let user: UserData = fixture
        .persistence
        .get_user_by_email("bola@example.com")
        .unwrap()
        .unwrap();
    assert_ne!(user.password_hash, "Correct-Horse-42");
    assert!(verify_password("Correct-Horse-42", &user.password_hash).unwrap());
}

#[test]
fn test_duplicate_email_rolls_back_registration() {
    let mut fixture: Fixture = Fixture::new();
    fixture.register("+2348000001", "bola@example.com");
    let record: ZoneRecord = fixture.upload(&["+2348000002"]).remove(0);
    let events_before: i64 = fixture.persistence.count_audit_events().unwrap();

    let result = register_against(&mut fixture, record.zone_record_id, "BOLA@example.com");

    assert!(matches!(
        rejection(&result),
        Some(DomainError::DuplicateEmail(_))
    ));
    let record: ZoneRecord = fixture
        .persistence
        .get_zone_record(record.zone_record_id)
        .unwrap()
        .unwrap();
    assert!(!record.is_registered);
    assert_eq!(fixture.persistence.count_audit_events().unwrap(), events_before);
    assert_eq!(
        fixture
            .persistence
            .list_graduates(GraduateFilter::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_registration_against_missing_record() {
    let mut fixture: Fixture = Fixture::new();

    let result = register_against(&mut fixture, 999, "bola@example.com");

    assert!(matches!(
        rejection(&result),
        Some(DomainError::ZoneRecordNotFound(999))
    ));
}

#[test]
fn test_approve_defaults_to_interviewed() {
    let mut fixture: Fixture = Fixture::new();
    let profile: GraduateProfile = fixture.register("+2348000001", "bola@example.com");

    let approved: GraduateProfile = fixture.eligible_graduate("+2348000002", "ada@example.com");

    assert!(approved.is_approved);
    assert_eq!(approved.status, GraduateStatus::Interviewed);
    assert_eq!(approved.approved_by, Some(fixture.office_id));
    assert_eq!(approved.approved_at, Some(NOW));

    let available: Vec<GraduateProfile> = fixture
        .persistence
        .list_graduates(GraduateFilter {
            available_only: true,
            ..GraduateFilter::default()
        })
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].graduate_id, approved.graduate_id);
    assert_ne!(available[0].graduate_id, profile.graduate_id);
}

#[test]
fn test_reject_clears_approval_and_records_comments() {
    let mut fixture: Fixture = Fixture::new();
    let approved: GraduateProfile = fixture.eligible_graduate("+2348000001", "bola@example.com");

    let actor: Actor = fixture.office();
    let rejected: GraduateProfile = fixture
        .persistence
        .transition_graduate(
            approved.graduate_id,
            GraduateAction::Reject,
            Some("Did not attend interview"),
            actor,
            create_test_cause(),
            NOW,
        )
        .unwrap();

    assert_eq!(rejected.status, GraduateStatus::NotAccepted);
    assert!(!rejected.is_approved);
    assert_eq!(rejected.approved_by, None);
    assert_eq!(rejected.comments.as_deref(), Some("Did not attend interview"));

    let stored: GraduateProfile = fixture
        .persistence
        .get_graduate(approved.graduate_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored, rejected);
    let trail = fixture
        .persistence
        .get_audit_trail(EntityType::Graduate, approved.graduate_id)
        .unwrap();
    assert_eq!(trail.len(), 2);
}

#[test]
fn test_transition_of_missing_graduate() {
    let mut fixture: Fixture = Fixture::new();
    let actor: Actor = fixture.office();

    let result = fixture.persistence.transition_graduate(
        404,
        GraduateAction::StartService,
        None,
        actor,
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        rejection(&result),
        Some(DomainError::GraduateNotFound(404))
    ));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{NOW, create_test_cause, registration_form, zone_record};
use crate::{CoreError, RegistrationResult, apply_registration};
use vgss_audit::{Actor, EntityType};
use vgss_domain::{DomainError, GraduateStatus, RegistrationForm};

#[test]
fn test_registration_produces_profile_and_flips_record() {
    let record = zone_record(false);
    let result: RegistrationResult = apply_registration(
        Some(&record),
        7,
        &registration_form("Chidi@Example.com"),
        false,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert!(result.registered_record.is_registered);
    assert_eq!(result.registered_record.registered_at, Some(NOW));
    assert_eq!(result.new_profile.status, GraduateStatus::UnderReview);
    assert!(!result.new_profile.is_approved);
    assert_eq!(result.new_profile.email, "chidi@example.com");
    assert_eq!(result.new_profile.zone_record_id, Some(7));
    assert_eq!(result.audit_event.entity_type, EntityType::ZoneRecord);
    assert_eq!(result.audit_event.entity_id, Some(7));
    assert_eq!(result.audit_event.action.name, "RegisterGraduate");
}

#[test]
fn test_unknown_record_is_not_found() {
    let result: Result<RegistrationResult, CoreError> = apply_registration(
        None,
        99,
        &registration_form("chidi@example.com"),
        false,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ZoneRecordNotFound(
            99
        )))
    );
}

#[test]
fn test_registered_record_reports_already_registered_before_email() {
    let record = zone_record(true);
    let result: Result<RegistrationResult, CoreError> = apply_registration(
        Some(&record),
        7,
        &registration_form("chidi@example.com"),
        true,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::AlreadyRegistered(7)))
    );
}

#[test]
fn test_taken_email_is_duplicate() {
    let record = zone_record(false);
    let result: Result<RegistrationResult, CoreError> = apply_registration(
        Some(&record),
        7,
        &registration_form("Chidi@Example.com"),
        true,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::DuplicateEmail(
            String::from("chidi@example.com")
        )))
    );
}

#[test]
fn test_incomplete_form_names_missing_field() {
    let record = zone_record(false);
    let mut form: RegistrationForm = registration_form("chidi@example.com");
    form.details.marital_status = None;

    let result: Result<RegistrationResult, CoreError> = apply_registration(
        Some(&record),
        7,
        &form,
        false,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::MissingField(
            "marital_status"
        )))
    );
}

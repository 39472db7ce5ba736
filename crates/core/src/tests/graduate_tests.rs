// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{NOW, OFFICE_ID, create_test_cause, graduate, office_actor};
use crate::{CoreError, GraduateTransition, apply_graduate_action};
use vgss_audit::{Actor, EntityType};
use vgss_domain::{DomainError, GraduateAction, GraduateStatus};

#[test]
fn test_approve_records_approver_and_audit() {
    let profile = graduate(GraduateStatus::UnderReview, false);
    let result: GraduateTransition = apply_graduate_action(
        &profile,
        GraduateAction::Approve { status: None },
        Some("Strong interview"),
        office_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert!(result.new_profile.is_approved);
    assert_eq!(result.new_profile.approved_by, Some(OFFICE_ID));
    assert_eq!(result.new_profile.status, GraduateStatus::Interviewed);
    assert_eq!(
        result.new_profile.comments.as_deref(),
        Some("Strong interview")
    );
    assert_eq!(result.audit_event.entity_type, EntityType::Graduate);
    assert_eq!(result.audit_event.entity_id, Some(11));
    assert_eq!(
        result.audit_event.before.data,
        "status=UnderReview,is_approved=false,service_department_id=none"
    );
    assert_eq!(
        result.audit_event.after.data,
        "status=Interviewed,is_approved=true,service_department_id=none"
    );
}

#[test]
fn test_action_without_principal_is_rejected() {
    let profile = graduate(GraduateStatus::UnderReview, false);
    let result: Result<GraduateTransition, CoreError> = apply_graduate_action(
        &profile,
        GraduateAction::Reject,
        None,
        Actor::anonymous(),
        create_test_cause(),
        NOW,
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::MissingField("actor")))
    );
}

#[test]
fn test_add_comments_without_text_fails() {
    let profile = graduate(GraduateStatus::Sighting, true);
    let result: Result<GraduateTransition, CoreError> = apply_graduate_action(
        &profile,
        GraduateAction::AddComments,
        None,
        office_actor(),
        create_test_cause(),
        NOW,
    );
    assert!(result.is_err());
}

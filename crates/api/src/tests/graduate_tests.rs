// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    NOW, TestApp, create_test_cause, graduate_action, graduate_actor, registration_request,
};
use crate::{
    ApiError, AssignGraduateRequest, AuthenticatedActor, GraduateInfo, ListGraduatesRequest,
    ListGraduatesResponse, RegisterGraduateRequest, RegisterGraduateResponse,
    TransitionGraduateRequest, ZoneRecordInfo, assign_graduate, get_graduate, list_graduates,
    my_profile, register_graduate, transition_graduate,
};

fn transition(
    app: &mut TestApp,
    graduate_id: i64,
    request: &TransitionGraduateRequest,
    actor: &AuthenticatedActor,
) -> Result<GraduateInfo, ApiError> {
    transition_graduate(
        &mut app.persistence,
        graduate_id,
        request,
        actor,
        create_test_cause(),
        NOW,
    )
}

fn office_transition(app: &mut TestApp, graduate_id: i64, action: &str) -> GraduateInfo {
    let office: AuthenticatedActor = app.office;
    transition(app, graduate_id, &graduate_action(action), &office).unwrap()
}

#[test]
fn test_registration_creates_profile_under_review() {
    let mut app: TestApp = TestApp::new();
    let record: ZoneRecordInfo = app.upload(&["+2340001"]).remove(0);

    let response: RegisterGraduateResponse = register_graduate(
        &mut app.persistence,
        registration_request(record.zone_record_id, "Bola@Example.com"),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let graduate: GraduateInfo = response.graduate;
    assert_eq!(graduate.status, "UnderReview");
    assert!(!graduate.is_approved);
    assert_eq!(graduate.email, "bola@example.com");
    assert_eq!(graduate.zone_record_id, Some(record.zone_record_id));
    assert_eq!(graduate.full_name, record.full_name);
    assert_eq!(graduate.phone, "+2340001");
    assert_eq!(graduate.details.state_of_origin.as_deref(), Some("Osun"));

    let again: ApiError = register_graduate(
        &mut app.persistence,
        registration_request(record.zone_record_id, "other@example.com"),
        create_test_cause(),
        NOW,
    )
    .unwrap_err();
    assert!(matches!(again, ApiError::Conflict { ref rule, .. } if rule == "single_registration"));
}

#[test]
fn test_weak_password_stores_nothing() {
    let mut app: TestApp = TestApp::new();
    let record: ZoneRecordInfo = app.upload(&["+2348011111111"]).remove(0);
    let mut request: RegisterGraduateRequest =
        registration_request(record.zone_record_id, "bola@example.com");
    request.password = String::from("bola ade");
    request.password_confirmation = String::from("bola ade");

    let err: ApiError =
        register_graduate(&mut app.persistence, request, create_test_cause(), NOW).unwrap_err();

    assert_eq!(err.kind(), "ValidationFailed");
    assert!(
        app.persistence
            .get_user_by_email("bola@example.com")
            .unwrap()
            .is_none()
    );
    let stored = app
        .persistence
        .get_zone_record(record.zone_record_id)
        .unwrap()
        .unwrap();
    assert!(!stored.is_registered);
}

#[test]
fn test_password_confirmation_must_match() {
    let mut app: TestApp = TestApp::new();
    let record: ZoneRecordInfo = app.upload(&["+2348011111111"]).remove(0);
    let mut request: RegisterGraduateRequest =
        registration_request(record.zone_record_id, "bola@example.com");
    request.password_confirmation = String::from("Correct-Horse-43");

    let err: ApiError =
        register_graduate(&mut app.persistence, request, create_test_cause(), NOW).unwrap_err();

    assert!(matches!(err, ApiError::PasswordPolicyViolation { .. }));
}

#[test]
fn test_missing_detail_rejected() {
    let mut app: TestApp = TestApp::new();
    let record: ZoneRecordInfo = app.upload(&["+2348011111111"]).remove(0);
    let mut request: RegisterGraduateRequest =
        registration_request(record.zone_record_id, "bola@example.com");
    request.details.date_of_birth = None;

    let err: ApiError =
        register_graduate(&mut app.persistence, request, create_test_cause(), NOW).unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "date_of_birth"));
}

#[test]
fn test_unknown_record_not_found() {
    let mut app: TestApp = TestApp::new();

    let err: ApiError = register_graduate(
        &mut app.persistence,
        registration_request(404, "bola@example.com"),
        create_test_cause(),
        NOW,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Zone record"
    ));
}

#[test]
fn test_registration_email_must_be_unused() {
    let mut app: TestApp = TestApp::new();
    let record: ZoneRecordInfo = app.upload(&["+2348011111111"]).remove(0);

    let err: ApiError = register_graduate(
        &mut app.persistence,
        registration_request(record.zone_record_id, "MEDIA@vgss.org"),
        create_test_cause(),
        NOW,
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Conflict { ref rule, .. } if rule == "unique_email"));
}

#[test]
fn test_approve_moves_under_review_to_interviewed() {
    let mut app: TestApp = TestApp::new();
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");

    let approved: GraduateInfo = office_transition(&mut app, graduate.graduate_id, "approve");

    assert!(approved.is_approved);
    assert_eq!(approved.status, "Interviewed");
    assert_eq!(approved.approved_by, Some(app.office.user_id));
    assert_eq!(approved.approved_at, Some(NOW));
}

#[test]
fn test_approve_with_explicit_status() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");
    let request: TransitionGraduateRequest = TransitionGraduateRequest {
        action: String::from("approve"),
        status: Some(String::from("sighting")),
        comments: Some(String::from("Strong interview")),
    };

    let approved: GraduateInfo =
        transition(&mut app, graduate.graduate_id, &request, &office).unwrap();

    assert_eq!(approved.status, "Sighting");
    assert_eq!(approved.comments.as_deref(), Some("Strong interview"));
}

#[test]
fn test_reject_clears_approval() {
    let mut app: TestApp = TestApp::new();
    let graduate: GraduateInfo = app.eligible_graduate("+2348011111111", "bola@example.com");

    let rejected: GraduateInfo = office_transition(&mut app, graduate.graduate_id, "reject");

    assert!(!rejected.is_approved);
    assert_eq!(rejected.status, "NotAccepted");
    assert_eq!(rejected.approved_by, None);
}

#[test]
fn test_update_status_requires_status() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");

    let err: ApiError = transition(
        &mut app,
        graduate.graduate_id,
        &graduate_action("update_status"),
        &office,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "status"));

    let request: TransitionGraduateRequest = TransitionGraduateRequest {
        action: String::from("update_status"),
        status: Some(String::from("Invited For Interview")),
        comments: None,
    };
    let updated: GraduateInfo =
        transition(&mut app, graduate.graduate_id, &request, &office).unwrap();
    assert_eq!(updated.status, "InvitedForInterview");
    assert!(!updated.is_approved);
}

#[test]
fn test_unknown_action_and_status_rejected() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");

    let err: ApiError = transition(
        &mut app,
        graduate.graduate_id,
        &graduate_action("promote"),
        &office,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "action"));

    let request: TransitionGraduateRequest = TransitionGraduateRequest {
        action: String::from("update_status"),
        status: Some(String::from("Graduated")),
        comments: None,
    };
    let err: ApiError = transition(&mut app, graduate.graduate_id, &request, &office).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "status"));
}

#[test]
fn test_add_comments_requires_text() {
    let mut app: TestApp = TestApp::new();
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");
    let office: AuthenticatedActor = app.office;

    let err: ApiError = transition(
        &mut app,
        graduate.graduate_id,
        &graduate_action("add_comments"),
        &office,
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "comments"));
}

#[test]
fn test_only_office_transitions_graduates() {
    let mut app: TestApp = TestApp::new();
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");

    for actor in [app.zone, app.department, graduate_actor(&graduate)] {
        let err: ApiError = transition(
            &mut app,
            graduate.graduate_id,
            &graduate_action("approve"),
            &actor,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "Unauthorized");
    }
}

#[test]
fn test_unknown_graduate_not_found() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;

    let err: ApiError = transition(&mut app, 77, &graduate_action("approve"), &office).unwrap_err();
    assert_eq!(err.kind(), "NotFound");

    let err: ApiError = get_graduate(&mut app.persistence, 77, &office).unwrap_err();
    assert_eq!(err.kind(), "NotFound");
}

#[test]
fn test_graduate_visibility() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;
    let zone: AuthenticatedActor = app.zone;
    let department: AuthenticatedActor = app.department;
    let graduate: GraduateInfo = app.eligible_graduate("+2348011111111", "bola@example.com");
    let other: GraduateInfo = app.register("+2348022222222", "tunde@example.com");

    assert!(get_graduate(&mut app.persistence, graduate.graduate_id, &office).is_ok());
    assert!(
        get_graduate(
            &mut app.persistence,
            graduate.graduate_id,
            &graduate_actor(&graduate)
        )
        .is_ok()
    );
    for actor in [zone, department, graduate_actor(&other)] {
        let err: ApiError =
            get_graduate(&mut app.persistence, graduate.graduate_id, &actor).unwrap_err();
        assert_eq!(err.kind(), "Unauthorized");
    }

    let request = app.approved_request(1);
    assign_graduate(
        &mut app.persistence,
        request.staff_request_id,
        AssignGraduateRequest {
            graduate_id: graduate.graduate_id,
            notes: None,
        },
        &office,
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let seen: GraduateInfo =
        get_graduate(&mut app.persistence, graduate.graduate_id, &department).unwrap();
    assert_eq!(seen.service_department_id, Some(department.user_id));
    assert_eq!(seen.status, "Serving");
}

#[test]
fn test_my_profile() {
    let mut app: TestApp = TestApp::new();
    let graduate: GraduateInfo = app.register("+2348011111111", "bola@example.com");

    let mine: GraduateInfo = my_profile(&mut app.persistence, &graduate_actor(&graduate)).unwrap();
    assert_eq!(mine.graduate_id, graduate.graduate_id);

    let office: AuthenticatedActor = app.office;
    let err: ApiError = my_profile(&mut app.persistence, &office).unwrap_err();
    assert_eq!(err.kind(), "Unauthorized");
}

#[test]
fn test_list_graduates_filters() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;
    let eligible: GraduateInfo = app.eligible_graduate("+2348011111111", "bola@example.com");
    let pending: GraduateInfo = app.register("+2348022222222", "tunde@example.com");

    let all: ListGraduatesResponse =
        list_graduates(&mut app.persistence, &ListGraduatesRequest::default(), &office).unwrap();
    assert_eq!(all.graduates.len(), 2);

    let under_review: ListGraduatesResponse = list_graduates(
        &mut app.persistence,
        &ListGraduatesRequest {
            status: Some(String::from("UnderReview")),
            ..ListGraduatesRequest::default()
        },
        &office,
    )
    .unwrap();
    assert_eq!(under_review.graduates.len(), 1);
    assert_eq!(under_review.graduates[0].graduate_id, pending.graduate_id);

    let available: ListGraduatesResponse = list_graduates(
        &mut app.persistence,
        &ListGraduatesRequest {
            available_only: true,
            ..ListGraduatesRequest::default()
        },
        &office,
    )
    .unwrap();
    let ids: Vec<i64> = available.graduates.iter().map(|g| g.graduate_id).collect();
    assert_eq!(ids, vec![eligible.graduate_id]);

    let err: ApiError = list_graduates(
        &mut app.persistence,
        &ListGraduatesRequest {
            status: Some(String::from("Retired")),
            ..ListGraduatesRequest::default()
        },
        &office,
    )
    .unwrap_err();
    assert_eq!(err.kind(), "ValidationFailed");
}

#[test]
fn test_department_lists_only_its_graduates() {
    let mut app: TestApp = TestApp::new();
    let office: AuthenticatedActor = app.office;
    let department: AuthenticatedActor = app.department;
    let zone: AuthenticatedActor = app.zone;
    app.eligible_graduate("+2348011111111", "bola@example.com");

    let before: ListGraduatesResponse =
        list_graduates(&mut app.persistence, &ListGraduatesRequest::default(), &department)
            .unwrap();
    assert!(before.graduates.is_empty());

    let serving: GraduateInfo = app.eligible_graduate("+2348022222222", "tunde@example.com");
    let request = app.approved_request(2);
    assign_graduate(
        &mut app.persistence,
        request.staff_request_id,
        AssignGraduateRequest {
            graduate_id: serving.graduate_id,
            notes: None,
        },
        &office,
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let after: ListGraduatesResponse =
        list_graduates(&mut app.persistence, &ListGraduatesRequest::default(), &department)
            .unwrap();
    let ids: Vec<i64> = after.graduates.iter().map(|g| g.graduate_id).collect();
    assert_eq!(ids, vec![serving.graduate_id]);

    let err: ApiError =
        list_graduates(&mut app.persistence, &ListGraduatesRequest::default(), &zone).unwrap_err();
    assert_eq!(err.kind(), "Unauthorized");
}

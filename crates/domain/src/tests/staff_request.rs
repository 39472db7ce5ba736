// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::fixtures::{LATER, draft, staff_request};
use crate::{DomainError, StaffRequest, StaffRequestAction, StaffRequestStatus, Urgency};
use std::str::FromStr;

const OFFICE_ID: i64 = 1;

#[test]
fn test_status_and_urgency_parsing() {
    assert_eq!(
        StaffRequestStatus::from_str("fulfilled").unwrap(),
        StaffRequestStatus::Fulfilled
    );
    assert!(StaffRequestStatus::from_str("open").is_err());
    assert_eq!(Urgency::from_str("URGENT").unwrap(), Urgency::Urgent);
    assert!(matches!(
        Urgency::from_str("asap"),
        Err(DomainError::InvalidUrgency(_))
    ));
}

#[test]
fn test_approve_pending_request() {
    let request: StaffRequest = staff_request(StaffRequestStatus::Pending, 2, 0);
    let approved: StaffRequest = request
        .apply_action(&StaffRequestAction::Approve, OFFICE_ID, LATER)
        .unwrap();
    assert_eq!(approved.status, StaffRequestStatus::Approved);
    assert_eq!(approved.approved_by, Some(OFFICE_ID));
    assert_eq!(approved.approved_at, Some(LATER));
}

#[test]
fn test_actions_require_pending() {
    for status in [
        StaffRequestStatus::Approved,
        StaffRequestStatus::Rejected,
        StaffRequestStatus::Fulfilled,
        StaffRequestStatus::Cancelled,
    ] {
        let request: StaffRequest = staff_request(status, 2, 0);
        let result: Result<StaffRequest, DomainError> =
            request.apply_action(&StaffRequestAction::Cancel, OFFICE_ID, LATER);
        assert!(
            matches!(result, Err(DomainError::IllegalTransition { .. })),
            "cancel from {status} should be illegal"
        );
    }
}

#[test]
fn test_reject_requires_reason() {
    let request: StaffRequest = staff_request(StaffRequestStatus::Pending, 2, 0);
    let blank: Result<StaffRequest, DomainError> = request.apply_action(
        &StaffRequestAction::Reject {
            reason: String::from("  "),
        },
        OFFICE_ID,
        LATER,
    );
    assert_eq!(blank, Err(DomainError::MissingField("rejection_reason")));

    let rejected: StaffRequest = request
        .apply_action(
            &StaffRequestAction::Reject {
                reason: String::from("No budget"),
            },
            OFFICE_ID,
            LATER,
        )
        .unwrap();
    assert_eq!(rejected.status, StaffRequestStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("No budget"));
}

#[test]
fn test_edit_replaces_fields_and_validates() {
    let request: StaffRequest = staff_request(StaffRequestStatus::Pending, 2, 0);
    let edited: StaffRequest = request
        .apply_action(&StaffRequestAction::Edit(draft(4)), 4, LATER)
        .unwrap();
    assert_eq!(edited.number_of_staff, 4);
    assert_eq!(edited.urgency, Urgency::High);
    assert_eq!(edited.status, StaffRequestStatus::Pending);

    let invalid: Result<StaffRequest, DomainError> =
        request.apply_action(&StaffRequestAction::Edit(draft(11)), 4, LATER);
    assert!(matches!(
        invalid,
        Err(DomainError::InvalidField {
            field: "number_of_staff",
            ..
        })
    ));
}

#[test]
fn test_deletable_only_when_pending_or_cancelled() {
    assert!(
        staff_request(StaffRequestStatus::Pending, 1, 0)
            .ensure_deletable()
            .is_ok()
    );
    assert!(
        staff_request(StaffRequestStatus::Cancelled, 1, 0)
            .ensure_deletable()
            .is_ok()
    );
    assert!(
        staff_request(StaffRequestStatus::Approved, 1, 0)
            .ensure_deletable()
            .is_err()
    );
    assert!(
        staff_request(StaffRequestStatus::Fulfilled, 1, 1)
            .ensure_deletable()
            .is_err()
    );
}

#[test]
fn test_record_assignment_fulfils_at_capacity() {
    let request: StaffRequest = staff_request(StaffRequestStatus::Approved, 2, 0);

    let first: StaffRequest = request.record_assignment(LATER).unwrap();
    assert_eq!(first.fulfilled_count, 1);
    assert_eq!(first.status, StaffRequestStatus::Approved);
    assert_eq!(first.fulfilled_at, None);
    assert_eq!(first.remaining_slots(), 1);

    let second: StaffRequest = first.record_assignment(LATER).unwrap();
    assert_eq!(second.fulfilled_count, 2);
    assert_eq!(second.status, StaffRequestStatus::Fulfilled);
    assert_eq!(second.fulfilled_at, Some(LATER));
    assert_eq!(second.remaining_slots(), 0);
}

#[test]
fn test_record_assignment_requires_approved() {
    let pending: StaffRequest = staff_request(StaffRequestStatus::Pending, 2, 0);
    assert!(matches!(
        pending.record_assignment(LATER),
        Err(DomainError::IllegalTransition { .. })
    ));

    let rejected: StaffRequest = staff_request(StaffRequestStatus::Rejected, 2, 0);
    assert!(matches!(
        rejected.record_assignment(LATER),
        Err(DomainError::IllegalTransition { .. })
    ));
}

#[test]
fn test_fulfilled_request_reports_capacity() {
    let fulfilled: StaffRequest = staff_request(StaffRequestStatus::Fulfilled, 1, 1);
    assert!(matches!(
        fulfilled.record_assignment(LATER),
        Err(DomainError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_record_assignment_rejects_full_request() {
    let full: StaffRequest = staff_request(StaffRequestStatus::Approved, 1, 1);
    assert_eq!(
        full.ensure_accepts_assignment(),
        Err(DomainError::CapacityExceeded {
            request_id: 5,
            number_of_staff: 1,
        })
    );
}

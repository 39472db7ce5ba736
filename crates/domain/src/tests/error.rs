// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, ErrorKind};

#[test]
fn test_error_kinds_follow_taxonomy() {
    assert_eq!(
        DomainError::MissingField("email").kind(),
        ErrorKind::ValidationFailed
    );
    assert_eq!(
        DomainError::DuplicateEmail(String::from("a@b.co")).kind(),
        ErrorKind::Conflict
    );
    assert_eq!(DomainError::AlreadyRegistered(1).kind(), ErrorKind::Conflict);
    assert_eq!(DomainError::RequestNotFound(1).kind(), ErrorKind::NotFound);
    assert_eq!(
        DomainError::GraduateNotEligible {
            graduate_id: 1,
            reason: String::from("x"),
        }
        .kind(),
        ErrorKind::IllegalTransition
    );
    assert_eq!(
        DomainError::CapacityExceeded {
            request_id: 1,
            number_of_staff: 2,
        }
        .kind(),
        ErrorKind::CapacityExceeded
    );
}

#[test]
fn test_missing_field_message_names_field() {
    let err: DomainError = DomainError::MissingField("next_of_kin_name");
    assert_eq!(
        err.to_string(),
        "Required field 'next_of_kin_name' is missing"
    );
}

#[test]
fn test_duplicate_phone_message_names_phone() {
    let err: DomainError = DomainError::DuplicatePhone {
        zone_id: 3,
        phone: String::from("+2340001"),
    };
    assert!(err.to_string().contains("+2340001"));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

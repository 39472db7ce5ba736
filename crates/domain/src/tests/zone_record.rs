// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::fixtures::{LATER, zone_record};
use crate::{DomainError, ZoneRecord};

#[test]
fn test_mark_registered_sets_flag_and_timestamp() {
    let record: ZoneRecord = zone_record(false);
    let registered: ZoneRecord = record.mark_registered(LATER).unwrap();
    assert!(registered.is_registered);
    assert_eq!(registered.registered_at, Some(LATER));
}

#[test]
fn test_registered_record_cannot_be_claimed_again() {
    let record: ZoneRecord = zone_record(true);
    assert_eq!(
        record.mark_registered(LATER),
        Err(DomainError::AlreadyRegistered(7))
    );
}

#[test]
fn test_registered_record_cannot_be_deleted() {
    assert!(zone_record(false).ensure_deletable().is_ok());
    assert!(matches!(
        zone_record(true).ensure_deletable(),
        Err(DomainError::IllegalTransition { .. })
    ));
}

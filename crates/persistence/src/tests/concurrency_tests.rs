// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Two connections racing on one file database.
//!
//! Each workflow operation takes the write lock before reading, so the
//! second writer waits out the first and then sees its committed state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;
use vgss::AssignGraduate;
use vgss_audit::Actor;
use vgss_domain::{DomainError, GraduateProfile, StaffRequest, StaffRequestStatus, ZoneRecord};

use super::{Fixture, NOW, TEST_PASSWORD_HASH, create_test_cause, registration_form};
use crate::mutations::workflow;
use crate::{DEFAULT_BUSY_TIMEOUT_MS, Persistence, PersistenceError};

fn open(path: &Path) -> Persistence {
    Persistence::new_with_file(path, DEFAULT_BUSY_TIMEOUT_MS).unwrap()
}

fn is_rejected_with<T>(
    result: &Result<T, PersistenceError>,
    check: impl Fn(&DomainError) -> bool,
) -> bool {
    matches!(result, Err(PersistenceError::Rejected(err)) if check(err.domain_error()))
}

#[test]
fn test_racing_assignments_respect_capacity() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("race.db");

    let mut fixture: Fixture = Fixture::seeded(open(&path));
    let request: StaffRequest = fixture.approved_request(1);
    let first: GraduateProfile = fixture.eligible_graduate("+2348000001", "bola@example.com");
    let second: GraduateProfile = fixture.eligible_graduate("+2348000002", "ada@example.com");
    let office: Actor = fixture.office();

    let connections: Vec<Persistence> = vec![fixture.persistence, open(&path)];
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));

    let handles: Vec<thread::JoinHandle<Result<StaffRequest, PersistenceError>>> = connections
        .into_iter()
        .zip([first.graduate_id, second.graduate_id])
        .map(|(mut persistence, graduate_id)| {
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            let actor: Actor = office.clone();
            let command: AssignGraduate = AssignGraduate {
                staff_request_id: request.staff_request_id,
                graduate_id,
                notes: None,
            };
            thread::spawn(move || {
                barrier.wait();
                persistence.assign_graduate(&command, actor, create_test_cause(), NOW)
            })
        })
        .collect();

    let results: Vec<Result<StaffRequest, PersistenceError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners: Vec<&StaffRequest> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].fulfilled_count, 1);
    assert_eq!(winners[0].status, StaffRequestStatus::Fulfilled);
    assert_eq!(
        results
            .iter()
            .filter(|r| {
                is_rejected_with(*r, |e| matches!(e, DomainError::CapacityExceeded { .. }))
            })
            .count(),
        1
    );

    let mut check: Persistence = open(&path);
    assert_eq!(
        check
            .list_assignments(request.staff_request_id)
            .unwrap()
            .len(),
        1
    );
    let stored: StaffRequest = check
        .get_staff_request(request.staff_request_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.fulfilled_count, 1);
}

#[test]
fn test_racing_registrations_claim_record_once() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("register.db");

    let mut fixture: Fixture = Fixture::seeded(open(&path));
    let record: ZoneRecord = fixture.upload(&["+2348000001"]).remove(0);

    let connections: Vec<Persistence> = vec![fixture.persistence, open(&path)];
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));

    let handles: Vec<thread::JoinHandle<Result<GraduateProfile, PersistenceError>>> = connections
        .into_iter()
        .zip(["bola@example.com", "bola.ade@example.com"])
        .map(|(mut persistence, email)| {
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            let zone_record_id: i64 = record.zone_record_id;
            thread::spawn(move || {
                barrier.wait();
                workflow::register_graduate(
                    &mut persistence.conn,
                    zone_record_id,
                    &registration_form(email),
                    TEST_PASSWORD_HASH,
                    Actor::anonymous(),
                    create_test_cause(),
                    NOW,
                )
            })
        })
        .collect();

    let results: Vec<Result<GraduateProfile, PersistenceError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| {
                is_rejected_with(*r, |e| matches!(e, DomainError::AlreadyRegistered(_)))
            })
            .count(),
        1
    );
}

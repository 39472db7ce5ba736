// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Chapter create, rename and delete tests.

use vgss::ChapterCommand;
use vgss_audit::{Actor, EntityType};
use vgss_domain::{Chapter, DomainError, NewZoneRecord, ZoneRecord};

use super::{Fixture, NOW, ZONE_ROLE, create_test_cause, seed_user, upload_row};
use crate::{Persistence, PersistenceError};

fn create_chapter(fixture: &mut Fixture, name: &str) -> Result<Option<Chapter>, PersistenceError> {
    let actor: Actor = fixture.zone();
    fixture.persistence.change_chapter(
        fixture.zone_id,
        &ChapterCommand::Create {
            name: name.to_string(),
        },
        actor,
        create_test_cause(),
        NOW,
    )
}

fn rejected_with(result: &Result<Option<Chapter>, PersistenceError>) -> Option<&DomainError> {
    match result {
        Err(PersistenceError::Rejected(err)) => Some(err.domain_error()),
        _ => None,
    }
}

#[test]
fn test_create_chapter_records_audit_event() {
    let mut fixture: Fixture = Fixture::new();

    let chapter: Chapter = create_chapter(&mut fixture, "  Ikeja Chapter ")
        .unwrap()
        .unwrap();

    assert_eq!(chapter.name, "Ikeja Chapter");
    assert_eq!(chapter.zone_id, fixture.zone_id);
    assert_eq!(
        fixture.persistence.get_chapter(chapter.chapter_id).unwrap(),
        Some(chapter.clone())
    );
    let trail = fixture
        .persistence
        .get_audit_trail(EntityType::Chapter, chapter.chapter_id)
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].event.actor.user_id, Some(fixture.zone_id));
}

#[test]
fn test_duplicate_chapter_name_is_case_insensitive() {
    let mut fixture: Fixture = Fixture::new();
    create_chapter(&mut fixture, "Ikeja").unwrap();

    let result = create_chapter(&mut fixture, "IKEJA");

    assert!(matches!(
        rejected_with(&result),
        Some(DomainError::DuplicateChapterName { .. })
    ));
    assert_eq!(
        fixture
            .persistence
            .list_chapters(Some(fixture.zone_id))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_rename_chapter_keeps_its_own_name_free() {
    let mut fixture: Fixture = Fixture::new();
    let chapter: Chapter = create_chapter(&mut fixture, "Ikeja").unwrap().unwrap();

    let actor: Actor = fixture.zone();
    let renamed: Chapter = fixture
        .persistence
        .change_chapter(
            fixture.zone_id,
            &ChapterCommand::Rename {
                chapter_id: chapter.chapter_id,
                name: String::from("ikeja"),
            },
            actor,
            create_test_cause(),
            NOW,
        )
        .unwrap()
        .unwrap();

    assert_eq!(renamed.chapter_id, chapter.chapter_id);
    assert_eq!(renamed.name, "ikeja");
    assert_eq!(
        fixture
            .persistence
            .get_chapter(chapter.chapter_id)
            .unwrap()
            .map(|c| c.name),
        Some(String::from("ikeja"))
    );
}

#[test]
fn test_chapter_of_another_zone_is_not_found() {
    let mut fixture: Fixture = Fixture::new();
    let chapter: Chapter = create_chapter(&mut fixture, "Ikeja").unwrap().unwrap();
    let other_zone: i64 = seed_user(&mut fixture.persistence, "zone.north@vgss.org", ZONE_ROLE);

    let result = fixture.persistence.change_chapter(
        other_zone,
        &ChapterCommand::Delete {
            chapter_id: chapter.chapter_id,
        },
        Actor::principal(other_zone, ZONE_ROLE),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        rejected_with(&result),
        Some(DomainError::ChapterNotFound(_))
    ));
}

#[test]
fn test_delete_chapter_clears_zone_record_reference() {
    let mut fixture: Fixture = Fixture::new();
    let chapter: Chapter = create_chapter(&mut fixture, "Ikeja").unwrap().unwrap();
    let row: NewZoneRecord = NewZoneRecord {
        chapter_id: Some(chapter.chapter_id),
        ..upload_row("+2348000001")
    };
    let actor: Actor = fixture.zone();
    let record: ZoneRecord = fixture
        .persistence
        .upload_zone_records(fixture.zone_id, &[row], actor, create_test_cause(), NOW)
        .unwrap()
        .remove(0);
    assert_eq!(record.chapter_id, Some(chapter.chapter_id));

    let actor: Actor = fixture.zone();
    let result: Option<Chapter> = fixture
        .persistence
        .change_chapter(
            fixture.zone_id,
            &ChapterCommand::Delete {
                chapter_id: chapter.chapter_id,
            },
            actor,
            create_test_cause(),
            NOW,
        )
        .unwrap();

    assert_eq!(result, None);
    assert!(fixture.persistence.get_chapter(chapter.chapter_id).unwrap().is_none());
    let record: ZoneRecord = fixture
        .persistence
        .get_zone_record(record.zone_record_id)
        .unwrap()
        .unwrap();
    assert_eq!(record.chapter_id, None);
}

#[test]
fn test_list_chapters_without_zone_lists_all() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.list_chapters(None).unwrap().is_empty());

    let mut fixture: Fixture = Fixture::seeded(persistence);
    create_chapter(&mut fixture, "Ikeja").unwrap();
    create_chapter(&mut fixture, "Agege").unwrap();

    let names: Vec<String> = fixture
        .persistence
        .list_chapters(None)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec![String::from("Agege"), String::from("Ikeja")]);
}

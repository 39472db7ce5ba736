// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod chapter_tests;
mod concurrency_tests;
mod registration_tests;

use time::OffsetDateTime;
use time::macros::datetime;
use vgss_audit::{Actor, Cause};
use vgss_domain::{
    Gender, GraduateAction, GraduateDetails, GraduateProfile, NewZoneRecord, RegistrationForm,
    StaffRequest, StaffRequestAction, StaffRequestDraft, Urgency, ZoneRecord,
};

use crate::data_models::{DEPARTMENT_ROLE, OFFICE_ROLE, ZONE_ROLE};
use crate::mutations::{users, workflow};
use crate::{Persistence, ZoneRecordFilter};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

/// Placeholder hash; seeding skips bcrypt so the suite stays fast.
pub const TEST_PASSWORD_HASH: &str = "$2b$04$testtesttesttesttesttuTestHashNotForLoginUse00000000";

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// A fresh database seeded with one principal of each staff role.
pub struct Fixture {
    pub persistence: Persistence,
    pub office_id: i64,
    pub zone_id: i64,
    pub department_id: i64,
}

impl Fixture {
    pub fn new() -> Self {
        let persistence: Persistence = Persistence::new_in_memory().unwrap();
        Self::seeded(persistence)
    }

    pub fn seeded(mut persistence: Persistence) -> Self {
        let office_id: i64 = seed_user(&mut persistence, "office@vgss.org", OFFICE_ROLE);
        let zone_id: i64 = seed_user(&mut persistence, "zone.east@vgss.org", ZONE_ROLE);
        let department_id: i64 =
            seed_user(&mut persistence, "media@vgss.org", DEPARTMENT_ROLE);
        Self {
            persistence,
            office_id,
            zone_id,
            department_id,
        }
    }

    pub fn office(&self) -> Actor {
        Actor::principal(self.office_id, OFFICE_ROLE)
    }

    pub fn zone(&self) -> Actor {
        Actor::principal(self.zone_id, ZONE_ROLE)
    }

    pub fn department(&self) -> Actor {
        Actor::principal(self.department_id, DEPARTMENT_ROLE)
    }

    /// Uploads one record per phone and returns them in upload order.
    pub fn upload(&mut self, phones: &[&str]) -> Vec<ZoneRecord> {
        let rows: Vec<NewZoneRecord> = phones.iter().map(|p| upload_row(p)).collect();
        let actor: Actor = self.zone();
        self.persistence
            .upload_zone_records(self.zone_id, &rows, actor, create_test_cause(), NOW)
            .unwrap()
    }

    /// Registers a graduate against a fresh zone record.
    pub fn register(&mut self, phone: &str, email: &str) -> GraduateProfile {
        let record: ZoneRecord = self.upload(&[phone]).remove(0);
        workflow::register_graduate(
            &mut self.persistence.conn,
            record.zone_record_id,
            &registration_form(email),
            TEST_PASSWORD_HASH,
            Actor::anonymous(),
            create_test_cause(),
            NOW,
        )
        .unwrap()
    }

    /// Registers and approves a graduate so that it can be assigned.
    pub fn eligible_graduate(&mut self, phone: &str, email: &str) -> GraduateProfile {
        let profile: GraduateProfile = self.register(phone, email);
        let actor: Actor = self.office();
        self.persistence
            .transition_graduate(
                profile.graduate_id,
                GraduateAction::Approve { status: None },
                None,
                actor,
                create_test_cause(),
                NOW,
            )
            .unwrap()
    }

    pub fn pending_request(&mut self, number_of_staff: u8) -> StaffRequest {
        let actor: Actor = self.department();
        self.persistence
            .create_staff_request(
                self.department_id,
                &draft(number_of_staff),
                actor,
                create_test_cause(),
                NOW,
            )
            .unwrap()
    }

    pub fn approved_request(&mut self, number_of_staff: u8) -> StaffRequest {
        let request: StaffRequest = self.pending_request(number_of_staff);
        let actor: Actor = self.office();
        self.persistence
            .transition_staff_request(
                request.staff_request_id,
                &StaffRequestAction::Approve,
                actor,
                create_test_cause(),
                NOW,
            )
            .unwrap()
    }

    pub fn zone_records(&mut self) -> Vec<ZoneRecord> {
        self.persistence
            .list_zone_records(ZoneRecordFilter {
                zone_id: Some(self.zone_id),
                is_registered: None,
            })
            .unwrap()
    }
}

pub fn seed_user(persistence: &mut Persistence, email: &str, role: &str) -> i64 {
    users::insert_user(
        &mut persistence.conn,
        email,
        "Seeded Principal",
        TEST_PASSWORD_HASH,
        role,
        NOW,
    )
    .unwrap()
}

pub fn upload_row(phone: &str) -> NewZoneRecord {
    NewZoneRecord {
        full_name: String::from(" Bola Ade "),
        gender: Gender::Female,
        phone: phone.to_string(),
        university: String::from("Obafemi Awolowo University"),
        course: String::from("Law"),
        graduation_year: 2025,
        chapter_id: None,
        pastor_name: None,
        pastor_phone: None,
    }
}

pub fn registration_form(email: &str) -> RegistrationForm {
    RegistrationForm {
        email: email.to_string(),
        password: String::from("Correct-Horse-42"),
        password_confirmation: String::from("Correct-Horse-42"),
        details: GraduateDetails {
            date_of_birth: Some(String::from("2000-09-01")),
            marital_status: Some(String::from("Single")),
            residential_address: Some(String::from("12 Road 7, Ile-Ife")),
            state_of_origin: Some(String::from("Osun")),
            next_of_kin_name: Some(String::from("Kemi Ade")),
            next_of_kin_phone: Some(String::from("+2348022222")),
            home_church: Some(String::from("Ife Fellowship")),
            ..GraduateDetails::default()
        },
    }
}

pub fn draft(number_of_staff: u8) -> StaffRequestDraft {
    StaffRequestDraft {
        position_title: String::from("Video Editor"),
        description: String::from("Cut weekly service recordings"),
        number_of_staff,
        skills: Some(String::from("Premiere")),
        qualifications: None,
        preferred_gender: None,
        urgency: Urgency::Medium,
    }
}

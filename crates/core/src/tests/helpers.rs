// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;
use vgss_audit::{Actor, Cause};
use vgss_domain::{
    Gender, GraduateDetails, GraduateProfile, GraduateStatus, NewZoneRecord, RegistrationForm,
    StaffRequest, StaffRequestDraft, StaffRequestStatus, Urgency, ZoneRecord,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);
pub const OFFICE_ID: i64 = 1;
pub const ZONE_ID: i64 = 2;
pub const DEPARTMENT_ID: i64 = 4;

pub fn office_actor() -> Actor {
    Actor::principal(OFFICE_ID, "VgssOffice")
}

pub fn zone_actor() -> Actor {
    Actor::principal(ZONE_ID, "Zone")
}

pub fn department_actor() -> Actor {
    Actor::principal(DEPARTMENT_ID, "ServiceDepartment")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn zone_record(is_registered: bool) -> ZoneRecord {
    ZoneRecord {
        zone_record_id: 7,
        zone_id: ZONE_ID,
        full_name: String::from("Chidi Okafor"),
        gender: Gender::Male,
        phone: String::from("+2340001"),
        university: String::from("University of Nigeria"),
        course: String::from("Mechanical Engineering"),
        graduation_year: 2024,
        chapter_id: None,
        pastor_name: None,
        pastor_phone: None,
        is_registered,
        registered_at: None,
        created_at: NOW,
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
            residential_address: Some(String::from("4 Ogui Road, Enugu")),
            state_of_origin: Some(String::from("Anambra")),
            next_of_kin_name: Some(String::from("Emeka Okafor")),
            next_of_kin_phone: Some(String::from("+2348011111")),
            ..GraduateDetails::default()
        },
    }
}

pub fn graduate(status: GraduateStatus, is_approved: bool) -> GraduateProfile {
    GraduateProfile {
        graduate_id: 11,
        user_id: 21,
        zone_record_id: Some(7),
        full_name: String::from("Chidi Okafor"),
        email: String::from("chidi@example.com"),
        phone: String::from("+2340001"),
        gender: Gender::Male,
        university: String::from("University of Nigeria"),
        course: String::from("Mechanical Engineering"),
        graduation_year: 2024,
        chapter_id: None,
        details: GraduateDetails::default(),
        status,
        is_approved,
        approved_by: None,
        approved_at: None,
        comments: None,
        service_department_id: None,
        service_started_at: None,
        service_completed_at: None,
        created_at: NOW,
        updated_at: NOW,
    }
}

pub fn draft(number_of_staff: u8) -> StaffRequestDraft {
    StaffRequestDraft {
        position_title: String::from("  Accountant "),
        description: String::from("Bookkeeping for the regional office"),
        number_of_staff,
        skills: None,
        qualifications: Some(String::from("B.Sc Accounting")),
        preferred_gender: None,
        urgency: Urgency::Low,
    }
}

pub fn staff_request(
    status: StaffRequestStatus,
    number_of_staff: u8,
    fulfilled_count: u8,
) -> StaffRequest {
    StaffRequest {
        staff_request_id: 5,
        department_id: DEPARTMENT_ID,
        position_title: String::from("Accountant"),
        description: String::from("Bookkeeping for the regional office"),
        number_of_staff,
        skills: None,
        qualifications: None,
        preferred_gender: None,
        urgency: Urgency::Low,
        status,
        fulfilled_count,
        approved_by: Some(OFFICE_ID),
        approved_at: Some(NOW),
        rejection_reason: None,
        fulfilled_at: None,
        created_at: NOW,
        updated_at: NOW,
    }
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

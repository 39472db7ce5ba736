// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::OffsetDateTime;
use time::macros::datetime;
use vgss_audit::Cause;
use vgss_persistence::{DEPARTMENT_ROLE, OFFICE_ROLE, Persistence, ZONE_ROLE};

use crate::{
    AuthenticatedActor, GraduateDetailsInfo, GraduateInfo, RegisterGraduateRequest, Role,
    StaffRequestActionRequest, StaffRequestFields, StaffRequestInfo, TransitionGraduateRequest,
    UploadZoneRecordsRequest, ZoneRecordInfo, ZoneRecordRow, register_graduate,
    staff_request_action, transition_graduate, upload_zone_records,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

/// Satisfies the password policy for every fixture account.
pub const PASSWORD: &str = "Correct-Horse-42";

pub const OFFICE_EMAIL: &str = "office@vgss.org";
pub const ZONE_EMAIL: &str = "zone.east@vgss.org";
pub const DEPARTMENT_EMAIL: &str = "media@vgss.org";

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-1"), String::from("API request"))
}

/// A database with one principal per staff role.
pub struct TestApp {
    pub persistence: Persistence,
    pub office: AuthenticatedActor,
    pub zone: AuthenticatedActor,
    pub department: AuthenticatedActor,
}

impl TestApp {
    pub fn new() -> Self {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
        let office: AuthenticatedActor =
            create_principal(&mut persistence, OFFICE_EMAIL, "Office Admin", Role::VgssOffice);
        let zone: AuthenticatedActor =
            create_principal(&mut persistence, ZONE_EMAIL, "East Zone", Role::Zone);
        let department: AuthenticatedActor = create_principal(
            &mut persistence,
            DEPARTMENT_EMAIL,
            "Media Unit",
            Role::ServiceDepartment,
        );
        Self {
            persistence,
            office,
            zone,
            department,
        }
    }

    /// Adds another principal with `role`.
    pub fn add_principal(&mut self, email: &str, role: Role) -> AuthenticatedActor {
        create_principal(&mut self.persistence, email, "Extra Principal", role)
    }

    pub fn upload(&mut self, phones: &[&str]) -> Vec<ZoneRecordInfo> {
        let request: UploadZoneRecordsRequest = UploadZoneRecordsRequest {
            records: phones.iter().map(|p| zone_row(p)).collect(),
        };
        upload_zone_records(
            &mut self.persistence,
            request,
            &self.zone,
            create_test_cause(),
            NOW,
        )
        .unwrap()
        .records
    }

    /// Uploads a record for `phone` and registers it.
    pub fn register(&mut self, phone: &str, email: &str) -> GraduateInfo {
        let record: ZoneRecordInfo = self.upload(&[phone]).remove(0);
        register_graduate(
            &mut self.persistence,
            registration_request(record.zone_record_id, email),
            create_test_cause(),
            NOW,
        )
        .unwrap()
        .graduate
    }

    /// Registers and approves a graduate.
    pub fn eligible_graduate(&mut self, phone: &str, email: &str) -> GraduateInfo {
        let graduate: GraduateInfo = self.register(phone, email);
        transition_graduate(
            &mut self.persistence,
            graduate.graduate_id,
            &graduate_action("approve"),
            &self.office,
            create_test_cause(),
            NOW,
        )
        .unwrap()
    }

    pub fn pending_request(&mut self, number_of_staff: i64) -> StaffRequestInfo {
        crate::create_staff_request(
            &mut self.persistence,
            staff_request_fields(number_of_staff),
            &self.department,
            create_test_cause(),
            NOW,
        )
        .unwrap()
    }

    pub fn approved_request(&mut self, number_of_staff: i64) -> StaffRequestInfo {
        let request: StaffRequestInfo = self.pending_request(number_of_staff);
        staff_request_action(
            &mut self.persistence,
            request.staff_request_id,
            action_request("approve", None),
            &self.office,
            create_test_cause(),
            NOW,
        )
        .unwrap()
    }
}

pub fn create_principal(
    persistence: &mut Persistence,
    email: &str,
    display_name: &str,
    role: Role,
) -> AuthenticatedActor {
    let stored_role: &str = match role {
        Role::VgssOffice => OFFICE_ROLE,
        Role::Zone => ZONE_ROLE,
        Role::ServiceDepartment => DEPARTMENT_ROLE,
        Role::Graduate => panic!("graduates register themselves"),
    };
    let user_id: i64 = persistence
        .create_user(email, display_name, PASSWORD, stored_role, NOW)
        .unwrap();
    AuthenticatedActor::new(user_id, role)
}

pub fn zone_row(phone: &str) -> ZoneRecordRow {
    ZoneRecordRow {
        full_name: String::from("Bola Ade"),
        gender: String::from("f"),
        phone: phone.to_string(),
        university: String::from("Obafemi Awolowo University"),
        course: String::from("Law"),
        graduation_year: 2025,
        chapter_id: None,
        pastor_name: None,
        pastor_phone: None,
    }
}

pub fn registration_request(zone_record_id: i64, email: &str) -> RegisterGraduateRequest {
    RegisterGraduateRequest {
        zone_record_id,
        email: email.to_string(),
        password: PASSWORD.to_string(),
        password_confirmation: PASSWORD.to_string(),
        details: GraduateDetailsInfo {
            date_of_birth: Some(String::from("2000-09-01")),
            marital_status: Some(String::from("Single")),
            residential_address: Some(String::from("12 Road 7, Ile-Ife")),
            state_of_origin: Some(String::from("Osun")),
            next_of_kin_name: Some(String::from("Kemi Ade")),
            next_of_kin_phone: Some(String::from("+2348022222")),
            ..GraduateDetailsInfo::default()
        },
    }
}

pub fn staff_request_fields(number_of_staff: i64) -> StaffRequestFields {
    StaffRequestFields {
        position_title: String::from("Video Editor"),
        description: String::from("Cut weekly service recordings"),
        number_of_staff,
        skills: Some(String::from("Premiere")),
        qualifications: None,
        preferred_gender: None,
        urgency: Some(String::from("high")),
    }
}

pub fn graduate_action(action: &str) -> TransitionGraduateRequest {
    TransitionGraduateRequest {
        action: action.to_string(),
        status: None,
        comments: None,
    }
}

pub fn action_request(action: &str, reason: Option<&str>) -> StaffRequestActionRequest {
    StaffRequestActionRequest {
        action: action.to_string(),
        reason: reason.map(str::to_string),
    }
}

/// The actor a registered graduate authenticates as.
pub const fn graduate_actor(graduate: &GraduateInfo) -> AuthenticatedActor {
    AuthenticatedActor::new(graduate.user_id, Role::Graduate)
}

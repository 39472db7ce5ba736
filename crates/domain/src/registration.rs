// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Graduate self-registration form.

use crate::error::DomainError;
use crate::graduate::{GraduateDetails, GraduateStatus, NewGraduateProfile};
use crate::validation::{normalize_email, validate_email};
use crate::zone_record::ZoneRecord;
use time::OffsetDateTime;

/// What a graduate submits when claiming their zone record.
///
/// Identity and education fields are taken from the zone record; the form
/// supplies the login email and the personal details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub details: GraduateDetails,
}

impl RegistrationForm {
    /// Required fields, in the order they are reported when missing.
    fn required_fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("email", Some(self.email.as_str())),
            ("password", Some(self.password.as_str())),
            ("date_of_birth", self.details.date_of_birth.as_deref()),
            ("marital_status", self.details.marital_status.as_deref()),
            (
                "residential_address",
                self.details.residential_address.as_deref(),
            ),
            ("state_of_origin", self.details.state_of_origin.as_deref()),
            ("next_of_kin_name", self.details.next_of_kin_name.as_deref()),
            (
                "next_of_kin_phone",
                self.details.next_of_kin_phone.as_deref(),
            ),
        ]
    }

    /// Validates the form, naming the first missing field.
    ///
    /// The password policy is checked separately by the caller; only
    /// presence is checked here.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for the first empty required field, or
    /// `InvalidEmail` when the email fails the format check.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in self.required_fields() {
            if value.is_none_or(|v| v.trim().is_empty()) {
                return Err(DomainError::MissingField(field));
            }
        }
        validate_email(&self.email)
    }

    /// Builds the profile for `record` from this form.
    ///
    /// The form must have been validated.
    #[must_use]
    pub fn to_profile(&self, record: &ZoneRecord, now: OffsetDateTime) -> NewGraduateProfile {
        NewGraduateProfile {
            zone_record_id: Some(record.zone_record_id),
            full_name: record.full_name.clone(),
            email: normalize_email(&self.email),
            phone: record.phone.clone(),
            gender: record.gender,
            university: record.university.clone(),
            course: record.course.clone(),
            graduation_year: record.graduation_year,
            chapter_id: record.chapter_id,
            details: self.details.clone(),
            status: GraduateStatus::UnderReview,
            is_approved: false,
            created_at: now,
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod error;
mod graduate;
mod registration;
mod staff_request;
mod types;
mod validation;
mod zone_record;

#[cfg(test)]
mod tests;

pub use assignment::{NewAssignment, StaffRequestAssignment};
pub use error::{DomainError, ErrorKind};
pub use graduate::{
    GraduateAction, GraduateDetails, GraduateProfile, GraduateStatus, NewGraduateProfile,
};
pub use registration::RegistrationForm;
pub use staff_request::{
    MAX_STAFF_PER_REQUEST, MIN_STAFF_PER_REQUEST, NewStaffRequest, StaffRequest, StaffRequestAction,
    StaffRequestDraft, StaffRequestStatus, Urgency,
};

// Re-export public types
pub use types::{Chapter, Gender};
pub use validation::{
    normalize_email, normalize_phone, require_field, validate_chapter_name, validate_email,
    validate_phone, validate_staff_request_draft, validate_zone_phones_unique, validate_zone_record,
};
pub use zone_record::{NewZoneRecord, ZoneRecord};

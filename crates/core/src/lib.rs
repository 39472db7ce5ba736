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

//! Pure workflow transitions.
//!
//! Every function here takes already-loaded entities and returns the new
//! entity states together with exactly one audit event. Nothing is written;
//! the persistence layer applies the result inside a single transaction.

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{
    apply_assignment, apply_chapter_command, apply_graduate_action, apply_new_staff_request,
    apply_registration, apply_staff_request_action, apply_staff_request_deletion,
    apply_zone_record_deletion, apply_zone_upload,
};
pub use command::{AssignGraduate, ChapterCommand};
pub use error::CoreError;
pub use state::{
    AssignmentResult, ChapterResult, GraduateTransition, RegistrationResult, StaffRequestCreation,
    StaffRequestTransition, ZoneUploadResult, graduate_snapshot, staff_request_snapshot,
    zone_record_snapshot,
};

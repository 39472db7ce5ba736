// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::staff_request::{MAX_STAFF_PER_REQUEST, MIN_STAFF_PER_REQUEST, StaffRequestDraft};
use crate::zone_record::NewZoneRecord;
use std::collections::HashSet;

/// Earliest graduation year accepted on a zone record.
const MIN_GRADUATION_YEAR: u16 = 1950;
/// Latest graduation year accepted on a zone record.
const MAX_GRADUATION_YEAR: u16 = 2100;

/// Lowercases and trims an email address for storage and comparison.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an email address with a simple structural check.
///
/// The address must have exactly one `@`, a non-empty local part, and a
/// domain containing a dot that neither starts nor ends the domain.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the check fails.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let email: &str = email.trim();
    let invalid = || DomainError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

/// Strips spaces, dashes and parentheses from a phone number.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// Validates a normalized phone number: an optional `+` then 7 to 15 digits.
///
/// # Errors
///
/// Returns `InvalidField("phone")` if the number is malformed.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let digits: &str = phone.strip_prefix('+').unwrap_or(phone);
    if !(7..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidField {
            field: "phone",
            reason: format!("'{phone}' is not a valid phone number"),
        });
    }
    Ok(())
}

/// Fails with `MissingField(field)` if `value` is blank.
///
/// # Errors
///
/// Returns an error if the trimmed value is empty.
pub fn require_field(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}

/// Validates the fields of a staff request draft.
///
/// # Errors
///
/// Returns an error if:
/// - The position title or description is blank
/// - `number_of_staff` is outside 1 to 10
pub fn validate_staff_request_draft(draft: &StaffRequestDraft) -> Result<(), DomainError> {
    require_field("position_title", &draft.position_title)?;
    require_field("description", &draft.description)?;

    if !(MIN_STAFF_PER_REQUEST..=MAX_STAFF_PER_REQUEST).contains(&draft.number_of_staff) {
        return Err(DomainError::InvalidField {
            field: "number_of_staff",
            reason: format!(
                "must be between {MIN_STAFF_PER_REQUEST} and {MAX_STAFF_PER_REQUEST}, got {}",
                draft.number_of_staff
            ),
        });
    }
    Ok(())
}

/// Validates a chapter name.
///
/// # Errors
///
/// Returns `MissingField("name")` for a blank name.
pub fn validate_chapter_name(name: &str) -> Result<(), DomainError> {
    require_field("name", name)
}

/// Validates a single uploaded zone record.
///
/// The phone is expected to be normalized already.
///
/// # Errors
///
/// Returns an error for a blank required field, a malformed phone, or a
/// graduation year outside 1950 to 2100.
pub fn validate_zone_record(record: &NewZoneRecord) -> Result<(), DomainError> {
    require_field("full_name", &record.full_name)?;
    require_field("phone", &record.phone)?;
    validate_phone(&record.phone)?;
    require_field("university", &record.university)?;
    require_field("course", &record.course)?;

    if !(MIN_GRADUATION_YEAR..=MAX_GRADUATION_YEAR).contains(&record.graduation_year) {
        return Err(DomainError::InvalidField {
            field: "graduation_year",
            reason: format!(
                "must be between {MIN_GRADUATION_YEAR} and {MAX_GRADUATION_YEAR}, got {}",
                record.graduation_year
            ),
        });
    }
    Ok(())
}

/// Validates that a batch of zone records introduces no duplicate phones.
///
/// A phone is a duplicate if it appears twice in the batch or already
/// exists in the zone.
///
/// # Arguments
///
/// * `zone_id` - The zone receiving the batch
/// * `batch` - The records being uploaded
/// * `existing_phones` - Phones already stored for the zone
///
/// # Errors
///
/// Returns `DuplicatePhone` naming the first duplicated phone.
pub fn validate_zone_phones_unique(
    zone_id: i64,
    batch: &[NewZoneRecord],
    existing_phones: &HashSet<String>,
) -> Result<(), DomainError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for record in batch {
        let phone: &str = record.phone.as_str();
        if existing_phones.contains(phone) || !seen.insert(phone) {
            return Err(DomainError::DuplicatePhone {
                zone_id,
                phone: phone.to_string(),
            });
        }
    }
    Ok(())
}

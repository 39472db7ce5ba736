// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column conversions shared by the query and mutation modules.
//!
//! Timestamps are stored as RFC 3339 text and booleans as 0/1 integers.

use num_traits::ToPrimitive;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(ts.format(&Rfc3339)?)
}

pub fn format_optional_timestamp(
    ts: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    ts.map(format_timestamp).transpose()
}

pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(s, &Rfc3339)?)
}

pub fn parse_optional_timestamp(
    s: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    s.map(parse_timestamp).transpose()
}

pub fn to_flag(value: bool) -> i32 {
    i32::from(value)
}

pub const fn from_flag(value: i32) -> bool {
    value != 0
}

/// Narrows a stored count to `u8`.
pub fn to_u8(value: i32, column: &str) -> Result<u8, PersistenceError> {
    value.to_u8().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{column} value {value} out of range"))
    })
}

/// Narrows a stored year to `u16`.
pub fn to_u16(value: i32, column: &str) -> Result<u16, PersistenceError> {
    value.to_u16().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{column} value {value} out of range"))
    })
}

/// Parses a stored enum label.
pub fn parse_label<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

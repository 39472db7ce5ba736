// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Zone-uploaded graduate records.
//!
//! A zone uploads records in bulk before the graduates themselves register.
//! Each record is claimed at most once by a self-registration; after that it
//! is frozen.

use crate::error::DomainError;
use crate::types::Gender;
use time::OffsetDateTime;

/// A graduate record as submitted by a zone, before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZoneRecord {
    pub full_name: String,
    pub gender: Gender,
    pub phone: String,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    pub chapter_id: Option<i64>,
    pub pastor_name: Option<String>,
    pub pastor_phone: Option<String>,
}

/// A persisted zone record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    pub zone_record_id: i64,
    /// The zone principal that uploaded this record.
    pub zone_id: i64,
    pub full_name: String,
    pub gender: Gender,
    pub phone: String,
    pub university: String,
    pub course: String,
    pub graduation_year: u16,
    pub chapter_id: Option<i64>,
    pub pastor_name: Option<String>,
    pub pastor_phone: Option<String>,
    pub is_registered: bool,
    pub registered_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl ZoneRecord {
    /// Fails with `AlreadyRegistered` if the record has been claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if `is_registered` is set.
    pub fn ensure_unregistered(&self) -> Result<(), DomainError> {
        if self.is_registered {
            return Err(DomainError::AlreadyRegistered(self.zone_record_id));
        }
        Ok(())
    }

    /// Returns a copy of this record flipped to registered at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if the record was claimed already.
    pub fn mark_registered(&self, now: OffsetDateTime) -> Result<Self, DomainError> {
        self.ensure_unregistered()?;
        Ok(Self {
            is_registered: true,
            registered_at: Some(now),
            ..self.clone()
        })
    }

    /// Zones may only delete records nobody has registered against.
    ///
    /// # Errors
    ///
    /// Returns `IllegalTransition` for registered records.
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if self.is_registered {
            return Err(DomainError::IllegalTransition {
                from: String::from("Registered"),
                action: String::from("delete"),
                reason: String::from("registered zone records cannot be deleted"),
            });
        }
        Ok(())
    }
}

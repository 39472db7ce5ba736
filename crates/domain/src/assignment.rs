// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

/// A graduate placed against a staff request.
///
/// At most one row exists per graduate, and per (request, graduate) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRequestAssignment {
    pub assignment_id: i64,
    pub staff_request_id: i64,
    pub graduate_id: i64,
    pub assigned_by: i64,
    pub assigned_at: OffsetDateTime,
    pub notes: Option<String>,
}

/// An assignment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub staff_request_id: i64,
    pub graduate_id: i64,
    pub assigned_by: i64,
    pub assigned_at: OffsetDateTime,
    pub notes: Option<String>,
}

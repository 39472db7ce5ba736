// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event queries
//! - `chapters`: Chapter lookups and name uniqueness
//! - `graduates`: Graduate profile queries
//! - `staff_requests`: Staff request and assignment queries
//! - `users`: Principal and session queries
//! - `zone_records`: Zone record queries

pub mod audit;
pub mod chapters;
pub mod graduates;
pub mod staff_requests;
pub mod users;
pub mod zone_records;

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `chapters`, `graduates`, `staff_requests`, `zone_records`: Row writes per table
//! - `users`: Principal and session mutations
//! - `workflow`: Transactional orchestration of the workflow operations
//!
//! Row-level functions assume the caller holds a transaction where one is
//! needed; only `workflow` opens transactions.

pub mod audit;
pub mod chapters;
pub mod graduates;
pub mod staff_requests;
pub mod users;
pub mod workflow;
pub mod zone_records;

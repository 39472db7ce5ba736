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
#![allow(clippy::multiple_crate_versions)]

//! API boundary of the VGSS graduate service system.
//!
//! Authenticates principals, authorizes every operation once, translates
//! lower-layer errors into [`ApiError`], and exposes request/response DTOs
//! for the HTTP server.

mod auth;
mod capabilities;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use capabilities::{
    compute_global_capabilities, compute_principal_capabilities, compute_staff_request_capabilities,
};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    ApiResult, assign_graduate, bootstrap_office, create_chapter, create_principal,
    create_staff_request, delete_chapter, delete_staff_request, delete_zone_record,
    disable_principal, edit_staff_request, enable_principal, get_audit_trail, get_graduate,
    get_staff_request, list_chapters, list_graduates, list_principals, list_staff_requests,
    list_zone_records, login, logout, lookup_zone_record, my_profile, register_graduate,
    rename_chapter, staff_request_action, transition_graduate, upload_zone_records, whoami,
};
pub use password_policy::{AccountIdentity, PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AssignGraduateRequest, AssignGraduateResponse, AssignmentInfo, AuditEventInfo,
    AuditTrailResponse, BootstrapOfficeRequest, BootstrapOfficeResponse, Capability, ChapterInfo,
    ChapterNameRequest, CreatePrincipalRequest, CreatePrincipalResponse, DeleteResponse,
    GetStaffRequestResponse, GlobalCapabilities, GraduateDetailsInfo, GraduateInfo,
    ListChaptersResponse, ListGraduatesRequest, ListGraduatesResponse, ListPrincipalsResponse,
    ListStaffRequestsRequest, ListStaffRequestsResponse, ListZoneRecordsResponse, LoginRequest,
    LoginResponse, LookupZoneRecordResponse, PrincipalCapabilities, PrincipalInfo,
    PrincipalStatusResponse, RegisterGraduateRequest, RegisterGraduateResponse,
    StaffRequestActionRequest, StaffRequestCapabilities, StaffRequestFields, StaffRequestInfo,
    TransitionGraduateRequest, UploadZoneRecordsRequest, UploadZoneRecordsResponse, WhoAmIResponse,
    ZoneRecordInfo, ZoneRecordLookupInfo, ZoneRecordRow,
};

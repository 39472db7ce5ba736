// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities are advisory only. Every handler still performs its own
//! authorization check.

use vgss_domain::{StaffRequest, StaffRequestStatus};
use vgss_persistence::{OFFICE_ROLE, UserData};

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::{
    Capability, GlobalCapabilities, PrincipalCapabilities, StaffRequestCapabilities,
};

/// Computes the role-level capabilities of an authenticated principal.
#[must_use]
pub const fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    let office: bool = matches!(actor.role, Role::VgssOffice);
    let zone: bool = matches!(actor.role, Role::Zone);
    let department: bool = matches!(actor.role, Role::ServiceDepartment);

    GlobalCapabilities {
        can_manage_principals: Capability::from_bool(office),
        can_manage_chapters: Capability::from_bool(zone),
        can_upload_zone_records: Capability::from_bool(zone),
        can_review_graduates: Capability::from_bool(office),
        can_create_staff_requests: Capability::from_bool(department),
        can_approve_staff_requests: Capability::from_bool(office),
        can_assign_graduates: Capability::from_bool(office),
        can_view_audit: Capability::from_bool(office),
    }
}

/// Computes what an office principal may do to `target`.
///
/// # Arguments
///
/// * `actor` - The authenticated actor
/// * `target` - The principal being managed
/// * `active_office_count` - The number of enabled office principals
#[must_use]
pub fn compute_principal_capabilities(
    actor: &AuthenticatedActor,
    target: &UserData,
    active_office_count: i64,
) -> PrincipalCapabilities {
    if actor.role != Role::VgssOffice {
        return PrincipalCapabilities {
            can_disable: Capability::Denied,
            can_enable: Capability::Denied,
        };
    }

    let last_active_office: bool =
        target.role == OFFICE_ROLE && !target.is_disabled && active_office_count <= 1;

    PrincipalCapabilities {
        can_disable: Capability::from_bool(!target.is_disabled && !last_active_office),
        can_enable: Capability::from_bool(target.is_disabled),
    }
}

/// Computes what `actor` may do to `request` given its current status.
#[must_use]
pub fn compute_staff_request_capabilities(
    actor: &AuthenticatedActor,
    request: &StaffRequest,
) -> StaffRequestCapabilities {
    let office: bool = actor.role == Role::VgssOffice;
    let owner: bool =
        actor.role == Role::ServiceDepartment && request.department_id == actor.user_id;
    let pending: bool = request.status == StaffRequestStatus::Pending;
    let deletable: bool = matches!(
        request.status,
        StaffRequestStatus::Pending | StaffRequestStatus::Cancelled
    );
    let open: bool =
        request.status == StaffRequestStatus::Approved && request.remaining_slots() > 0;

    StaffRequestCapabilities {
        can_approve: Capability::from_bool(office && pending),
        can_reject: Capability::from_bool(office && pending),
        can_cancel: Capability::from_bool((office || owner) && pending),
        can_edit: Capability::from_bool(owner && pending),
        can_delete: Capability::from_bool((office || owner) && deletable),
        can_assign: Capability::from_bool(office && open),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access policies, one per resource kind
//!
//! Each policy holds a [`BaseAccess`](super::BaseAccess) and overrides only
//! what differs for its kind.  The table below is the whole of it, for an
//! authenticated actor who is not an administrator ("base" means the
//! [`BaseAccess`](super::BaseAccess) default: mutations denied, `read` by
//! visibility):
//!
//! | Kind           | create / delete         | read (visibility)             | update          |
//! |----------------|-------------------------|-------------------------------|-----------------|
//! | Organization   | base                    | any organization role         | base            |
//! | Space          | base                    | org manager, any space role   | base            |
//! | App            | space developer         | space developer/manager/auditor | space developer |
//! | Event          | base                    | space developer/auditor       | base            |
//! | Service        | base                    | everyone                      | base            |
//! | ServiceBinding | developer of app's space | developer of app's space     | never           |
//! | Domain (private) | org manager           | org manager/auditor           | org manager     |
//! | Domain (shared)  | base                  | everyone, even anonymous      | base            |

mod app;
mod domain;
mod event;
mod organization;
mod service;
mod service_binding;
mod space;

pub use app::AppPolicy;
pub use domain::DomainPolicy;
pub use event::EventPolicy;
pub use organization::OrganizationPolicy;
pub use service::ServicePolicy;
pub use service_binding::ServiceBindingPolicy;
pub use space::SpacePolicy;

use super::api_resources::ApiResource;
use super::context::RoleContext;
use super::roles::OrganizationRole;
use super::roles::SpaceRole;
use super::visibility::Filter;
use controller_common::typed_uuid::UserUuid;

/// Returns whether the actor holds `role` on the resource's space
///
/// False if the resource has no space (including when it was deleted).
fn in_resource_space_as<R>(ctx: &RoleContext, resource: &R, role: SpaceRole) -> bool
where
    R: ApiResource + ?Sized,
{
    resource
        .space_id()
        .is_some_and(|space_id| ctx.in_space_as(space_id, role))
}

/// Returns whether the actor holds `role` on the resource's organization
///
/// False if the resource has no organization (including when it was
/// deleted).
fn in_resource_organization_as<R>(
    ctx: &RoleContext,
    resource: &R,
    role: OrganizationRole,
) -> bool
where
    R: ApiResource + ?Sized,
{
    resource.organization_id().is_some_and(|organization_id| {
        ctx.in_organization_as(organization_id, role)
    })
}

/// Builds the visibility filter for the actor in `ctx`
///
/// Administrators see everything and anonymous actors see nothing.  For
/// anyone else, `build` describes what they see.
fn actor_visibility<F>(ctx: &RoleContext, build: F) -> Filter
where
    F: FnOnce(UserUuid) -> Filter,
{
    if ctx.is_admin() {
        return Filter::All;
    }
    match ctx.actor_id() {
        Some(user_id) => build(user_id),
        None => Filter::Nothing,
    }
}

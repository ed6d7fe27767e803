// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use crate::authz::api_resources::Organization;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::roles::OrganizationRole;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;
use strum::IntoEnumIterator;

/// Any role on an organization, even plain membership, lets the holder see
/// it.  Only administrators change organizations.
#[derive(Debug, Default)]
pub struct OrganizationPolicy {
    base: BaseAccess,
}

impl OrganizationPolicy {
    pub fn new() -> OrganizationPolicy {
        OrganizationPolicy::default()
    }
}

impl AccessPolicy for OrganizationPolicy {
    type Resource = Organization;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        _ctx: &RoleContext,
        _action: Action,
        _organization: &Organization,
    ) -> Option<bool> {
        None
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        actor_visibility(ctx, |user_id| {
            let roles: Vec<_> = OrganizationRole::iter().collect();
            Filter::organization_roles(user_id, &roles)
        })
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use crate::authz::api_resources::Space;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::roles::OrganizationRole;
use crate::authz::roles::SpaceRole;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;

/// A space is visible to its organization's managers and to anyone with a
/// role in the space.  Only administrators change spaces.
#[derive(Debug, Default)]
pub struct SpacePolicy {
    base: BaseAccess,
}

impl SpacePolicy {
    pub fn new() -> SpacePolicy {
        SpacePolicy::default()
    }
}

impl AccessPolicy for SpacePolicy {
    type Resource = Space;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        _ctx: &RoleContext,
        _action: Action,
        _space: &Space,
    ) -> Option<bool> {
        None
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        actor_visibility(ctx, |user_id| {
            Filter::organization_roles(user_id, &[OrganizationRole::Manager])
                .or(Filter::space_roles(
                    user_id,
                    &[SpaceRole::Developer, SpaceRole::Manager, SpaceRole::Auditor],
                ))
        })
    }
}

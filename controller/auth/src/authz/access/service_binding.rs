// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use super::in_resource_space_as;
use crate::authz::api_resources::ServiceBinding;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::roles::SpaceRole;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;

/// Bindings belong to the developers of the bound app's space
///
/// Creating and deleting a binding are the same permission.  Nobody but an
/// administrator may update one.  The space of the bound service instance
/// plays no part, even when it differs from the app's.
#[derive(Debug, Default)]
pub struct ServiceBindingPolicy {
    base: BaseAccess,
}

impl ServiceBindingPolicy {
    pub fn new() -> ServiceBindingPolicy {
        ServiceBindingPolicy::default()
    }

    fn may_bind(&self, ctx: &RoleContext, binding: &ServiceBinding) -> bool {
        in_resource_space_as(ctx, binding, SpaceRole::Developer)
    }
}

impl AccessPolicy for ServiceBindingPolicy {
    type Resource = ServiceBinding;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        ctx: &RoleContext,
        action: Action,
        binding: &ServiceBinding,
    ) -> Option<bool> {
        match action {
            Action::Create | Action::Delete => Some(self.may_bind(ctx, binding)),
            Action::Update => Some(false),
            Action::Read => None,
        }
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        actor_visibility(ctx, |user_id| {
            Filter::space_roles(user_id, &[SpaceRole::Developer])
        })
    }
}

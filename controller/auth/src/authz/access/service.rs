// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use crate::authz::api_resources::Service;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;

/// The service catalog is readable by anyone who is logged in
#[derive(Debug, Default)]
pub struct ServicePolicy {
    base: BaseAccess,
}

impl ServicePolicy {
    pub fn new() -> ServicePolicy {
        ServicePolicy::default()
    }
}

impl AccessPolicy for ServicePolicy {
    type Resource = Service;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        _ctx: &RoleContext,
        _action: Action,
        _service: &Service,
    ) -> Option<bool> {
        None
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        actor_visibility(ctx, |_| Filter::All)
    }
}

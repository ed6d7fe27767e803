// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use crate::authz::api_resources::Event;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::roles::SpaceRole;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;

/// Events are written by the system and read by a space's developers and
/// auditors
///
/// Once the space is gone, nobody but an administrator can read its events.
#[derive(Debug, Default)]
pub struct EventPolicy {
    base: BaseAccess,
}

impl EventPolicy {
    pub fn new() -> EventPolicy {
        EventPolicy::default()
    }
}

impl AccessPolicy for EventPolicy {
    type Resource = Event;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        _ctx: &RoleContext,
        _action: Action,
        _event: &Event,
    ) -> Option<bool> {
        None
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        actor_visibility(ctx, |user_id| {
            Filter::space_roles(
                user_id,
                &[SpaceRole::Developer, SpaceRole::Auditor],
            )
        })
    }
}

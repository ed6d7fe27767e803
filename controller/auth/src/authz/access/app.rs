// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use super::in_resource_space_as;
use crate::authz::api_resources::App;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::roles::SpaceRole;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;

/// Developers of an app's space manage it; the space's managers and auditors
/// can look at it
#[derive(Debug, Default)]
pub struct AppPolicy {
    base: BaseAccess,
}

impl AppPolicy {
    pub fn new() -> AppPolicy {
        AppPolicy::default()
    }
}

impl AccessPolicy for AppPolicy {
    type Resource = App;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        ctx: &RoleContext,
        action: Action,
        app: &App,
    ) -> Option<bool> {
        match action {
            Action::Create | Action::Update | Action::Delete => {
                Some(in_resource_space_as(ctx, app, SpaceRole::Developer))
            }
            Action::Read => None,
        }
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        actor_visibility(ctx, |user_id| {
            Filter::space_roles(
                user_id,
                &[SpaceRole::Developer, SpaceRole::Manager, SpaceRole::Auditor],
            )
        })
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::actor_visibility;
use super::in_resource_organization_as;
use crate::authz::api_resources::Domain;
use crate::authz::policy::AccessPolicy;
use crate::authz::policy::Action;
use crate::authz::policy::BaseAccess;
use crate::authz::roles::OrganizationRole;
use crate::authz::visibility::Condition;
use crate::authz::visibility::Filter;
use crate::authz::RoleContext;

/// Shared domains are managed by the system and readable by everyone,
/// including anonymous callers.  Private domains are managed by the owning
/// organization's managers and readable by its managers and auditors.
#[derive(Debug, Default)]
pub struct DomainPolicy {
    base: BaseAccess,
}

impl DomainPolicy {
    pub fn new() -> DomainPolicy {
        DomainPolicy::default()
    }
}

impl AccessPolicy for DomainPolicy {
    type Resource = Domain;

    fn base(&self) -> &BaseAccess {
        &self.base
    }

    fn rule(
        &self,
        ctx: &RoleContext,
        action: Action,
        domain: &Domain,
    ) -> Option<bool> {
        if domain.is_shared() {
            return None;
        }

        match action {
            Action::Create | Action::Update | Action::Delete => {
                Some(in_resource_organization_as(
                    ctx,
                    domain,
                    OrganizationRole::Manager,
                ))
            }
            Action::Read => None,
        }
    }

    fn unauthenticated_rule(
        &self,
        action: Action,
        domain: &Domain,
    ) -> Option<bool> {
        (action == Action::Read && domain.is_shared()).then_some(true)
    }

    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter {
        Filter::Condition(Condition::SystemOwned).or(actor_visibility(
            ctx,
            |user_id| {
                Filter::organization_roles(
                    user_id,
                    &[OrganizationRole::Manager, OrganizationRole::Auditor],
                )
            },
        ))
    }
}

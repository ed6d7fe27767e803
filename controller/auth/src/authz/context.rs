// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-operation view of an actor's identity and roles

use super::api_resources::ApiResource;
use super::roles::load_roles_for_resource;
use super::roles::Memberships;
use super::roles::OrganizationRole;
use super::roles::RoleSet;
use super::roles::RoleStore;
use super::roles::SpaceRole;
use crate::authn;
use controller_common::api::external::Error;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::SpaceUuid;
use controller_common::typed_uuid::UserUuid;
use slog::o;
use slog::Logger;
use std::sync::Arc;

/// Snapshot of an actor's identity and role memberships, scoped to one
/// operation
///
/// A `RoleContext` is built once per request and discarded afterwards.  It
/// does no I/O after construction, so every question it answers has the same
/// answer for the whole operation.
pub struct RoleContext {
    pub log: Logger,
    authn: Arc<authn::Context>,
    roles: RoleSet,
}

impl RoleContext {
    /// Builds a context from roles that the caller already loaded
    pub fn new(
        log: &Logger,
        authn: Arc<authn::Context>,
        roles: RoleSet,
    ) -> RoleContext {
        let log = match authn.actor() {
            Some(actor) => log.new(o!(
                "actor_id" => actor.user_id.to_string(),
                "is_admin" => authn.is_admin(),
            )),
            None => log.new(o!("actor_id" => "anonymous")),
        };
        RoleContext { log, authn, roles }
    }

    /// Builds a context for a decision about `resource`, loading the actor's
    /// roles on its organization and space from `store`
    pub async fn for_resource<R>(
        log: &Logger,
        authn: Arc<authn::Context>,
        store: &dyn RoleStore,
        resource: &R,
    ) -> Result<RoleContext, Error>
    where
        R: ApiResource + ?Sized,
    {
        let mut roles = RoleSet::new();
        load_roles_for_resource(log, store, &authn, resource, &mut roles)
            .await?;
        Ok(RoleContext::new(log, authn, roles))
    }

    pub fn authn(&self) -> &authn::Context {
        &self.authn
    }

    pub fn actor_id(&self) -> Option<UserUuid> {
        self.authn.actor().map(|actor| actor.user_id)
    }

    pub fn is_admin(&self) -> bool {
        self.authn.is_admin()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authn.actor().is_some()
    }

    pub fn in_organization_as(
        &self,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) -> bool {
        self.is_authenticated()
            && self.roles.has_organization_role(organization_id, role)
    }

    pub fn in_space_as(&self, space_id: SpaceUuid, role: SpaceRole) -> bool {
        self.is_authenticated() && self.roles.has_space_role(space_id, role)
    }
}

/// A `RoleContext` knows about exactly one user: its actor
impl Memberships for RoleContext {
    fn has_organization_role(
        &self,
        user_id: UserUuid,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) -> bool {
        self.actor_id() == Some(user_id)
            && self.in_organization_as(organization_id, role)
    }

    fn has_space_role(
        &self,
        user_id: UserUuid,
        space_id: SpaceUuid,
        role: SpaceRole,
    ) -> bool {
        self.actor_id() == Some(user_id) && self.in_space_as(space_id, role)
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory stand-ins for the persistence layer, used by the tests

use crate::authn;
use crate::authz::Memberships;
use crate::authz::OrganizationRole;
use crate::authz::RoleContext;
use crate::authz::RoleSet;
use crate::authz::RoleStore;
use crate::authz::SpaceRole;
use crate::quota::AppUsage;
use crate::quota::OrganizationUsage;
use async_trait::async_trait;
use controller_common::api::external::Error;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::SpaceUuid;
use controller_common::typed_uuid::UserUuid;
use slog::Logger;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Role assignments held in memory
#[derive(Debug, Default)]
pub struct FakeRoleStore {
    organization_roles: BTreeSet<(UserUuid, OrganizationUuid, OrganizationRole)>,
    space_roles: BTreeSet<(UserUuid, SpaceUuid, SpaceRole)>,
    error: Option<Error>,
}

impl FakeRoleStore {
    pub fn new() -> FakeRoleStore {
        FakeRoleStore::default()
    }

    pub fn grant_organization_role(
        &mut self,
        user_id: UserUuid,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) {
        self.organization_roles.insert((user_id, organization_id, role));
    }

    pub fn grant_space_role(
        &mut self,
        user_id: UserUuid,
        space_id: SpaceUuid,
        role: SpaceRole,
    ) {
        self.space_roles.insert((user_id, space_id, role));
    }

    pub fn revoke_space_role(
        &mut self,
        user_id: UserUuid,
        space_id: SpaceUuid,
        role: SpaceRole,
    ) {
        self.space_roles.remove(&(user_id, space_id, role));
    }

    /// Makes every subsequent lookup fail with `error`
    pub fn fail_with(&mut self, error: Error) {
        self.error = Some(error);
    }

    fn check_error(&self) -> Result<(), Error> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Memberships for FakeRoleStore {
    fn has_organization_role(
        &self,
        user_id: UserUuid,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) -> bool {
        self.organization_roles.contains(&(user_id, organization_id, role))
    }

    fn has_space_role(
        &self,
        user_id: UserUuid,
        space_id: SpaceUuid,
        role: SpaceRole,
    ) -> bool {
        self.space_roles.contains(&(user_id, space_id, role))
    }
}

#[async_trait]
impl RoleStore for FakeRoleStore {
    async fn organization_roles_for(
        &self,
        user_id: UserUuid,
        organization_id: OrganizationUuid,
    ) -> Result<Vec<OrganizationRole>, Error> {
        self.check_error()?;
        Ok(self
            .organization_roles
            .iter()
            .filter(|(u, o, _)| *u == user_id && *o == organization_id)
            .map(|(_, _, role)| *role)
            .collect())
    }

    async fn space_roles_for(
        &self,
        user_id: UserUuid,
        space_id: SpaceUuid,
    ) -> Result<Vec<SpaceRole>, Error> {
        self.check_error()?;
        Ok(self
            .space_roles
            .iter()
            .filter(|(u, s, _)| *u == user_id && *s == space_id)
            .map(|(_, _, role)| *role)
            .collect())
    }
}

/// Per-organization aggregates held in memory
///
/// Counts how many queries it has answered so tests can check that a policy
/// did not query at all.
#[derive(Debug, Default)]
pub struct FakeUsage {
    routes: BTreeMap<OrganizationUuid, u64>,
    apps: BTreeMap<OrganizationUuid, Vec<AppUsage>>,
    service_instances: BTreeMap<OrganizationUuid, u64>,
    queries: AtomicUsize,
}

impl FakeUsage {
    pub fn new() -> FakeUsage {
        FakeUsage::default()
    }

    pub fn set_route_count(&mut self, organization_id: OrganizationUuid, count: u64) {
        self.routes.insert(organization_id, count);
    }

    pub fn add_app(&mut self, organization_id: OrganizationUuid, app: AppUsage) {
        self.apps.entry(organization_id).or_default().push(app);
    }

    pub fn set_service_instance_count(
        &mut self,
        organization_id: OrganizationUuid,
        count: u64,
    ) {
        self.service_instances.insert(organization_id, count);
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrganizationUsage for FakeUsage {
    async fn route_count(
        &self,
        organization_id: OrganizationUuid,
    ) -> Result<u64, Error> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.routes.get(&organization_id).copied().unwrap_or(0))
    }

    async fn app_usage(
        &self,
        organization_id: OrganizationUuid,
    ) -> Result<Vec<AppUsage>, Error> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.apps.get(&organization_id).cloned().unwrap_or_default())
    }

    async fn service_instance_count(
        &self,
        organization_id: OrganizationUuid,
    ) -> Result<u64, Error> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.service_instances.get(&organization_id).copied().unwrap_or(0))
    }
}

/// Builds a [`RoleContext`] for an ordinary user holding `roles`
pub fn user_context(log: &Logger, user_id: UserUuid, roles: RoleSet) -> RoleContext {
    RoleContext::new(log, Arc::new(authn::Context::for_user(user_id)), roles)
}

pub fn admin_context(log: &Logger) -> RoleContext {
    RoleContext::new(
        log,
        Arc::new(authn::Context::for_admin(UserUuid::new_v4())),
        RoleSet::new(),
    )
}

pub fn anonymous_context(log: &Logger) -> RoleContext {
    RoleContext::new(
        log,
        Arc::new(authn::Context::unauthenticated()),
        RoleSet::new(),
    )
}

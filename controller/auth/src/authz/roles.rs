// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Role lookup
//!
//! For important background, see the [`crate::authz`] module documentation.
//! An access decision may depend on the actor's roles on the resource's space,
//! on its organization, or both.  Role assignments live in the persistence
//! layer and the lookups are async, while the decisions themselves are plain
//! synchronous functions.
//!
//! So before deciding anything, we load _all_ of the roles that the actor has
//! on the resource's space and organization into a [`RoleSet`].  That's
//! done by [`load_roles_for_resource`].  The policies then consult only that
//! snapshot.  A role granted or revoked while a decision is in flight has no
//! effect on that decision, and asking the same question twice always gets
//! the same answer.

use super::api_resources::ApiResource;
use crate::authn;
use async_trait::async_trait;
use controller_common::api::external::Error;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::SpaceUuid;
use controller_common::typed_uuid::UserUuid;
use serde::Deserialize;
use serde::Serialize;
use slog::trace;
use slog::Logger;
use std::collections::BTreeSet;

/// Roles that can be granted on an organization
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrganizationRole {
    Manager,
    Auditor,
    BillingManager,
    /// plain membership, which grants nothing by itself
    Member,
}

/// Roles that can be granted on a space
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpaceRole {
    Developer,
    Manager,
    Auditor,
}

/// A set of roles held by one actor, used for quickly checking whether a
/// particular role is contained within the set
#[derive(Clone, Debug, Default)]
pub struct RoleSet {
    organization_roles: BTreeSet<(OrganizationUuid, OrganizationRole)>,
    space_roles: BTreeSet<(SpaceUuid, SpaceRole)>,
}

impl RoleSet {
    pub fn new() -> RoleSet {
        RoleSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.organization_roles.is_empty() && self.space_roles.is_empty()
    }

    pub fn has_organization_role(
        &self,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) -> bool {
        self.organization_roles.contains(&(organization_id, role))
    }

    pub fn has_space_role(&self, space_id: SpaceUuid, role: SpaceRole) -> bool {
        self.space_roles.contains(&(space_id, role))
    }

    pub fn insert_organization_role(
        &mut self,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) {
        self.organization_roles.insert((organization_id, role));
    }

    pub fn insert_space_role(&mut self, space_id: SpaceUuid, role: SpaceRole) {
        self.space_roles.insert((space_id, role));
    }
}

/// Answers role-membership questions about any user
///
/// Visibility filters name the user they were built for, so evaluating one
/// against a resource needs this rather than a single actor's [`RoleSet`].
pub trait Memberships {
    fn has_organization_role(
        &self,
        user_id: UserUuid,
        organization_id: OrganizationUuid,
        role: OrganizationRole,
    ) -> bool;

    fn has_space_role(
        &self,
        user_id: UserUuid,
        space_id: SpaceUuid,
        role: SpaceRole,
    ) -> bool;
}

/// Source of role assignments (the persistence layer)
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Returns the roles `user_id` holds on the given organization
    async fn organization_roles_for(
        &self,
        user_id: UserUuid,
        organization_id: OrganizationUuid,
    ) -> Result<Vec<OrganizationRole>, Error>;

    /// Returns the roles `user_id` holds on the given space
    async fn space_roles_for(
        &self,
        user_id: UserUuid,
        space_id: SpaceUuid,
    ) -> Result<Vec<SpaceRole>, Error>;
}

/// Loads every role the actor holds on `resource`'s organization and space
/// into `roleset`
///
/// Nothing is loaded for an unauthenticated actor, nor for parents that are
/// missing.
pub async fn load_roles_for_resource<R>(
    log: &Logger,
    store: &dyn RoleStore,
    authn: &authn::Context,
    resource: &R,
    roleset: &mut RoleSet,
) -> Result<(), Error>
where
    R: ApiResource + ?Sized,
{
    let Some(actor) = authn.actor() else {
        return Ok(());
    };
    let user_id = actor.user_id;

    let organization_roles = async {
        match resource.organization_id() {
            Some(organization_id) => {
                trace!(log, "loading organization roles";
                    "user_id" => %user_id,
                    "organization_id" => %organization_id,
                );
                store
                    .organization_roles_for(user_id, organization_id)
                    .await
                    .map(|roles| Some((organization_id, roles)))
            }
            None => Ok(None),
        }
    };
    let space_roles = async {
        match resource.space_id() {
            Some(space_id) => {
                trace!(log, "loading space roles";
                    "user_id" => %user_id,
                    "space_id" => %space_id,
                );
                store
                    .space_roles_for(user_id, space_id)
                    .await
                    .map(|roles| Some((space_id, roles)))
            }
            None => Ok(None),
        }
    };

    let (organization_roles, space_roles) =
        futures::try_join!(organization_roles, space_roles).map_err(|e| {
            e.internal_context(format!(
                "loading roles for {} {:?}",
                resource.resource_type(),
                resource.lookup_type()
            ))
        })?;

    if let Some((organization_id, roles)) = organization_roles {
        for role in roles {
            roleset.insert_organization_role(organization_id, role);
        }
    }
    if let Some((space_id, roles)) = space_roles {
        for role in roles {
            roleset.insert_space_role(space_id, role);
        }
    }

    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-kind access policy contract and the defaults it falls back to

use super::api_resources::AnyResource;
use super::api_resources::ApiResource;
use super::api_resources::TypedResource;
use super::context::RoleContext;
use super::visibility::Filter;
use controller_common::api::external::Error;
use controller_common::api::external::ResourceType;
use serde::Deserialize;
use serde::Serialize;

/// Describes an operation that an actor can attempt on a resource
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
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Default decisions shared by every resource kind
///
/// Mutations are reserved to administrators.  `read` follows the kind's
/// visibility filter, so whatever an actor can list, they can read.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseAccess;

impl BaseAccess {
    pub fn create(&self, ctx: &RoleContext) -> bool {
        ctx.is_admin()
    }

    pub fn update(&self, ctx: &RoleContext) -> bool {
        ctx.is_admin()
    }

    pub fn delete(&self, ctx: &RoleContext) -> bool {
        ctx.is_admin()
    }

    pub fn read<R: ApiResource + ?Sized>(
        &self,
        ctx: &RoleContext,
        visibility: &Filter,
        resource: &R,
    ) -> bool {
        ctx.is_admin() || visibility.matches(resource, ctx)
    }
}

/// Access rules for one resource kind
///
/// Implementors supply the kind-specific pieces: [`AccessPolicy::rule`],
/// [`AccessPolicy::visibility_predicate`] and, rarely,
/// [`AccessPolicy::unauthenticated_rule`].  The provided methods apply them
/// in a fixed order:
///
/// 1. an administrator is allowed everything
/// 2. an unauthenticated actor is denied everything, unless
///    `unauthenticated_rule` says otherwise
/// 3. the kind's `rule`, if it has an opinion
/// 4. [`BaseAccess`]
pub trait AccessPolicy: Send + Sync + 'static {
    type Resource: TypedResource;

    /// The defaults this policy falls back to
    fn base(&self) -> &BaseAccess;

    /// Kind-specific decision for an authenticated, non-administrator actor
    ///
    /// `None` defers to [`BaseAccess`].
    fn rule(
        &self,
        ctx: &RoleContext,
        action: Action,
        resource: &Self::Resource,
    ) -> Option<bool>;

    /// Decision for an unauthenticated actor, evaluated before the blanket
    /// denial
    fn unauthenticated_rule(
        &self,
        _action: Action,
        _resource: &Self::Resource,
    ) -> Option<bool> {
        None
    }

    /// Describes the resources of this kind that `ctx` may list
    fn visibility_predicate(&self, ctx: &RoleContext) -> Filter;

    fn allows(
        &self,
        ctx: &RoleContext,
        action: Action,
        resource: &Self::Resource,
    ) -> bool {
        if ctx.is_admin() {
            return true;
        }

        if !ctx.is_authenticated() {
            return self
                .unauthenticated_rule(action, resource)
                .unwrap_or(false);
        }

        if let Some(allowed) = self.rule(ctx, action, resource) {
            return allowed;
        }

        let base = self.base();
        match action {
            Action::Create => base.create(ctx),
            Action::Read => {
                let visibility = self.visibility_predicate(ctx);
                base.read(ctx, &visibility, resource)
            }
            Action::Update => base.update(ctx),
            Action::Delete => base.delete(ctx),
        }
    }

    fn create(&self, ctx: &RoleContext, resource: &Self::Resource) -> bool {
        self.allows(ctx, Action::Create, resource)
    }

    fn read(&self, ctx: &RoleContext, resource: &Self::Resource) -> bool {
        self.allows(ctx, Action::Read, resource)
    }

    fn update(&self, ctx: &RoleContext, resource: &Self::Resource) -> bool {
        self.allows(ctx, Action::Update, resource)
    }

    fn delete(&self, ctx: &RoleContext, resource: &Self::Resource) -> bool {
        self.allows(ctx, Action::Delete, resource)
    }
}

/// An [`AccessPolicy`] with its resource type erased, so that policies for
/// different kinds can live in one registry
pub trait DynPolicy: Send + Sync {
    fn resource_type(&self) -> ResourceType;

    /// Fails only if `resource` is not of this policy's kind
    fn allows_any(
        &self,
        ctx: &RoleContext,
        action: Action,
        resource: &AnyResource,
    ) -> Result<bool, Error>;

    fn visibility_for(&self, ctx: &RoleContext) -> Filter;
}

impl<P: AccessPolicy> DynPolicy for P {
    fn resource_type(&self) -> ResourceType {
        P::Resource::RESOURCE_TYPE
    }

    fn allows_any(
        &self,
        ctx: &RoleContext,
        action: Action,
        resource: &AnyResource,
    ) -> Result<bool, Error> {
        let resource = P::Resource::from_any(resource).ok_or_else(|| {
            Error::internal_error(&format!(
                "policy for {} asked about {:?}",
                P::Resource::RESOURCE_TYPE,
                resource
            ))
        })?;
        Ok(self.allows(ctx, action, resource))
    }

    fn visibility_for(&self, ctx: &RoleContext) -> Filter {
        self.visibility_predicate(ctx)
    }
}

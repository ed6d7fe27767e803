// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The process-wide table of access policies

use super::access::AppPolicy;
use super::access::DomainPolicy;
use super::access::EventPolicy;
use super::access::OrganizationPolicy;
use super::access::ServiceBindingPolicy;
use super::access::ServicePolicy;
use super::access::SpacePolicy;
use super::api_resources::AnyResource;
use super::api_resources::ApiResource;
use super::context::RoleContext;
use super::policy::Action;
use super::policy::DynPolicy;
use super::visibility::Filter;
use controller_common::api::external::Error;
use controller_common::api::external::ResourceType;
use controller_common::config::AuthzConfig;
use slog::debug;
use slog::error;
use slog::info;
use slog::o;
use slog::trace;
use slog::Logger;
use std::collections::BTreeMap;

/// Resource kinds that have a built-in access policy
pub const AUTHORIZED_RESOURCE_TYPES: [ResourceType; 7] = [
    ResourceType::App,
    ResourceType::Domain,
    ResourceType::Event,
    ResourceType::Organization,
    ResourceType::Service,
    ResourceType::ServiceBinding,
    ResourceType::Space,
];

/// Returns one instance of every built-in access policy
pub fn default_policies() -> Vec<Box<dyn DynPolicy>> {
    vec![
        Box::new(AppPolicy::new()),
        Box::new(DomainPolicy::new()),
        Box::new(EventPolicy::new()),
        Box::new(OrganizationPolicy::new()),
        Box::new(ServicePolicy::new()),
        Box::new(ServiceBindingPolicy::new()),
        Box::new(SpacePolicy::new()),
    ]
}

/// Server-wide authorization context
///
/// This holds one stateless policy per resource kind.  It's built once at
/// startup and shared by every request.
pub struct Authz {
    log: Logger,
    policies: BTreeMap<ResourceType, Box<dyn DynPolicy>>,
}

impl Authz {
    /// Builds the registry with the built-in policies
    ///
    /// Fails if `config` requires a resource kind that has no policy.  This
    /// is meant to stop the process at startup rather than surface as a
    /// per-request failure.
    pub fn new(log: &Logger, config: &AuthzConfig) -> Result<Authz, Error> {
        Authz::with_policies(log, config, default_policies())
    }

    pub fn with_policies(
        log: &Logger,
        config: &AuthzConfig,
        policies: Vec<Box<dyn DynPolicy>>,
    ) -> Result<Authz, Error> {
        let log = log.new(o!("component" => "Authz"));
        let mut by_type = BTreeMap::new();
        for policy in policies {
            let resource_type = policy.resource_type();
            if by_type.insert(resource_type, policy).is_some() {
                error!(log, "duplicate access policy";
                    "resource_type" => %resource_type);
                return Err(Error::internal_error(&format!(
                    "more than one access policy registered for {}",
                    resource_type
                )));
            }
        }

        let required = config
            .required_resource_types
            .clone()
            .unwrap_or_else(|| AUTHORIZED_RESOURCE_TYPES.to_vec());
        let missing: Vec<String> = required
            .iter()
            .filter(|resource_type| !by_type.contains_key(*resource_type))
            .map(|resource_type| resource_type.to_string())
            .collect();
        if !missing.is_empty() {
            let missing = missing.join(", ");
            error!(log, "required access policies are missing";
                "resource_types" => &missing);
            return Err(Error::internal_error(&format!(
                "no access policy registered for: {}",
                missing
            )));
        }

        info!(log, "registered access policies";
            "resource_types" => by_type
                .keys()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        Ok(Authz { log, policies: by_type })
    }

    /// Returns the resource kinds that have a registered policy
    pub fn resource_types(&self) -> impl Iterator<Item = ResourceType> + '_ {
        self.policies.keys().copied()
    }

    fn policy_for(
        &self,
        resource_type: ResourceType,
    ) -> Result<&dyn DynPolicy, Error> {
        self.policies.get(&resource_type).map(|p| p.as_ref()).ok_or_else(
            || {
                error!(self.log, "no access policy"; "resource_type" => %resource_type);
                Error::internal_error(&format!(
                    "no access policy registered for {}",
                    resource_type
                ))
            },
        )
    }

    /// Returns whether `ctx` may perform `action` on `resource`
    ///
    /// An error here means the registry is misconfigured, never that access
    /// was denied.
    pub fn is_allowed(
        &self,
        ctx: &RoleContext,
        action: Action,
        resource: &AnyResource,
    ) -> Result<bool, Error> {
        let policy = self.policy_for(resource.resource_type())?;
        let allowed = policy.allows_any(ctx, action, resource)?;
        trace!(ctx.log, "authorize result";
            "action" => %action,
            "resource" => ?resource,
            "allowed" => allowed,
        );
        Ok(allowed)
    }

    /// Like [`Authz::is_allowed()`], but turns a denial into the error that
    /// should be reported to the caller
    ///
    /// - an unauthenticated actor gets `Unauthenticated`
    /// - an actor who may not read the resource gets `ObjectNotFound`, so
    ///   that its existence is not revealed
    /// - an actor who can read the resource but not do `action` gets
    ///   `Forbidden`
    pub fn authorize(
        &self,
        ctx: &RoleContext,
        action: Action,
        resource: &AnyResource,
    ) -> Result<(), Error> {
        if self.is_allowed(ctx, action, resource)? {
            return Ok(());
        }

        let error = if !ctx.is_authenticated() {
            Error::unauthenticated("credentials required")
        } else if action == Action::Read
            || !self.is_allowed(ctx, Action::Read, resource)?
        {
            resource.not_found()
        } else {
            Error::Forbidden
        };
        debug!(ctx.log, "authorization denied";
            "action" => %action,
            "resource" => ?resource,
            "error" => %error,
        );
        Err(error)
    }

    /// Returns the filter describing which resources of `resource_type`
    /// `ctx` may list
    pub fn visibility_predicate(
        &self,
        ctx: &RoleContext,
        resource_type: ResourceType,
    ) -> Result<Filter, Error> {
        Ok(self.policy_for(resource_type)?.visibility_for(ctx))
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Organization quota policies
//!
//! These decide whether an organization has room for a new resource, given
//! its quota definition and what it already uses.  They are consulted only on
//! creation, after access has been granted, and know nothing about roles.
//!
//! None of them reserve anything.  Two requests can both be told there is
//! room for the last route; enforcing the real limit at insert time is up to
//! the persistence layer.

mod max_routes;
mod memory;
mod service_instances;

pub use max_routes::routes_fit;
pub use max_routes::validate_route_create;
pub use max_routes::MaxRoutesPolicy;
pub use memory::memory_remaining;
pub use memory::MaxMemoryPolicy;
pub use service_instances::validate_service_instance_create;
pub use service_instances::MaxServiceInstancesPolicy;
pub use service_instances::ServiceQuotaViolation;

use async_trait::async_trait;
use controller_common::api::external::Error;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::QuotaDefinitionUuid;
use serde::Deserialize;
use serde::Serialize;

/// Value of a count limit meaning "no limit"
pub const UNLIMITED: i64 = -1;

/// The limits an organization is subject to
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct QuotaDefinition {
    pub id: QuotaDefinitionUuid,
    pub name: String,
    /// whether service plans that are not free may be used at all
    pub non_basic_services_allowed: bool,
    /// maximum number of service instances, or [`UNLIMITED`]
    pub total_services: i64,
    /// maximum number of routes, or [`UNLIMITED`]
    pub total_routes: i64,
    /// MiB of memory, summed over every instance of every app
    pub memory_limit: i64,
}

/// Memory footprint of one app
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppUsage {
    /// MiB per instance
    pub memory: u64,
    pub instances: u64,
}

/// Source of an organization's current aggregates (the persistence layer)
#[async_trait]
pub trait OrganizationUsage: Send + Sync {
    /// Number of routes across every space of the organization
    async fn route_count(
        &self,
        organization_id: OrganizationUuid,
    ) -> Result<u64, Error>;

    /// Every app across every space of the organization
    async fn app_usage(
        &self,
        organization_id: OrganizationUuid,
    ) -> Result<Vec<AppUsage>, Error>;

    /// Number of managed service instances across every space of the
    /// organization
    async fn service_instance_count(
        &self,
        organization_id: OrganizationUuid,
    ) -> Result<u64, Error>;
}

#[cfg(test)]
pub(crate) fn test_quota(
    total_routes: i64,
    total_services: i64,
    memory_limit: i64,
) -> QuotaDefinition {
    QuotaDefinition {
        id: QuotaDefinitionUuid::new_v4(),
        name: "test".to_string(),
        non_basic_services_allowed: true,
        total_services,
        total_routes,
        memory_limit,
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::OrganizationUsage;
use super::QuotaDefinition;
use super::UNLIMITED;
use controller_common::api::external::validation::ValidationErrors;
use controller_common::api::external::validation::ValidationReason;
use controller_common::api::external::Error;
use controller_common::typed_uuid::OrganizationUuid;

/// Decides whether an organization may create more routes
pub struct MaxRoutesPolicy<'a> {
    organization_id: OrganizationUuid,
    quota: &'a QuotaDefinition,
    usage: &'a dyn OrganizationUsage,
}

impl<'a> MaxRoutesPolicy<'a> {
    pub fn new(
        organization_id: OrganizationUuid,
        quota: &'a QuotaDefinition,
        usage: &'a dyn OrganizationUsage,
    ) -> MaxRoutesPolicy<'a> {
        MaxRoutesPolicy { organization_id, quota, usage }
    }

    /// Returns whether `requested` more routes fit in the quota
    ///
    /// Routes are not counted at all when the quota is unlimited.
    pub async fn allow_more_routes(&self, requested: u64) -> Result<bool, Error> {
        if self.quota.total_routes == UNLIMITED {
            return Ok(true);
        }

        let existing = self.usage.route_count(self.organization_id).await?;
        Ok(routes_fit(self.quota.total_routes, existing, requested))
    }
}

/// Returns whether `existing + requested` routes fit under `total_routes`
pub fn routes_fit(total_routes: i64, existing: u64, requested: u64) -> bool {
    if total_routes == UNLIMITED {
        return true;
    }
    let Ok(limit) = u64::try_from(total_routes) else {
        return false;
    };
    existing.checked_add(requested).is_some_and(|needed| needed <= limit)
}

/// Validates the creation of one route, recording
/// `organization: total_routes_exceeded` if there's no room for it
///
/// Existing routes are never re-checked against the quota, so this has no
/// counterpart for updates.
pub async fn validate_route_create(
    policy: &MaxRoutesPolicy<'_>,
    errors: &mut ValidationErrors,
) -> Result<(), Error> {
    if !policy.allow_more_routes(1).await? {
        errors.add("organization", ValidationReason::TotalRoutesExceeded);
    }
    Ok(())
}

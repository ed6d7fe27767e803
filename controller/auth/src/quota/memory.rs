// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::AppUsage;
use super::OrganizationUsage;
use super::QuotaDefinition;
use controller_common::api::external::Error;
use controller_common::typed_uuid::OrganizationUuid;

/// Decides whether an organization has memory left for more app instances
pub struct MaxMemoryPolicy<'a> {
    organization_id: OrganizationUuid,
    quota: &'a QuotaDefinition,
    usage: &'a dyn OrganizationUsage,
}

impl<'a> MaxMemoryPolicy<'a> {
    pub fn new(
        organization_id: OrganizationUuid,
        quota: &'a QuotaDefinition,
        usage: &'a dyn OrganizationUsage,
    ) -> MaxMemoryPolicy<'a> {
        MaxMemoryPolicy { organization_id, quota, usage }
    }

    /// MiB not yet claimed by any app instance (negative once over quota)
    pub async fn memory_remaining(&self) -> Result<i64, Error> {
        let apps = self.usage.app_usage(self.organization_id).await?;
        Ok(memory_remaining(self.quota.memory_limit, &apps))
    }

    /// Returns whether `requested` more MiB fit in the quota
    pub async fn allow_more_memory(&self, requested: u64) -> Result<bool, Error> {
        let remaining = self.memory_remaining().await?;
        Ok(i64::try_from(requested).is_ok_and(|requested| remaining >= requested))
    }
}

/// Returns `memory_limit` minus the memory of every instance of every app
pub fn memory_remaining(memory_limit: i64, apps: &[AppUsage]) -> i64 {
    let used = apps.iter().fold(0i64, |total, app| {
        let footprint = i64::try_from(app.memory.saturating_mul(app.instances))
            .unwrap_or(i64::MAX);
        total.saturating_add(footprint)
    });
    memory_limit.saturating_sub(used)
}

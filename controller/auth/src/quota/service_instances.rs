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

/// Why an organization may not create another service instance
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ServiceQuotaViolation {
    #[error("organization has reached its free service limit")]
    FreeQuotaExceeded,
    #[error("organization may not use any more paid services")]
    PaidQuotaExceeded,
}

impl ServiceQuotaViolation {
    pub fn reason(&self) -> ValidationReason {
        match self {
            ServiceQuotaViolation::FreeQuotaExceeded => {
                ValidationReason::FreeQuotaExceeded
            }
            ServiceQuotaViolation::PaidQuotaExceeded => {
                ValidationReason::PaidQuotaExceeded
            }
        }
    }
}

/// Decides whether an organization may create another managed service
/// instance
pub struct MaxServiceInstancesPolicy<'a> {
    organization_id: OrganizationUuid,
    quota: &'a QuotaDefinition,
    usage: &'a dyn OrganizationUsage,
}

impl<'a> MaxServiceInstancesPolicy<'a> {
    pub fn new(
        organization_id: OrganizationUuid,
        quota: &'a QuotaDefinition,
        usage: &'a dyn OrganizationUsage,
    ) -> MaxServiceInstancesPolicy<'a> {
        MaxServiceInstancesPolicy { organization_id, quota, usage }
    }

    /// Checks one more instance of a plan that is free or not
    ///
    /// A paid plan is refused outright when the quota doesn't allow paid
    /// services.  Otherwise the instance count is checked, unless unlimited.
    pub async fn check(
        &self,
        plan_is_free: bool,
    ) -> Result<Option<ServiceQuotaViolation>, Error> {
        if !plan_is_free && !self.quota.non_basic_services_allowed {
            return Ok(Some(ServiceQuotaViolation::PaidQuotaExceeded));
        }

        if self.quota.total_services == UNLIMITED {
            return Ok(None);
        }

        let existing =
            self.usage.service_instance_count(self.organization_id).await?;
        let fits = u64::try_from(self.quota.total_services)
            .is_ok_and(|limit| existing < limit);
        if fits {
            Ok(None)
        } else if plan_is_free {
            Ok(Some(ServiceQuotaViolation::FreeQuotaExceeded))
        } else {
            Ok(Some(ServiceQuotaViolation::PaidQuotaExceeded))
        }
    }
}

/// Validates the creation of one managed service instance, recording the
/// quota violation (if any) against `org`
pub async fn validate_service_instance_create(
    policy: &MaxServiceInstancesPolicy<'_>,
    plan_is_free: bool,
    errors: &mut ValidationErrors,
) -> Result<(), Error> {
    if let Some(violation) = policy.check(plan_is_free).await? {
        errors.add("org", violation.reason());
    }
    Ok(())
}

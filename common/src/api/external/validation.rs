// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of model validation failures into stable API errors
//!
//! The persistence layer reports what went wrong with a record as a set of
//! reasons per field (or per group of fields, for uniqueness constraints that
//! span columns).  Each resource kind maps those onto a small set of error
//! kinds.  The mapping is part of the API: clients branch on the codes, so a
//! duplicate name and an exhausted quota must never collapse into the same one.

use super::Error;
use super::ResourceType;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

/// Why a field (or group of fields) failed validation
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValidationReason {
    Unique,
    Presence,
    Format,
    MaxLength,
    NotAuthorized,
    FreeQuotaExceeded,
    TrialQuotaExceeded,
    PaidQuotaExceeded,
    TotalRoutesExceeded,
}

/// The columns a validation failure is attached to
///
/// Most failures are about one column.  Uniqueness constraints over several
/// columns (e.g., a service instance name within a space) name all of them.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Field(Vec<String>);

impl Field {
    pub fn new<I, S>(columns: I) -> Field
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Field(columns.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Field {
    fn from(column: &str) -> Self {
        Field(vec![column.to_owned()])
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" and "))
    }
}

/// Every validation failure found on one record
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, BTreeSet<ValidationReason>>,
}

impl ValidationErrors {
    pub fn new() -> ValidationErrors {
        ValidationErrors::default()
    }

    pub fn add(&mut self, field: impl Into<Field>, reason: ValidationReason) {
        self.errors.entry(field.into()).or_default().insert(reason);
    }

    pub fn with(
        mut self,
        field: impl Into<Field>,
        reason: ValidationReason,
    ) -> ValidationErrors {
        self.add(field, reason);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the reasons recorded against `field`, if any
    pub fn on(&self, field: impl Into<Field>) -> Option<&BTreeSet<ValidationReason>> {
        self.errors.get(&field.into())
    }

    fn on_includes(
        &self,
        field: impl Into<Field>,
        reason: ValidationReason,
    ) -> bool {
        self.on(field).map_or(false, |reasons| reasons.contains(&reason))
    }

    /// Human-readable description of every failure, in a stable order
    pub fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(field, reasons)| {
                reasons.iter().map(move |reason| format!("{} {}", field, reason))
            })
            .collect()
    }
}

/// Stable, client-visible error kinds produced by validation translation
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Serialize,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ApiErrorKind {
    NotAuthorized,
    OrganizationInvalid,
    OrganizationNameTaken,
    OrganizationTotalRoutesExceeded,
    RouteHostTaken,
    RouteInvalid,
    ServiceInstanceFreeQuotaExceeded,
    ServiceInstanceInvalid,
    ServiceInstanceNameInvalid,
    ServiceInstanceNameTaken,
    ServiceInstanceNameTooLong,
    ServiceInstancePaidQuotaExceeded,
    ServiceInstanceServicePlanNotAllowed,
    ServicePlanInvalid,
    ServicePlanNameTaken,
    ServicePlanVisibilityAlreadyExists,
    ServicePlanVisibilityInvalid,
    SpaceInvalid,
    SpaceNameTaken,
}

impl ApiErrorKind {
    /// Numeric code reported to clients.  These never change once assigned.
    pub fn code(&self) -> u32 {
        match self {
            ApiErrorKind::NotAuthorized => 10003,
            ApiErrorKind::OrganizationInvalid => 30001,
            ApiErrorKind::OrganizationNameTaken => 30002,
            ApiErrorKind::OrganizationTotalRoutesExceeded => 30003,
            ApiErrorKind::SpaceInvalid => 40001,
            ApiErrorKind::SpaceNameTaken => 40002,
            ApiErrorKind::ServiceInstanceNameTaken => 60002,
            ApiErrorKind::ServiceInstanceInvalid => 60003,
            ApiErrorKind::ServiceInstanceFreeQuotaExceeded => 60005,
            ApiErrorKind::ServiceInstancePaidQuotaExceeded => 60007,
            ApiErrorKind::ServiceInstanceServicePlanNotAllowed => 60008,
            ApiErrorKind::ServiceInstanceNameTooLong => 60009,
            ApiErrorKind::ServiceInstanceNameInvalid => 60010,
            ApiErrorKind::ServicePlanInvalid => 110001,
            ApiErrorKind::ServicePlanNameTaken => 110002,
            ApiErrorKind::ServicePlanVisibilityInvalid => 260001,
            ApiErrorKind::ServicePlanVisibilityAlreadyExists => 260002,
            ApiErrorKind::RouteInvalid => 210001,
            ApiErrorKind::RouteHostTaken => 210003,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// A translated validation failure, ready to be reported to the client
#[derive(Clone, Debug, Eq, PartialEq, Serialize, thiserror::Error)]
#[error("{} ({}): {message}", .kind.name(), .kind.code())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> ApiError {
        ApiError { kind, message: message.into() }
    }

    fn invalid(kind: ApiErrorKind, errors: &ValidationErrors) -> ApiError {
        ApiError::new(kind, errors.full_messages().join(", "))
    }
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        use ApiErrorKind::*;
        match error.kind {
            NotAuthorized => Error::Forbidden,
            OrganizationNameTaken => Error::ObjectAlreadyExists {
                type_name: ResourceType::Organization,
                object_name: error.message,
            },
            SpaceNameTaken => Error::ObjectAlreadyExists {
                type_name: ResourceType::Space,
                object_name: error.message,
            },
            RouteHostTaken => Error::ObjectAlreadyExists {
                type_name: ResourceType::Route,
                object_name: error.message,
            },
            ServiceInstanceNameTaken => Error::ObjectAlreadyExists {
                type_name: ResourceType::ServiceInstance,
                object_name: error.message,
            },
            ServicePlanNameTaken => Error::ObjectAlreadyExists {
                type_name: ResourceType::ServicePlan,
                object_name: error.message,
            },
            ServicePlanVisibilityAlreadyExists => Error::ObjectAlreadyExists {
                type_name: ResourceType::ServicePlanVisibility,
                object_name: error.message,
            },
            OrganizationTotalRoutesExceeded => Error::QuotaExceeded {
                type_name: ResourceType::Route,
                message: error.to_string(),
            },
            ServiceInstanceFreeQuotaExceeded
            | ServiceInstancePaidQuotaExceeded => Error::QuotaExceeded {
                type_name: ResourceType::ServiceInstance,
                message: error.to_string(),
            },
            OrganizationInvalid
            | RouteInvalid
            | ServiceInstanceInvalid
            | ServiceInstanceNameInvalid
            | ServiceInstanceNameTooLong
            | ServiceInstanceServicePlanNotAllowed
            | ServicePlanInvalid
            | ServicePlanVisibilityInvalid
            | SpaceInvalid => Error::invalid_request(error.to_string()),
        }
    }
}

/// Attributes from the create/update request that some translations quote
/// back to the client
#[derive(Clone, Debug, Default)]
pub struct RequestAttributes {
    pub name: Option<String>,
    pub host: Option<String>,
    pub quota_definition_id: Option<String>,
    pub service_id: Option<String>,
}

impl RequestAttributes {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Translate the validation failures of a record of kind `resource_type` into
/// the error reported to the client
///
/// Kinds without a dedicated mapping report `InvalidRequest` with every
/// message.
pub fn translate_validation_errors(
    resource_type: ResourceType,
    errors: &ValidationErrors,
    attributes: &RequestAttributes,
) -> Error {
    match translate_for_kind(resource_type, errors, attributes) {
        Some(error) => Error::from(error),
        None => Error::invalid_request(errors.full_messages().join(", ")),
    }
}

fn translate_for_kind(
    resource_type: ResourceType,
    errors: &ValidationErrors,
    attributes: &RequestAttributes,
) -> Option<ApiError> {
    use ValidationReason::*;
    let error = match resource_type {
        ResourceType::Organization => {
            if errors.on_includes("quota_definition_id", NotAuthorized) {
                ApiError::new(
                    ApiErrorKind::NotAuthorized,
                    attributes.quota_definition_id.clone().unwrap_or_default(),
                )
            } else if errors.on_includes("name", Unique) {
                ApiError::new(
                    ApiErrorKind::OrganizationNameTaken,
                    attributes.name(),
                )
            } else {
                ApiError::invalid(ApiErrorKind::OrganizationInvalid, errors)
            }
        }

        ResourceType::Space => {
            if errors.on_includes(Field::new(["organization_id", "name"]), Unique)
            {
                ApiError::new(ApiErrorKind::SpaceNameTaken, attributes.name())
            } else {
                ApiError::invalid(ApiErrorKind::SpaceInvalid, errors)
            }
        }

        ResourceType::ServiceInstance => {
            translate_service_instance(errors, attributes)
        }

        ResourceType::UserProvidedServiceInstance => {
            if errors.on_includes(Field::new(["space_id", "name"]), Unique) {
                ApiError::new(
                    ApiErrorKind::ServiceInstanceNameTaken,
                    attributes.name(),
                )
            } else {
                ApiError::invalid(ApiErrorKind::ServiceInstanceInvalid, errors)
            }
        }

        ResourceType::ServicePlan => {
            if errors.on_includes(Field::new(["service_id", "name"]), Unique) {
                ApiError::new(
                    ApiErrorKind::ServicePlanNameTaken,
                    format!(
                        "{}-{}",
                        attributes.service_id.as_deref().unwrap_or(""),
                        attributes.name()
                    ),
                )
            } else {
                ApiError::invalid(ApiErrorKind::ServicePlanInvalid, errors)
            }
        }

        ResourceType::ServicePlanVisibility => {
            if errors.on_includes(
                Field::new(["organization_id", "service_plan_id"]),
                Unique,
            ) {
                ApiError::invalid(
                    ApiErrorKind::ServicePlanVisibilityAlreadyExists,
                    errors,
                )
            } else {
                ApiError::invalid(
                    ApiErrorKind::ServicePlanVisibilityInvalid,
                    errors,
                )
            }
        }

        ResourceType::Route => {
            if errors.on_includes("organization", TotalRoutesExceeded) {
                ApiError::new(
                    ApiErrorKind::OrganizationTotalRoutesExceeded,
                    "organization has reached its route limit",
                )
            } else if errors.on_includes(Field::new(["host", "domain_id"]), Unique)
            {
                ApiError::new(
                    ApiErrorKind::RouteHostTaken,
                    attributes.host.clone().unwrap_or_default(),
                )
            } else {
                ApiError::invalid(ApiErrorKind::RouteInvalid, errors)
            }
        }

        ResourceType::App
        | ResourceType::BillingEvent
        | ResourceType::Domain
        | ResourceType::Event
        | ResourceType::QuotaDefinition
        | ResourceType::Service
        | ResourceType::ServiceBinding
        | ResourceType::User => return None,
    };

    Some(error)
}

fn translate_service_instance(
    errors: &ValidationErrors,
    attributes: &RequestAttributes,
) -> ApiError {
    use ValidationReason::*;
    if errors.on_includes(Field::new(["space_id", "name"]), Unique) {
        return ApiError::new(
            ApiErrorKind::ServiceInstanceNameTaken,
            attributes.name(),
        );
    }

    if let Some(quota_errors) = errors.on("org") {
        return if quota_errors.contains(&FreeQuotaExceeded)
            || quota_errors.contains(&TrialQuotaExceeded)
        {
            ApiError::new(
                ApiErrorKind::ServiceInstanceFreeQuotaExceeded,
                "organization has reached its free service limit",
            )
        } else if quota_errors.contains(&PaidQuotaExceeded) {
            ApiError::new(
                ApiErrorKind::ServiceInstancePaidQuotaExceeded,
                "organization has reached its paid service limit",
            )
        } else {
            ApiError::invalid(ApiErrorKind::ServiceInstanceInvalid, errors)
        };
    }

    if errors.on("service_plan").is_some() {
        return ApiError::new(
            ApiErrorKind::ServiceInstanceServicePlanNotAllowed,
            "service plan is not allowed for this organization",
        );
    }

    if let Some(name_errors) = errors.on("name") {
        return if name_errors.contains(&MaxLength) {
            ApiError::new(
                ApiErrorKind::ServiceInstanceNameTooLong,
                "service instance name is too long",
            )
        } else {
            ApiError::new(
                ApiErrorKind::ServiceInstanceNameInvalid,
                attributes.name(),
            )
        };
    }

    ApiError::invalid(ApiErrorKind::ServiceInstanceInvalid, errors)
}

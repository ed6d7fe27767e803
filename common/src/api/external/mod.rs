// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data structures and related facilities for representing resources in the
//! API
//!
//! This includes all representations over the wire for both the external and
//! internal APIs.  The contents here are all HTTP-agnostic.

mod error;
pub mod validation;

pub use error::*;

use serde::Deserialize;
use serde::Serialize;

/// Identifies a type of API resource
///
/// The snake_case form (see `Display`) is what appears in logs, in error
/// messages, and in the `authz.required_resource_types` configuration.
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
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceType {
    App,
    BillingEvent,
    Domain,
    Event,
    Organization,
    QuotaDefinition,
    Route,
    Service,
    ServiceBinding,
    ServiceInstance,
    ServicePlan,
    ServicePlanVisibility,
    Space,
    User,
    UserProvidedServiceInstance,
}

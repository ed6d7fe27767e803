// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visibility filters
//!
//! Listing a collection never checks `read` on each row.  Instead, each
//! policy describes the rows an actor may see as a [`Filter`]: an AND/OR tree
//! over role-membership conditions that the persistence layer compiles into
//! its query.  [`Filter::matches`] evaluates the same tree against a single
//! resource in memory; policies use it to decide `read`, which keeps `read`
//! and listing in agreement.

use super::api_resources::ApiResource;
use super::roles::Memberships;
use super::roles::OrganizationRole;
use super::roles::SpaceRole;
use controller_common::typed_uuid::UserUuid;
use serde::Serialize;

/// A single test applied to a resource row
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Condition {
    /// `user_id` holds `role` on the resource's organization
    OrganizationRole { user_id: UserUuid, role: OrganizationRole },
    /// `user_id` holds `role` on the resource's space
    SpaceRole { user_id: UserUuid, role: SpaceRole },
    /// the resource belongs to the system rather than an organization
    SystemOwned,
}

impl Condition {
    pub fn matches<R>(&self, resource: &R, memberships: &dyn Memberships) -> bool
    where
        R: ApiResource + ?Sized,
    {
        match self {
            Condition::OrganizationRole { user_id, role } => resource
                .organization_id()
                .is_some_and(|organization_id| {
                    memberships.has_organization_role(
                        *user_id,
                        organization_id,
                        *role,
                    )
                }),
            Condition::SpaceRole { user_id, role } => {
                resource.space_id().is_some_and(|space_id| {
                    memberships.has_space_role(*user_id, space_id, *role)
                })
            }
            Condition::SystemOwned => resource.is_system_owned(),
        }
    }
}

/// Declarative description of which resources of one kind an actor may see
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Filter {
    /// every row
    All,
    /// no rows
    Nothing,
    Condition(Condition),
    /// rows matching any of the filters (none if empty)
    Or(Vec<Filter>),
    /// rows matching all of the filters (every row if empty)
    And(Vec<Filter>),
}

impl Filter {
    /// Returns a filter matching rows that meet any of `conditions`
    pub fn any_of<I>(conditions: I) -> Filter
    where
        I: IntoIterator<Item = Condition>,
    {
        Filter::Or(conditions.into_iter().map(Filter::Condition).collect())
            .simplify()
    }

    /// Returns a filter matching rows where `user_id` holds any of `roles` on
    /// the row's space
    pub fn space_roles(user_id: UserUuid, roles: &[SpaceRole]) -> Filter {
        Filter::any_of(
            roles
                .iter()
                .map(|role| Condition::SpaceRole { user_id, role: *role }),
        )
    }

    /// Returns a filter matching rows where `user_id` holds any of `roles` on
    /// the row's organization
    pub fn organization_roles(
        user_id: UserUuid,
        roles: &[OrganizationRole],
    ) -> Filter {
        Filter::any_of(roles.iter().map(|role| Condition::OrganizationRole {
            user_id,
            role: *role,
        }))
    }

    /// Returns a filter matching rows that match `self` or `other`
    pub fn or(self, other: Filter) -> Filter {
        Filter::Or(vec![self, other]).simplify()
    }

    /// Returns a filter matching rows that match both `self` and `other`
    pub fn and(self, other: Filter) -> Filter {
        Filter::And(vec![self, other]).simplify()
    }

    /// Flattens nested operators of the same kind and folds away constants
    ///
    /// The result matches exactly the same rows.
    pub fn simplify(self) -> Filter {
        match self {
            Filter::Or(filters) => {
                let mut flat = Vec::new();
                for filter in filters.into_iter().map(Filter::simplify) {
                    match filter {
                        Filter::All => return Filter::All,
                        Filter::Nothing => (),
                        Filter::Or(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                collapse(flat, Filter::Nothing, Filter::Or)
            }
            Filter::And(filters) => {
                let mut flat = Vec::new();
                for filter in filters.into_iter().map(Filter::simplify) {
                    match filter {
                        Filter::Nothing => return Filter::Nothing,
                        Filter::All => (),
                        Filter::And(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                collapse(flat, Filter::All, Filter::And)
            }
            other => other,
        }
    }

    /// Evaluates this filter against one resource
    pub fn matches<R>(&self, resource: &R, memberships: &dyn Memberships) -> bool
    where
        R: ApiResource + ?Sized,
    {
        match self {
            Filter::All => true,
            Filter::Nothing => false,
            Filter::Condition(condition) => {
                condition.matches(resource, memberships)
            }
            Filter::Or(filters) => {
                filters.iter().any(|f| f.matches(resource, memberships))
            }
            Filter::And(filters) => {
                filters.iter().all(|f| f.matches(resource, memberships))
            }
        }
    }
}

fn collapse(
    mut filters: Vec<Filter>,
    empty: Filter,
    combine: fn(Vec<Filter>) -> Filter,
) -> Filter {
    match filters.len() {
        0 => empty,
        1 => filters.remove(0),
        _ => combine(filters),
    }
}

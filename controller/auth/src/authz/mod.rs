// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Authorization subsystem
//!
//! ## Authorization basics
//!
//! An *actor* can perform an *action* on a *resource* if the *policy* for that
//! resource's kind says so, given the *roles* the actor holds.  Let's unpack
//! that.
//!
//! - **actor** is a user, identified by the transport before we get here, or
//!   nobody at all (an anonymous caller).  Some users are global
//!   administrators.
//! - **resource** is an API resource: an organization, a space, or something
//!   that lives in a space, like an app.  See [`AnyResource`] for the full
//!   list.
//! - **action** is one of create, read, update or delete ([`Action`]).
//! - **role** is a membership on an organization (manager, auditor, billing
//!   manager, member) or on a space (developer, manager, auditor).
//!
//! Roles do not flow down the hierarchy.  Managing an organization does not
//! make someone a developer of its spaces, and plain membership in an
//! organization grants nothing by itself.
//!
//! ## Making a decision
//!
//! Each resource kind has an [`AccessPolicy`].  Every policy applies the same
//! steps in the same order:
//!
//! 1. An administrator may do anything.
//! 2. An anonymous actor may do nothing.  The one exception is reading a
//!    shared domain, which a policy expresses by answering before this step.
//! 3. The kind's own rule, if it has one for this action.
//! 4. Otherwise, [`BaseAccess`]: mutations are denied and `read` is granted
//!    exactly when the resource matches the kind's visibility filter.
//!
//! Policies are pure functions of a [`RoleContext`] and a resource.  The
//! `RoleContext` holds a snapshot of the actor's roles, loaded up front (see
//! [`load_roles_for_resource()`]), so a decision never does I/O and never changes between
//! two evaluations.
//!
//! Resources carry their parents as `Option`s.  A parent that was deleted
//! (say, the space an event was recorded against) is `None`, and every role
//! check through it is false.  This can only ever deny access.
//!
//! ## Listing
//!
//! Enumerating a collection doesn't check `read` on every row.  Instead each
//! policy produces a [`Filter`] for the actor, which the persistence layer
//! turns into a query.  Because [`BaseAccess`] derives `read` from the same
//! filter, anything hidden from a listing is also unreadable by id.
//!
//! ## Reporting denials
//!
//! [`Authz`] holds one policy per kind and is built at startup; it refuses to
//! start if a required kind has no policy.  [`Authz::authorize()`] turns a
//! denial into an error for the caller.  An actor who cannot read a resource
//! is told that it does not exist, rather than that they may not touch it.

mod access;
pub use access::*;

mod api_resources;
pub use api_resources::*;

mod context;
pub use context::RoleContext;

mod policy;
pub use policy::AccessPolicy;
pub use policy::Action;
pub use policy::BaseAccess;
pub use policy::DynPolicy;

mod registry;
pub use registry::default_policies;
pub use registry::Authz;
pub use registry::AUTHORIZED_RESOURCE_TYPES;

mod roles;
pub use roles::load_roles_for_resource;
pub use roles::Memberships;
pub use roles::OrganizationRole;
pub use roles::RoleSet;
pub use roles::RoleStore;
pub use roles::SpaceRole;

mod visibility;
pub use visibility::Condition;
pub use visibility::Filter;

#[cfg(test)]
mod policy_test;

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authorization and visibility engine for the cloud controller
//!
//! - [`authn`] describes who is making a request.
//! - [`authz`] decides what they may do to which resources and which
//!   resources they may list at all.
//! - [`quota`] holds the invariant policies consulted when a resource is
//!   created, independently of role-based authorization.

pub mod authn;
pub mod authz;
pub mod quota;

#[cfg(test)]
mod fakes;

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cloud controller common facilities
//!
//! Types shared by the authorization engine, the quota policies, and the
//! transport and persistence layers that call into them: typed identifiers,
//! resource kinds, the external error type (plus the stable translation of
//! validation failures into it), and configuration.

pub mod api;
pub mod config;
pub mod typed_uuid;

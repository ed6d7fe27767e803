// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authentication facilities
//!
//! Verifying credentials is somebody else's job.  By the time a request gets
//! here, the transport has already decided who the caller is (or that it
//! could not tell), and hands us an [`authn::Context`](Context) describing
//! that.

use controller_common::typed_uuid::UserUuid;
use serde::Deserialize;
use serde::Serialize;

/// Describes how the actor performing the current operation is authenticated
///
/// This is the input to authorization checks.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Context {
    kind: Kind,
}

impl Context {
    /// Returns the authenticated actor if present, `None` otherwise
    pub fn actor(&self) -> Option<&Actor> {
        match &self.kind {
            Kind::Unauthenticated => None,
            Kind::Authenticated(Details { actor, .. }) => Some(actor),
        }
    }

    /// Returns whether the actor holds the global administrator role
    ///
    /// Unauthenticated callers are never administrators.
    pub fn is_admin(&self) -> bool {
        match &self.kind {
            Kind::Unauthenticated => false,
            Kind::Authenticated(Details { is_admin, .. }) => *is_admin,
        }
    }

    /// Returns a context for an anonymous caller
    pub fn unauthenticated() -> Context {
        Context { kind: Kind::Unauthenticated }
    }

    /// Returns an authenticated context for an ordinary user
    pub fn for_user(user_id: UserUuid) -> Context {
        Context {
            kind: Kind::Authenticated(Details {
                actor: Actor { user_id },
                is_admin: false,
            }),
        }
    }

    /// Returns an authenticated context for a user holding the global
    /// administrator role
    pub fn for_admin(user_id: UserUuid) -> Context {
        Context {
            kind: Kind::Authenticated(Details {
                actor: Actor { user_id },
                is_admin: true,
            }),
        }
    }
}

/// Describes whether the user is authenticated and provides more information
/// that's specific to whether they're authenticated or not
#[derive(Clone, Debug, Deserialize, Serialize)]
enum Kind {
    /// Client did not attempt to authenticate
    Unauthenticated,
    /// Client successfully authenticated
    Authenticated(Details),
}

/// Describes the actor that was authenticated
#[derive(Clone, Debug, Deserialize, Serialize)]
struct Details {
    actor: Actor,
    is_admin: bool,
}

/// Who is performing an operation
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Actor {
    pub user_id: UserUuid,
}

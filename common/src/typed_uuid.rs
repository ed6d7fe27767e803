// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed UUIDs for controller records

use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// A UUID with type-level information about what it identifies.
///
/// Organizations, spaces, users and every leaf resource are all identified by
/// UUIDs.  If they're all the same type it's easy to check a space role
/// against an organization id.  The marker type makes that a compile error.
#[derive_where(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypedUuid<T: TypedUuidKind> {
    uuid: Uuid,
    #[serde(skip)]
    _phantom: std::marker::PhantomData<T>,
}

impl<T: TypedUuidKind> TypedUuid<T> {
    /// Creates a new UUID of this type.
    #[inline]
    pub fn new_v4() -> Self {
        Self { uuid: Uuid::new_v4(), _phantom: std::marker::PhantomData }
    }

    /// Create a new `TypedUuid` from an untyped [`Uuid`].
    ///
    /// It is the caller's responsibility to ensure that the UUID is of the
    /// correct type.
    #[inline]
    pub fn from_untyped(uuid: Uuid) -> Self {
        Self { uuid, _phantom: std::marker::PhantomData }
    }

    #[inline]
    pub fn as_untyped_uuid(&self) -> &Uuid {
        &self.uuid
    }
}

impl<T: TypedUuidKind> fmt::Debug for TypedUuid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.uuid, T::tag())
    }
}

impl<T: TypedUuidKind> fmt::Display for TypedUuid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uuid, f)
    }
}

impl<T: TypedUuidKind> FromStr for TypedUuid<T> {
    type Err = TypedUuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|error| TypedUuidParseError { error, tag: T::tag() })?;
        Ok(Self::from_untyped(uuid))
    }
}

/// Represents marker types that can be used as a type parameter for
/// [`TypedUuid`].
pub trait TypedUuidKind: Send + Sync + 'static {
    /// Returns the corresponding tag for this kind.
    ///
    /// The tag forms a runtime representation of this type-level value.
    fn tag() -> TypedUuidTag;
}

/// Describes what kind of [`TypedUuid`] something is.
///
/// This is the runtime equivalent of [`TypedUuidKind`].
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum TypedUuidTag {
    App,
    Domain,
    Event,
    Organization,
    QuotaDefinition,
    Route,
    Service,
    ServiceBinding,
    ServiceInstance,
    ServicePlan,
    Space,
    User,
}

macro_rules! impl_typed_uuid_kind {
    ($($kind:ident => $tag:ident => $alias:ident),* $(,)?) => {
        $(
            #[derive(Debug)]
            pub enum $kind {}

            impl TypedUuidKind for $kind {
                #[inline]
                fn tag() -> TypedUuidTag {
                    TypedUuidTag::$tag
                }
            }

            pub type $alias = TypedUuid<$kind>;
        )*
    };
}

impl_typed_uuid_kind! {
    AppKind => App => AppUuid,
    DomainKind => Domain => DomainUuid,
    EventKind => Event => EventUuid,
    OrganizationKind => Organization => OrganizationUuid,
    QuotaDefinitionKind => QuotaDefinition => QuotaDefinitionUuid,
    RouteKind => Route => RouteUuid,
    ServiceKind => Service => ServiceUuid,
    ServiceBindingKind => ServiceBinding => ServiceBindingUuid,
    ServiceInstanceKind => ServiceInstance => ServiceInstanceUuid,
    ServicePlanKind => ServicePlan => ServicePlanUuid,
    SpaceKind => Space => SpaceUuid,
    UserKind => User => UserUuid,
}

#[derive(Error, Debug)]
#[error("error parsing uuid for {tag}")]
pub struct TypedUuidParseError {
    #[source]
    pub(crate) error: uuid::Error,
    pub(crate) tag: TypedUuidTag,
}

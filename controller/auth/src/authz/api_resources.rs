// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authz-related types for API resources
//!
//! Each resource that authorization can be checked against has a type here.
//! These are not database models: they carry only what an access decision
//! needs, namely the resource's own id, how it was looked up (for the
//! not-found error) and its position in the hierarchy
//! `Organization -> Space -> leaf`.
//!
//! Parents are modeled as `Option`.  Whoever resolves a resource fills in the
//! parents once, before asking for a decision; a parent that has been deleted
//! is `None`.  Every role check that would have gone through a missing parent
//! is simply false.
//!
//! The types here are mostly one of a handful of shapes:
//!
//! - [`Organization`] and [`Service`] are roots.
//! - [`Space`] belongs to an [`Organization`].
//! - [`App`] and [`Event`] belong to a [`Space`].
//! - [`ServiceBinding`] ties an [`App`] to a service instance, which lives in
//!   a space of its own.  Only the app's space matters for access.
//! - [`Domain`] is either shared by the whole system or private to one
//!   organization.

use controller_common::api::external::Error;
use controller_common::api::external::LookupType;
use controller_common::api::external::ResourceType;
use controller_common::typed_uuid::AppUuid;
use controller_common::typed_uuid::DomainUuid;
use controller_common::typed_uuid::EventUuid;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::ServiceBindingUuid;
use controller_common::typed_uuid::ServiceUuid;
use controller_common::typed_uuid::SpaceUuid;
use std::fmt;

/// Describes an authz resource that corresponds to an API resource
pub trait ApiResource: fmt::Debug + Send + Sync {
    fn resource_type(&self) -> ResourceType;

    fn lookup_type(&self) -> &LookupType;

    /// The organization whose roles can govern access to this resource
    ///
    /// For an [`Organization`], this is the organization itself.  `None`
    /// means the resource has no owning organization or that it was deleted.
    fn organization_id(&self) -> Option<OrganizationUuid>;

    /// The space whose roles can govern access to this resource
    ///
    /// For a [`Space`], this is the space itself.  `None` means the resource
    /// is not space-scoped or that its space was deleted.
    fn space_id(&self) -> Option<SpaceUuid>;

    /// Returns true for resources that belong to the system rather than to
    /// any organization (currently only shared domains)
    fn is_system_owned(&self) -> bool {
        false
    }

    /// Returns an error as though this resource were not found, suitable for
    /// use when an actor should not be able to see that this resource exists
    fn not_found(&self) -> Error {
        self.lookup_type().clone().into_not_found(self.resource_type())
    }
}

/// An [`ApiResource`] of one statically-known kind
///
/// This is what lets a policy written against one concrete type be stored in
/// a registry keyed by [`ResourceType`] and invoked with an [`AnyResource`].
pub trait TypedResource: ApiResource + Sized {
    const RESOURCE_TYPE: ResourceType;

    fn from_any(resource: &AnyResource) -> Option<&Self>;
}

macro_rules! authz_resource {
    ($kind:ident, $id:ty) => {
        impl $kind {
            pub fn id(&self) -> $id {
                self.id
            }
        }

        impl TypedResource for $kind {
            const RESOURCE_TYPE: ResourceType = ResourceType::$kind;

            fn from_any(resource: &AnyResource) -> Option<&Self> {
                match resource {
                    AnyResource::$kind(r) => Some(r),
                    _ => None,
                }
            }
        }

        impl From<$kind> for AnyResource {
            fn from(resource: $kind) -> Self {
                AnyResource::$kind(resource)
            }
        }
    };
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Organization {
    id: OrganizationUuid,
    lookup_type: LookupType,
}

impl Organization {
    pub fn new(id: OrganizationUuid, lookup_type: LookupType) -> Organization {
        Organization { id, lookup_type }
    }
}

impl ApiResource for Organization {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Organization
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        Some(self.id)
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        None
    }
}

authz_resource!(Organization, OrganizationUuid);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Space {
    organization: Option<Organization>,
    id: SpaceUuid,
    lookup_type: LookupType,
}

impl Space {
    pub fn new(
        organization: Option<Organization>,
        id: SpaceUuid,
        lookup_type: LookupType,
    ) -> Space {
        Space { organization, id, lookup_type }
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }
}

impl ApiResource for Space {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Space
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        self.organization.as_ref().map(|o| o.id)
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        Some(self.id)
    }
}

authz_resource!(Space, SpaceUuid);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct App {
    space: Option<Space>,
    id: AppUuid,
    lookup_type: LookupType,
}

impl App {
    pub fn new(space: Option<Space>, id: AppUuid, lookup_type: LookupType) -> App {
        App { space, id, lookup_type }
    }

    pub fn space(&self) -> Option<&Space> {
        self.space.as_ref()
    }
}

impl ApiResource for App {
    fn resource_type(&self) -> ResourceType {
        ResourceType::App
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        self.space.as_ref().and_then(|s| s.organization_id())
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        self.space.as_ref().map(|s| s.id)
    }
}

authz_resource!(App, AppUuid);

/// An audit event recorded against a space
///
/// Events outlive the space they describe, so `space` is `None` for events
/// whose space has been destroyed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    space: Option<Space>,
    id: EventUuid,
    lookup_type: LookupType,
}

impl Event {
    pub fn new(
        space: Option<Space>,
        id: EventUuid,
        lookup_type: LookupType,
    ) -> Event {
        Event { space, id, lookup_type }
    }

    pub fn space(&self) -> Option<&Space> {
        self.space.as_ref()
    }
}

impl ApiResource for Event {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Event
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        self.space.as_ref().and_then(|s| s.organization_id())
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        self.space.as_ref().map(|s| s.id)
    }
}

authz_resource!(Event, EventUuid);

/// An entry in the service catalog
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Service {
    id: ServiceUuid,
    lookup_type: LookupType,
}

impl Service {
    pub fn new(id: ServiceUuid, lookup_type: LookupType) -> Service {
        Service { id, lookup_type }
    }
}

impl ApiResource for Service {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Service
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        None
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        None
    }
}

authz_resource!(Service, ServiceUuid);

/// A binding between an app and a service instance
///
/// The service instance's space is recorded for completeness.  It normally
/// matches the app's space, but when it doesn't, access follows the app.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceBinding {
    app: Option<App>,
    service_instance_space: Option<Space>,
    id: ServiceBindingUuid,
    lookup_type: LookupType,
}

impl ServiceBinding {
    pub fn new(
        app: Option<App>,
        service_instance_space: Option<Space>,
        id: ServiceBindingUuid,
        lookup_type: LookupType,
    ) -> ServiceBinding {
        ServiceBinding { app, service_instance_space, id, lookup_type }
    }

    pub fn app(&self) -> Option<&App> {
        self.app.as_ref()
    }

    pub fn service_instance_space(&self) -> Option<&Space> {
        self.service_instance_space.as_ref()
    }
}

impl ApiResource for ServiceBinding {
    fn resource_type(&self) -> ResourceType {
        ResourceType::ServiceBinding
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        self.app.as_ref().and_then(|a| a.organization_id())
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        self.app.as_ref().and_then(|a| a.space_id())
    }
}

authz_resource!(ServiceBinding, ServiceBindingUuid);

/// Who owns a [`Domain`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DomainOwner {
    /// usable by every organization and managed by the system
    Shared,
    /// owned by one organization, `None` if that organization was deleted
    Private { organization: Option<Organization> },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Domain {
    owner: DomainOwner,
    id: DomainUuid,
    lookup_type: LookupType,
}

impl Domain {
    pub fn new_shared(id: DomainUuid, lookup_type: LookupType) -> Domain {
        Domain { owner: DomainOwner::Shared, id, lookup_type }
    }

    pub fn new_private(
        organization: Option<Organization>,
        id: DomainUuid,
        lookup_type: LookupType,
    ) -> Domain {
        Domain { owner: DomainOwner::Private { organization }, id, lookup_type }
    }

    pub fn owner(&self) -> &DomainOwner {
        &self.owner
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.owner, DomainOwner::Shared)
    }
}

impl ApiResource for Domain {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Domain
    }

    fn lookup_type(&self) -> &LookupType {
        &self.lookup_type
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        match &self.owner {
            DomainOwner::Shared => None,
            DomainOwner::Private { organization } => {
                organization.as_ref().map(|o| o.id)
            }
        }
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        None
    }

    fn is_system_owned(&self) -> bool {
        self.is_shared()
    }
}

authz_resource!(Domain, DomainUuid);

/// Any resource that access can be checked against
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AnyResource {
    Organization(Organization),
    Space(Space),
    App(App),
    Event(Event),
    Service(Service),
    ServiceBinding(ServiceBinding),
    Domain(Domain),
}

impl AnyResource {
    fn as_api_resource(&self) -> &dyn ApiResource {
        match self {
            AnyResource::Organization(r) => r,
            AnyResource::Space(r) => r,
            AnyResource::App(r) => r,
            AnyResource::Event(r) => r,
            AnyResource::Service(r) => r,
            AnyResource::ServiceBinding(r) => r,
            AnyResource::Domain(r) => r,
        }
    }
}

impl ApiResource for AnyResource {
    fn resource_type(&self) -> ResourceType {
        self.as_api_resource().resource_type()
    }

    fn lookup_type(&self) -> &LookupType {
        self.as_api_resource().lookup_type()
    }

    fn organization_id(&self) -> Option<OrganizationUuid> {
        self.as_api_resource().organization_id()
    }

    fn space_id(&self) -> Option<SpaceUuid> {
        self.as_api_resource().space_id()
    }

    fn is_system_owned(&self) -> bool {
        self.as_api_resource().is_system_owned()
    }
}

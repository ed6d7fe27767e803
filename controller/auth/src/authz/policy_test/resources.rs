// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Users, role assignments and resources for the access matrix

use crate::authn;
use crate::authz::AnyResource;
use crate::authz::ApiResource;
use crate::authz::App;
use crate::authz::Domain;
use crate::authz::Event;
use crate::authz::Organization;
use crate::authz::OrganizationRole;
use crate::authz::Service;
use crate::authz::ServiceBinding;
use crate::authz::Space;
use crate::authz::SpaceRole;
use crate::authz::AUTHORIZED_RESOURCE_TYPES;
use crate::fakes::FakeRoleStore;
use controller_common::api::external::LookupType;
use controller_common::api::external::ResourceType;
use controller_common::typed_uuid::AppUuid;
use controller_common::typed_uuid::DomainUuid;
use controller_common::typed_uuid::EventUuid;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::ServiceBindingUuid;
use controller_common::typed_uuid::ServiceUuid;
use controller_common::typed_uuid::SpaceUuid;
use controller_common::typed_uuid::UserUuid;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything the access matrix is computed over
pub struct Resources {
    users: Vec<(String, Arc<authn::Context>)>,
    store: Arc<FakeRoleStore>,
    resources: Vec<(String, AnyResource)>,
}

impl Resources {
    pub fn users(&self) -> &[(String, Arc<authn::Context>)] {
        &self.users
    }

    pub fn store(&self) -> Arc<FakeRoleStore> {
        Arc::clone(&self.store)
    }

    pub fn resources(&self) -> &[(String, AnyResource)] {
        &self.resources
    }

    /// Panics unless every kind that has a policy appears in the matrix
    pub fn verify_coverage(&self) {
        let covered: BTreeSet<ResourceType> = self
            .resources
            .iter()
            .map(|(_, resource)| resource.resource_type())
            .collect();
        let uncovered: Vec<_> = AUTHORIZED_RESOURCE_TYPES
            .iter()
            .filter(|t| !covered.contains(t))
            .collect();
        assert!(
            uncovered.is_empty(),
            "resource types missing from the access matrix: {:?}",
            uncovered
        );
    }
}

fn by_name(name: &str) -> LookupType {
    LookupType::ByName(name.to_string())
}

// The hierarchy looks like this:
//
// org1
// org1/space1
// org1/space1/app1
// org1/space1/app1/binding1 (its service instance lives in org1/space2)
// org1/space1/event1
// org1/space2
// org1/private-domain
// org1/(destroyed space)/event1
// org2
// org2/private-domain
// shared-domain
// service1
pub fn make_resources() -> Resources {
    let org1 = Organization::new(OrganizationUuid::new_v4(), by_name("org1"));
    let org2 = Organization::new(OrganizationUuid::new_v4(), by_name("org2"));
    let space1 = Space::new(
        Some(org1.clone()),
        SpaceUuid::new_v4(),
        by_name("org1-space1"),
    );
    let space2 = Space::new(
        Some(org1.clone()),
        SpaceUuid::new_v4(),
        by_name("org1-space2"),
    );
    let app1 = App::new(
        Some(space1.clone()),
        AppUuid::new_v4(),
        by_name("org1-space1-app1"),
    );

    let mut store = FakeRoleStore::new();
    let mut users = Vec::new();
    let mut new_user = |name: &str, admin: bool| {
        let user_id = UserUuid::new_v4();
        let authn = if admin {
            authn::Context::for_admin(user_id)
        } else {
            authn::Context::for_user(user_id)
        };
        users.push((name.to_string(), Arc::new(authn)));
        user_id
    };

    new_user("admin", true);
    for (name, role) in [
        ("org1-manager", OrganizationRole::Manager),
        ("org1-auditor", OrganizationRole::Auditor),
        ("org1-billing-manager", OrganizationRole::BillingManager),
        ("org1-member", OrganizationRole::Member),
    ] {
        let user_id = new_user(name, false);
        store.grant_organization_role(user_id, org1.id(), role);
    }
    for (name, role) in [
        ("org1-space1-developer", SpaceRole::Developer),
        ("org1-space1-manager", SpaceRole::Manager),
        ("org1-space1-auditor", SpaceRole::Auditor),
    ] {
        let user_id = new_user(name, false);
        store.grant_space_role(user_id, space1.id(), role);
    }
    let user_id = new_user("org1-space2-developer", false);
    store.grant_space_role(user_id, space2.id(), SpaceRole::Developer);
    let user_id = new_user("org2-manager", false);
    store.grant_organization_role(user_id, org2.id(), OrganizationRole::Manager);
    // These users held roles on a space that has since been destroyed.  No
    // resource in the matrix can reach that space any more, including the
    // event that was recorded in it.
    let destroyed_space_id = SpaceUuid::new_v4();
    for (name, role) in [
        ("org1-destroyed-space-developer", SpaceRole::Developer),
        ("org1-destroyed-space-auditor", SpaceRole::Auditor),
    ] {
        let user_id = new_user(name, false);
        store.grant_space_role(user_id, destroyed_space_id, role);
    }
    users.push((
        String::from("unauthenticated"),
        Arc::new(authn::Context::unauthenticated()),
    ));

    let resources: Vec<AnyResource> = vec![
        org1.clone().into(),
        org2.clone().into(),
        space1.clone().into(),
        space2.clone().into(),
        app1.clone().into(),
        Event::new(
            Some(space1.clone()),
            EventUuid::new_v4(),
            by_name("org1-space1-event1"),
        )
        .into(),
        // This event's space was destroyed after it was recorded.
        Event::new(None, EventUuid::new_v4(), by_name("org1-destroyed-space-event1"))
            .into(),
        Service::new(ServiceUuid::new_v4(), by_name("service1")).into(),
        ServiceBinding::new(
            Some(app1),
            Some(space2),
            ServiceBindingUuid::new_v4(),
            by_name("org1-space1-app1-binding1"),
        )
        .into(),
        Domain::new_shared(DomainUuid::new_v4(), by_name("shared-domain")).into(),
        Domain::new_private(
            Some(org1),
            DomainUuid::new_v4(),
            by_name("org1-private-domain"),
        )
        .into(),
        Domain::new_private(
            Some(org2),
            DomainUuid::new_v4(),
            by_name("org2-private-domain"),
        )
        .into(),
    ];

    let resources = resources
        .into_iter()
        .map(|resource| {
            let name = match resource.lookup_type() {
                LookupType::ByName(name) => name.clone(),
                other => format!("{:?}", other),
            };
            (format!("{} {:?}", resource.resource_type(), name), resource)
        })
        .collect();

    Resources { users, store: Arc::new(store), resources }
}

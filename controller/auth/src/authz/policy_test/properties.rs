// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property tests over arbitrary role assignments

use super::action_abbreviation;
use crate::authz::Action;
use crate::authz::AnyResource;
use crate::authz::ApiResource;
use crate::authz::App;
use crate::authz::Authz;
use crate::authz::Domain;
use crate::authz::Event;
use crate::authz::Organization;
use crate::authz::OrganizationRole;
use crate::authz::RoleSet;
use crate::authz::Service;
use crate::authz::ServiceBinding;
use crate::authz::Space;
use crate::authz::SpaceRole;
use crate::fakes::admin_context;
use crate::fakes::anonymous_context;
use crate::fakes::user_context;
use crate::fakes::FakeRoleStore;
use controller_common::api::external::LookupType;
use controller_common::config::AuthzConfig;
use controller_common::typed_uuid::AppUuid;
use controller_common::typed_uuid::DomainUuid;
use controller_common::typed_uuid::EventUuid;
use controller_common::typed_uuid::OrganizationUuid;
use controller_common::typed_uuid::ServiceBindingUuid;
use controller_common::typed_uuid::ServiceUuid;
use controller_common::typed_uuid::SpaceUuid;
use controller_common::typed_uuid::UserUuid;
use proptest::prop_assert;
use proptest::prop_assert_eq;
use slog::o;
use slog::Logger;
use strum::IntoEnumIterator;
use test_strategy::proptest;

struct Hierarchy {
    organization: Organization,
    space: Space,
    resources: Vec<AnyResource>,
}

fn by_name(name: &str) -> LookupType {
    LookupType::ByName(name.to_string())
}

fn make_hierarchy() -> Hierarchy {
    let organization = Organization::new(OrganizationUuid::new_v4(), by_name("org"));
    let space = Space::new(
        Some(organization.clone()),
        SpaceUuid::new_v4(),
        by_name("space"),
    );
    let other_space = Space::new(
        Some(organization.clone()),
        SpaceUuid::new_v4(),
        by_name("other-space"),
    );
    let app = App::new(Some(space.clone()), AppUuid::new_v4(), by_name("app"));
    let resources = vec![
        organization.clone().into(),
        space.clone().into(),
        other_space.clone().into(),
        app.clone().into(),
        Event::new(Some(space.clone()), EventUuid::new_v4(), by_name("event"))
            .into(),
        Event::new(None, EventUuid::new_v4(), by_name("orphan-event")).into(),
        Service::new(ServiceUuid::new_v4(), by_name("service")).into(),
        ServiceBinding::new(
            Some(app),
            Some(other_space),
            ServiceBindingUuid::new_v4(),
            by_name("binding"),
        )
        .into(),
        ServiceBinding::new(
            None,
            None,
            ServiceBindingUuid::new_v4(),
            by_name("orphan-binding"),
        )
        .into(),
        Domain::new_shared(DomainUuid::new_v4(), by_name("shared")).into(),
        Domain::new_private(
            Some(organization.clone()),
            DomainUuid::new_v4(),
            by_name("private"),
        )
        .into(),
        Domain::new_private(None, DomainUuid::new_v4(), by_name("orphan-domain"))
            .into(),
    ];
    Hierarchy { organization, space, resources }
}

fn discard_log() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// For any set of roles on one organization and one of its spaces:
///
/// - every decision is the same when asked twice
/// - a resource the visibility filter excludes is never readable
/// - an actor with no roles at all can mutate nothing
#[proptest]
fn decisions_are_stable_and_match_visibility(
    #[strategy(0u8..16)] organization_roles: u8,
    #[strategy(0u8..8)] space_roles: u8,
) {
    let log = discard_log();
    let authz = Authz::new(&log, &AuthzConfig::default()).unwrap();
    let hierarchy = make_hierarchy();

    let user_id = UserUuid::new_v4();
    let mut roleset = RoleSet::new();
    let mut store = FakeRoleStore::new();
    for (bit, role) in OrganizationRole::iter().enumerate() {
        if organization_roles & (1 << bit) != 0 {
            roleset.insert_organization_role(hierarchy.organization.id(), role);
            store.grant_organization_role(
                user_id,
                hierarchy.organization.id(),
                role,
            );
        }
    }
    for (bit, role) in SpaceRole::iter().enumerate() {
        if space_roles & (1 << bit) != 0 {
            roleset.insert_space_role(hierarchy.space.id(), role);
            store.grant_space_role(user_id, hierarchy.space.id(), role);
        }
    }
    let has_no_roles = roleset.is_empty();
    let ctx = user_context(&log, user_id, roleset);

    for resource in &hierarchy.resources {
        let filter = authz
            .visibility_predicate(&ctx, resource.resource_type())
            .unwrap();
        let visible = filter.matches(resource, &store);
        for action in Action::iter() {
            let allowed = authz.is_allowed(&ctx, action, resource).unwrap();
            prop_assert_eq!(
                allowed,
                authz.is_allowed(&ctx, action, resource).unwrap()
            );
            if action == Action::Read {
                prop_assert!(
                    visible || !allowed,
                    "{:?} is readable but not visible",
                    resource
                );
            } else if has_no_roles {
                prop_assert!(
                    !allowed,
                    "{} on {:?} allowed with no roles",
                    action_abbreviation(action),
                    resource
                );
            }
        }
    }
}

#[test]
fn test_admin_and_anonymous() {
    let log = discard_log();
    let authz = Authz::new(&log, &AuthzConfig::default()).unwrap();
    let hierarchy = make_hierarchy();
    let admin = admin_context(&log);
    let anonymous = anonymous_context(&log);

    for resource in &hierarchy.resources {
        for action in Action::iter() {
            assert!(
                authz.is_allowed(&admin, action, resource).unwrap(),
                "admin denied {} on {:?}",
                action,
                resource
            );

            let shared_domain_read = action == Action::Read
                && matches!(resource, AnyResource::Domain(d) if d.is_shared());
            assert_eq!(
                authz.is_allowed(&anonymous, action, resource).unwrap(),
                shared_domain_read,
                "anonymous {} on {:?}",
                action,
                resource
            );
        }
    }
}

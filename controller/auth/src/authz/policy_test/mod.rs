// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit tests for the access policies
//!
//! This builds a small hierarchy with users holding every role, asks
//! [`Authz::authorize()`] about every (resource, user, action) combination,
//! and compares the resulting table against `tests/output/authz-access.out`.
//! Any change in what a role grants shows up as a diff in that file.
//!
//! Along the way, it also checks that:
//!
//! - asking the same question twice gets the same answer
//! - a resource hidden by the visibility filter is never readable

use self::resources::Resources;
use crate::authn;
use crate::authz::Action;
use crate::authz::AnyResource;
use crate::authz::ApiResource;
use crate::authz::Authz;
use crate::authz::RoleContext;
use crate::fakes::FakeRoleStore;
use controller_common::api::external::Error;
use controller_common::config::AuthzConfig;
use controller_test_utils::dev;
use futures::StreamExt;
use slog::o;
use slog::trace;
use std::io::Cursor;
use std::io::Write;
use std::sync::Arc;
use strum::IntoEnumIterator;

mod properties;
mod resources;

#[tokio::test(flavor = "multi_thread")]
async fn test_access_matrix() {
    let logctx = dev::test_setup_log("test_access_matrix");
    let authz = Arc::new(
        Authz::new(&logctx.log, &AuthzConfig::default())
            .expect("building authz registry"),
    );
    let test_resources = resources::make_resources();
    test_resources.verify_coverage();

    let mut buffer = Vec::new();
    {
        let mut out = StdoutTee::new(&mut buffer);
        run_test_operations(&mut out, &logctx.log, &authz, &test_resources)
            .await
            .unwrap();
    }

    expectorate::assert_contents(
        "tests/output/authz-access.out",
        std::str::from_utf8(buffer.as_ref()).expect("non-UTF8 output"),
    );

    logctx.cleanup_successful();
}

async fn run_test_operations<W: Write>(
    mut out: W,
    log: &slog::Logger,
    authz: &Arc<Authz>,
    test_resources: &Resources,
) -> std::io::Result<()> {
    let mut futures = futures::stream::FuturesOrdered::new();

    // Run the per-resource tests in parallel.
    for (name, resource) in test_resources.resources() {
        let log = log.new(o!("resource" => name.clone()));
        futures.push_back(test_one_resource(
            log,
            Arc::clone(authz),
            test_resources.store(),
            test_resources.users().to_vec(),
            name.clone(),
            resource.clone(),
        ));
    }

    let outputs: Vec<String> = futures.collect().await;
    for o in outputs {
        write!(out, "{}", o)?;
    }

    write!(out, "ACTIONS:\n\n")?;
    for action in Action::iter() {
        write!(out, "  {:>2} = {:?}\n", action_abbreviation(action), action)?;
    }
    write!(out, "\n")?;

    Ok(())
}

async fn test_one_resource(
    log: slog::Logger,
    authz: Arc<Authz>,
    store: Arc<FakeRoleStore>,
    users: Vec<(String, Arc<authn::Context>)>,
    name: String,
    resource: AnyResource,
) -> String {
    let task = tokio::spawn(async move {
        let mut buffer = Vec::new();
        let mut out = Cursor::new(&mut buffer);
        write!(out, "resource: {}\n\n", name)?;

        write!(out, "  {:31}", "USER")?;
        for action in Action::iter() {
            write!(out, " {:>2}", action_abbreviation(action))?;
        }
        write!(out, "\n")?;

        for (username, user_authn) in &users {
            let ctx = RoleContext::for_resource(
                &log,
                Arc::clone(user_authn),
                store.as_ref(),
                &resource,
            )
            .await
            .expect("loading roles");

            write!(out, "  {:31}", username)?;
            for action in Action::iter() {
                let result = authz.authorize(&ctx, action, &resource);
                trace!(
                    log,
                    "authorize result";
                    "username" => username.clone(),
                    "action" => ?action,
                    "result" => ?result,
                );
                assert_eq!(
                    result,
                    authz.authorize(&ctx, action, &resource),
                    "decision changed between two evaluations"
                );
                let summary = match result {
                    Ok(_) => '\u{2714}',
                    Err(Error::Forbidden)
                    | Err(Error::ObjectNotFound { .. }) => '\u{2718}',
                    Err(Error::Unauthenticated { .. }) => '!',
                    Err(_) => '\u{26a0}',
                };
                write!(out, " {:>2}", summary)?;
            }
            write!(out, "\n")?;

            check_visibility(&authz, &ctx, store.as_ref(), &resource, username);
        }

        write!(out, "\n")?;
        Ok::<_, std::io::Error>(buffer)
    });

    let result = task.await.expect("failed to wait for task");
    let result_str = result.expect("failed to write to string buffer");
    String::from_utf8(result_str).expect("unexpected non-UTF8 output")
}

/// Checks that whatever the visibility filter hides is also unreadable
fn check_visibility(
    authz: &Authz,
    ctx: &RoleContext,
    store: &FakeRoleStore,
    resource: &AnyResource,
    username: &str,
) {
    let filter = authz
        .visibility_predicate(ctx, resource.resource_type())
        .expect("visibility filter");
    let visible = filter.matches(resource, store);
    let readable = authz
        .is_allowed(ctx, Action::Read, resource)
        .expect("read decision");
    assert!(
        visible || !readable,
        "{} can read {:?} but it is excluded by {:?}",
        username,
        resource,
        filter
    );
}

fn action_abbreviation(action: Action) -> &'static str {
    match action {
        Action::Create => "C",
        Action::Read => "R",
        Action::Update => "U",
        Action::Delete => "D",
    }
}

/// `Write` impl that writes everything it's given to both a destination `Write`
/// and stdout via `print!`.
///
/// We need to use `print!` in order for output to be captured by the test
/// runner.  See rust-lang/rust#12309.
struct StdoutTee<W> {
    sink: W,
}

impl<W: Write> StdoutTee<W> {
    fn new(sink: W) -> StdoutTee<W> {
        StdoutTee { sink }
    }
}

impl<W: Write> Write for StdoutTee<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        print!("{}", std::str::from_utf8(buf).expect("non-UTF8 in stdout tee"));
        self.sink.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}

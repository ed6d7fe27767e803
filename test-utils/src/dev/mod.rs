// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facilities intended for development tools and the test suite.  These should
//! not be used in production code.

use anyhow::Context;
use slog::Drain;
use slog::Logger;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

/// A logger for one test, writing to its own file
///
/// The file is removed by [`LogContext::cleanup_successful()`].  A test that
/// fails (and so never calls it) leaves its log behind for debugging.
pub struct LogContext {
    pub log: Logger,
    log_path: PathBuf,
}

impl LogContext {
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Removes the log file.  Call this at the end of a test that passed.
    pub fn cleanup_successful(self) {
        let LogContext { log, log_path } = self;
        // Dropping the last logger flushes the async drain.
        drop(log);
        if let Err(error) = std::fs::remove_file(&log_path) {
            eprintln!(
                "failed to remove log file {}: {:#}",
                log_path.display(),
                error
            );
        }
    }
}

/// Set up a [`LogContext`] appropriate for a test named `test_name`
pub fn test_setup_log(test_name: &str) -> LogContext {
    let log_path = std::env::temp_dir().join(format!(
        "{}.{}.{}.log",
        test_name,
        std::process::id(),
        next_log_id()
    ));
    let file = File::create(&log_path)
        .with_context(|| {
            format!("creating test log file {}", log_path.display())
        })
        .unwrap();
    eprintln!("log file: {}", log_path.display());

    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = Logger::root(drain, slog::o!("test_name" => test_name.to_owned()));
    LogContext { log, log_path }
}

fn next_log_id() -> u32 {
    use std::sync::atomic::AtomicU32;
    use std::sync::atomic::Ordering;
    static LOG_ID: AtomicU32 = AtomicU32::new(0);
    LOG_ID.fetch_add(1, Ordering::SeqCst)
}

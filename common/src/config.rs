// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces for parsing controller configuration files and building the
//! root logger from them

use crate::api::external::ResourceType;
use serde::Deserialize;
use slog::Drain;
use slog::Level;
use slog::Logger;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("read \"{}\": {err}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("parse \"{}\": {err}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        err: toml::de::Error,
    },
}

/// Failure to set up logging from an otherwise valid configuration
#[derive(Debug, thiserror::Error)]
#[error("open log file \"{}\": {err}", path.display())]
pub struct LogInitError {
    path: PathBuf,
    #[source]
    err: std::io::Error,
}

/// Configuration for the pieces of the controller that make authorization
/// decisions
#[derive(Debug, Deserialize)]
pub struct ControllerConfig {
    /// Process-wide logging configuration
    pub log: ConfigLogging,
    /// Authorization engine wiring
    #[serde(default)]
    pub authz: AuthzConfig,
}

impl ControllerConfig {
    /// Load a `ControllerConfig` from the given TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| LoadError::Io { path: path.into(), err })?;
        toml::from_str(&contents)
            .map_err(|err| LoadError::Parse { path: path.into(), err })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthzConfig {
    /// Resource kinds that must have an access policy registered before the
    /// controller starts serving requests
    ///
    /// When unset, every kind the engine knows about is required.
    #[serde(default)]
    pub required_resource_types: Option<Vec<ResourceType>>,
}

/// Represents the logging configuration (the "log" top-level object in the
/// configuration file)
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ConfigLogging {
    StderrTerminal {
        level: ConfigLoggingLevel,
    },
    File {
        level: ConfigLoggingLevel,
        path: PathBuf,
        if_exists: ConfigLoggingIfExists,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoggingIfExists {
    Fail,
    Truncate,
    Append,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoggingLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl From<ConfigLoggingLevel> for Level {
    fn from(config_level: ConfigLoggingLevel) -> Level {
        match config_level {
            ConfigLoggingLevel::Trace => Level::Trace,
            ConfigLoggingLevel::Debug => Level::Debug,
            ConfigLoggingLevel::Info => Level::Info,
            ConfigLoggingLevel::Warn => Level::Warning,
            ConfigLoggingLevel::Error => Level::Error,
            ConfigLoggingLevel::Critical => Level::Critical,
        }
    }
}

impl ConfigLogging {
    /// Create the root logger based on the requested configuration
    pub fn to_logger(&self, name: &str) -> Result<Logger, LogInitError> {
        match self {
            ConfigLogging::StderrTerminal { level } => {
                let decorator = slog_term::TermDecorator::new().stderr().build();
                let drain =
                    slog_term::FullFormat::new(decorator).build().fuse();
                Ok(async_root_logger(*level, name, drain))
            }

            ConfigLogging::File { level, path, if_exists } => {
                let mut open_options = OpenOptions::new();
                open_options.write(true).create(true);
                match if_exists {
                    ConfigLoggingIfExists::Fail => {
                        open_options.create_new(true);
                    }
                    ConfigLoggingIfExists::Append => {
                        open_options.append(true);
                    }
                    ConfigLoggingIfExists::Truncate => {
                        open_options.truncate(true);
                    }
                }

                let drain = log_drain_for_file(&open_options, path)?;
                Ok(async_root_logger(*level, name, drain))
            }
        }
    }
}

// The async drain takes care of synchronization for the terminal and file
// drains, both of which would otherwise need a mutex.
fn async_root_logger<T>(level: ConfigLoggingLevel, name: &str, drain: T) -> Logger
where
    T: slog::Drain + Send + 'static,
    <T as slog::Drain>::Err: std::fmt::Debug,
{
    let level_drain = slog::LevelFilter(drain, Level::from(level)).fuse();
    let async_drain = slog_async::Async::new(level_drain).build().fuse();
    Logger::root(
        async_drain,
        slog::o!("name" => name.to_owned(), "pid" => std::process::id()),
    )
}

fn log_drain_for_file(
    open_options: &OpenOptions,
    path: &Path,
) -> Result<slog::Fuse<slog_json::Json<std::fs::File>>, LogInitError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| LogInitError { path: path.into(), err })?;
    }

    let file = open_options
        .open(path)
        .map_err(|err| LogInitError { path: path.into(), err })?;

    // Record a message to stderr so that a reader who doesn't already know
    // how logging is configured knows where the rest of the log messages went.
    eprintln!("note: configured to log to \"{}\"", path.display());
    Ok(slog_json::Json::default(file).fuse())
}

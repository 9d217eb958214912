use super::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_APP_NAME: &str = "pdbmine";

/// Where a session runs its work.
///
/// Only in-process masters are supported: `local` (one worker), `local[N]`
/// (`N` workers) and `local[*]` (one worker per available core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Master {
    #[default]
    Local,
    LocalThreads(usize),
    LocalAllCores,
}

impl Master {
    /// Number of worker threads the session pool will hold.
    pub fn worker_threads(&self) -> usize {
        match self {
            Master::Local => 1,
            Master::LocalThreads(n) => *n,
            Master::LocalAllCores => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl FromStr for Master {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || SessionError::UnsupportedMaster(s.to_string());
        let trimmed = s.trim();
        if trimmed == "local" {
            return Ok(Master::Local);
        }
        let inner = trimmed
            .strip_prefix("local[")
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(unsupported)?;
        if inner == "*" {
            return Ok(Master::LocalAllCores);
        }
        match inner.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Master::LocalThreads(n)),
            _ => Err(unsupported()),
        }
    }
}

impl TryFrom<String> for Master {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Master> for String {
    fn from(master: Master) -> Self {
        master.to_string()
    }
}

impl fmt::Display for Master {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Master::Local => write!(f, "local"),
            Master::LocalThreads(n) => write!(f, "local[{}]", n),
            Master::LocalAllCores => write!(f, "local[*]"),
        }
    }
}

/// Settings used to start a [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default)]
    pub master: Master,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            master: Master::default(),
            app_name: default_app_name(),
        }
    }
}

impl SessionConfig {
    pub fn new(master: Master, app_name: impl Into<String>) -> Self {
        Self {
            master,
            app_name: app_name.into(),
        }
    }

    /// Parses a TOML document with `master` and `app-name` keys.
    pub fn from_toml_str(text: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Default)]
pub struct SessionConfigBuilder {
    master: Option<String>,
    app_name: Option<String>,
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn master(mut self, master: impl Into<String>) -> Self {
        self.master = Some(master.into());
        self
    }
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<SessionConfig, SessionError> {
        let master = self
            .master
            .ok_or(SessionError::MissingParameter("master"))?
            .parse()?;
        let app_name = self
            .app_name
            .ok_or(SessionError::MissingParameter("app_name"))?;
        Ok(SessionConfig { master, app_name })
    }
}

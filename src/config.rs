//! Configuration sources read by the model factories.
//!
//! The factories only ever need three facts from their surroundings: the UID of a report
//! the current run should attach to, a snapshot of the version-control state, and the
//! base path of the test sources. [`Configuration`] exposes exactly those, so callers can
//! plug in their own loader or a fixed value in tests. [`ProbeConfig`] is the stock
//! implementation, deserialized from JSON and overridable from the environment.

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;

/// Environment variable holding the UID of the report the current run attaches to.
pub const ENV_TEST_REPORT_UID: &str = "PROBEDOCK_TEST_REPORT_UID";

/// Environment variable holding the base path of the project test sources.
pub const ENV_PROJECT_BASE_TEST_PATH: &str = "PROBEDOCK_PROJECT_BASE_TEST_PATH";

/// Read-only view of the configuration consumed by the factories.
///
/// Implementations must be safe to read concurrently.
pub trait Configuration: Send + Sync {
    /// UID of the externally tracked report the run attaches to, if any.
    fn current_uid(&self) -> Option<String>;

    /// Version-control snapshot of the project under test, if known.
    fn scm_info(&self) -> Option<&ScmInfo>;

    /// Base path prepended to derived test file paths, if configured.
    fn project_base_test_path(&self) -> Option<&str>;
}

/// Configuration that supplies nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoConfiguration;

impl Configuration for NoConfiguration {
    fn current_uid(&self) -> Option<String> {
        None
    }

    fn scm_info(&self) -> Option<&ScmInfo> {
        None
    }

    fn project_base_test_path(&self) -> Option<&str> {
        None
    }
}

/// Remote tracked by the working copy.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScmRemoteInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fetch_url: Option<String>,
    #[serde(default)]
    pub push_url: Option<String>,
    /// Commits the local branch is ahead of the remote.
    #[serde(default, deserialize_with = "opt_u32_or_string")]
    pub ahead: Option<u32>,
    /// Commits the local branch is behind the remote.
    #[serde(default, deserialize_with = "opt_u32_or_string")]
    pub behind: Option<u32>,
}

/// Version-control snapshot of the project under test.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScmInfo {
    /// SCM name, e.g. `git`.
    #[serde(default)]
    pub name: Option<String>,
    /// SCM client version.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    /// Whether the working copy has uncommitted changes.
    #[serde(default)]
    pub dirty: Option<bool>,
    #[serde(default)]
    pub remote: Option<ScmRemoteInfo>,
}

/// Stock configuration, usually loaded from a JSON file and the environment.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    #[serde(default)]
    pub current_uid: Option<String>,
    #[serde(default)]
    pub project_base_test_path: Option<String>,
    #[serde(default)]
    pub scm: Option<ScmInfo>,
}

impl ProbeConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let config = Self::from_json_slice(&data)?;
        tracing::debug!("loaded probe configuration from {}", path.display());
        Ok(config)
    }

    /// Applies the `PROBEDOCK_*` environment variables on top of this configuration.
    ///
    /// Unset or blank variables leave the current value untouched.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`, keyed by environment variable name.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(uid) = non_blank(ENV_TEST_REPORT_UID) {
            tracing::debug!("current report uid taken from {}", ENV_TEST_REPORT_UID);
            self.current_uid = Some(uid);
        }
        if let Some(path) = non_blank(ENV_PROJECT_BASE_TEST_PATH) {
            self.project_base_test_path = Some(path);
        }
        self
    }
}

impl Configuration for ProbeConfig {
    fn current_uid(&self) -> Option<String> {
        self.current_uid
            .clone()
            .filter(|uid| !uid.trim().is_empty())
    }

    fn scm_info(&self) -> Option<&ScmInfo> {
        self.scm.as_ref()
    }

    fn project_base_test_path(&self) -> Option<&str> {
        self.project_base_test_path.as_deref()
    }
}

fn opt_u32_or_string<'deserialize, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'deserialize>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum U32OrString {
        U32(u32),
        String(String),
    }

    match Option::<U32OrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(U32OrString::U32(v)) => Ok(Some(v)),
        Some(U32OrString::String(v)) => v
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

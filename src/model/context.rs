//! Execution context of a test run.
//!
//! A [`Context`] is a flat bag of namespaced scalar values describing where the tests
//! ran. It is split in three partitions:
//!
//! - **properties**: collected once at run start (OS, runtime, SCM state).
//! - **pre-properties**: sampled before the run (memory).
//! - **post-properties**: re-sampled after the run (memory), overwritten on every
//!   enrichment.
//!
//! Values are JSON scalars: strings for names and versions, integers for counters and
//! memory sizes, booleans for flags.
//!
//! Platform keys are runtime-neutral: `runtime.*` and `vm.*` stand for the `java.*` and
//! `java.vm.*` system properties a JVM reporter would record, and
//! `runtime.class.version` for `java.class.version`. Source-location keys on test results
//! keep their `java.*` names (see [`test_result`](crate::model::test_result)).

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ModelType;

pub const OS_NAME: &str = "os.name";
pub const OS_VERSION: &str = "os.version";
pub const OS_ARCHITECTURE: &str = "os.arch";

pub const RUNTIME_NAME: &str = "runtime.name";
pub const RUNTIME_VERSION: &str = "runtime.version";
pub const RUNTIME_VENDOR: &str = "runtime.vendor";

pub const VM_NAME: &str = "vm.name";
pub const VM_VERSION: &str = "vm.version";
pub const VM_VENDOR: &str = "vm.vendor";
pub const VM_SPEC_NAME: &str = "vm.spec.name";
pub const VM_SPEC_VERSION: &str = "vm.spec.version";
pub const VM_SPEC_VENDOR: &str = "vm.spec.vendor";

pub const RUNTIME_SPEC_NAME: &str = "runtime.spec.name";
pub const RUNTIME_SPEC_VERSION: &str = "runtime.spec.version";
pub const RUNTIME_SPEC_VENDOR: &str = "runtime.spec.vendor";
pub const RUNTIME_CLASS_VERSION: &str = "runtime.class.version";

pub const MEMORY_TOTAL: &str = "memory.total";
pub const MEMORY_FREE: &str = "memory.free";
pub const MEMORY_USED: &str = "memory.used";

pub const SCM_NAME: &str = "scm.name";
pub const SCM_VERSION: &str = "scm.version";
pub const SCM_COMMIT: &str = "scm.commit";
pub const SCM_BRANCH: &str = "scm.branch";
pub const SCM_DIRTY: &str = "scm.dirty";
pub const SCM_REMOTE_NAME: &str = "scm.remote.name";
pub const SCM_REMOTE_FETCH_URL: &str = "scm.remote.url.fetch";
pub const SCM_REMOTE_PUSH_URL: &str = "scm.remote.url.push";
pub const SCM_REMOTE_AHEAD: &str = "scm.remote.ahead";
pub const SCM_REMOTE_BEHIND: &str = "scm.remote.behind";

/// Namespaced description of the execution environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    #[serde(default)]
    properties: HashMap<String, Value>,
    #[serde(default)]
    pre_properties: HashMap<String, Value>,
    #[serde(default)]
    post_properties: HashMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn pre_property(&self, key: &str) -> Option<&Value> {
        self.pre_properties.get(key)
    }

    pub fn post_property(&self, key: &str) -> Option<&Value> {
        self.post_properties.get(key)
    }

    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    pub fn pre_properties(&self) -> &HashMap<String, Value> {
        &self.pre_properties
    }

    pub fn post_properties(&self) -> &HashMap<String, Value> {
        &self.post_properties
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn set_pre_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.pre_properties.insert(key.into(), value.into());
    }

    pub fn set_post_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.post_properties.insert(key.into(), value.into());
    }

    /// Sets a property only when `value` is present; absent values are not written.
    pub fn set_property_if_present<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set_property(key, value);
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Context: {} properties, {} pre-properties, {} post-properties",
            self.properties.len(),
            self.pre_properties.len(),
            self.post_properties.len()
        )
    }
}

impl_model_trait!(Context, ModelType::Context);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ModelTrait;

    #[test]
    fn test_context_partitions_are_independent() {
        let mut context = Context::new();
        context.set_property(OS_NAME, "linux");
        context.set_pre_property(MEMORY_TOTAL, 1024u64);
        context.set_post_property(MEMORY_TOTAL, 2048u64);

        assert_eq!(context.property(OS_NAME), Some(&json!("linux")));
        assert_eq!(context.pre_property(MEMORY_TOTAL), Some(&json!(1024)));
        assert_eq!(context.post_property(MEMORY_TOTAL), Some(&json!(2048)));
        assert!(context.property(MEMORY_TOTAL).is_none());
    }

    #[test]
    fn test_set_property_if_present_skips_absent() {
        let mut context = Context::new();
        context.set_property_if_present(SCM_NAME, Some("git"));
        context.set_property_if_present::<String>(SCM_BRANCH, None);
        context.set_property_if_present(SCM_DIRTY, Some(false));

        assert_eq!(context.property(SCM_NAME), Some(&json!("git")));
        assert_eq!(context.property(SCM_DIRTY), Some(&json!(false)));
        assert!(!context.properties().contains_key(SCM_BRANCH));
    }

    #[test]
    fn test_context_json_uses_camel_case_partitions() {
        let mut context = Context::new();
        context.set_pre_property(MEMORY_USED, 3u64);
        let value: Value = serde_json::from_slice(&context.to_data().unwrap()).unwrap();
        assert_eq!(value["preProperties"]["memory.used"], json!(3));
        assert!(value["postProperties"].as_object().unwrap().is_empty());

        let decoded = Context::from_bytes(&context.to_data().unwrap()).unwrap();
        assert_eq!(decoded, context);
    }
}

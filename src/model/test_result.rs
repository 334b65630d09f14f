//! Outcome of a single test.
//!
//! A [`TestResult`] records whether one test passed, how long it took and what the
//! reporter knows about it (tags, tickets, contributors, free-form metadata).
//!
//! # Presence
//!
//! Optional collections keep the difference between *absent* and *empty*: `None`
//! means the reporter said nothing, `Some(empty)` means it explicitly reported no
//! entries. Both reach the backend differently (field omitted vs `[]`).
//!
//! | Field | Absent when |
//! |-------|-------------|
//! | `key`, `category` | not supplied or blank |
//! | `name` | not supplied |
//! | `message` | not supplied and the test passed |
//! | `active` | not supplied |
//! | `contributors`, `tags`, `tickets` | not supplied |
//! | `data` | none of the collections nor `data` supplied |

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::model::{ModelType, metadata::MetaData};

/// Metadata key holding the fingerprint of the result.
pub const DATA_FINGERPRINT: &str = "fingerprint";
pub const DATA_JAVA_PACKAGE: &str = "java.package";
pub const DATA_JAVA_CLASS: &str = "java.class";
pub const DATA_JAVA_METHOD: &str = "java.method";
pub const DATA_FILE_LINE: &str = "file.line";
pub const DATA_FILE_PATH: &str = "file.path";

/// One test's outcome. Build it with
/// [`create_test_result`](crate::factory::create_test_result).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// User-assigned identifier of the test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    /// Stable hash of the test location; see [`fingerprint`](crate::fingerprint).
    fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    /// Duration in milliseconds.
    duration: u64,
    /// Failure message, or whatever message the reporter attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    passed: bool,
    /// Whether the test is active; `None` leaves the backend's current state alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contributors: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tickets: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<MetaData>,
}

impl TestResult {
    /// Creates a passing result with only the mandatory fields set.
    ///
    /// No validation happens here; the factory is the checked entry point.
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            passed: true,
            ..Default::default()
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn active(&self) -> Option<bool> {
        self.active
    }

    pub fn contributors(&self) -> Option<&BTreeSet<String>> {
        self.contributors.as_ref()
    }

    pub fn tags(&self) -> Option<&BTreeSet<String>> {
        self.tags.as_ref()
    }

    pub fn tickets(&self) -> Option<&BTreeSet<String>> {
        self.tickets.as_ref()
    }

    pub fn data(&self) -> Option<&MetaData> {
        self.data.as_ref()
    }

    /// Looks up a single metadata entry.
    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key).map(String::as_str)
    }

    /// Returns the metadata map, creating it when absent.
    pub fn data_mut(&mut self) -> &mut MetaData {
        self.data.get_or_insert_with(MetaData::new)
    }

    pub fn set_key(&mut self, key: Option<String>) {
        self.key = key;
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    pub fn set_duration(&mut self, duration: u64) {
        self.duration = duration;
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    pub fn set_passed(&mut self, passed: bool) {
        self.passed = passed;
    }

    pub fn set_active(&mut self, active: Option<bool>) {
        self.active = active;
    }

    pub fn set_contributors(&mut self, contributors: Option<BTreeSet<String>>) {
        self.contributors = contributors;
    }

    pub fn set_tags(&mut self, tags: Option<BTreeSet<String>>) {
        self.tags = tags;
    }

    pub fn set_tickets(&mut self, tickets: Option<BTreeSet<String>>) {
        self.tickets = tickets;
    }

    pub fn set_data(&mut self, data: Option<MetaData>) {
        self.data = data;
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.passed { "passed" } else { "failed" };
        write!(f, "TestResult: {} ({})", self.fingerprint, outcome)
    }
}

impl_model_trait!(TestResult, ModelType::TestResult);

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::model::ModelTrait;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let result = TestResult::new("abc");
        let value: Value = serde_json::from_slice(&result.to_data().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({ "fingerprint": "abc", "duration": 0, "passed": true })
        );
    }

    #[test]
    fn test_empty_sets_are_serialized() {
        let mut result = TestResult::new("abc");
        result.set_tags(Some(BTreeSet::new()));
        let value: Value = serde_json::from_slice(&result.to_data().unwrap()).unwrap();
        assert_eq!(value["tags"], json!([]));
        assert!(value.get("tickets").is_none());
    }

    #[test]
    fn test_data_mut_creates_map() {
        let mut result = TestResult::new("abc");
        assert!(result.data().is_none());
        result
            .data_mut()
            .insert(DATA_JAVA_CLASS.to_string(), "Foo".to_string());
        assert_eq!(result.data_value(DATA_JAVA_CLASS), Some("Foo"));
        assert_eq!(result.to_string(), "TestResult: abc (passed)");
    }
}

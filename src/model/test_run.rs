//! Test Run Definition
//!
//! A [`TestRun`] is the unit submitted to the backend: one execution of a project's
//! test suite, described by its [`Context`], the [`Probe`] that reported it and the
//! project coordinates (ID and version).
//!
//! # Relationships
//!
//! | Field | Target | Cardinality | Notes |
//! |-------|--------|-------------|-------|
//! | `context` | Context | 1 | Owned, one per run |
//! | `probe` | Probe | 1 | Reporting tool identity |
//! | `test_reports` | TestReport | 0..N | Never absent, empty by default |
//! | `results` | TestResult | 0..N | Never absent, appended after creation |
//!
//! `data` is either absent or non-empty: the factory never stores an empty map.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{
    API_VERSION, ModelType, context::Context, metadata::MetaData, probe::Probe,
    test_report::TestReport, test_result::TestResult,
};

/// Metadata key linking a run to the report UID it attached to.
pub const DATA_REPORT_UID: &str = "probedock.report.uid";

fn default_api_version() -> String {
    API_VERSION.to_string()
}

/// Top-level submission aggregate. Build it with
/// [`create_test_run`](crate::factory::create_test_run).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    #[serde(default = "default_api_version")]
    api_version: String,
    context: Context,
    probe: Probe,
    project_id: String,
    /// Version of the project under test.
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pipeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
    #[serde(default)]
    test_reports: Vec<TestReport>,
    #[serde(default)]
    results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<MetaData>,
}

impl TestRun {
    /// Creates a run with the mandatory fields and empty report/result lists.
    ///
    /// No validation happens here; the factory is the checked entry point.
    pub fn new(
        context: Context,
        probe: Probe,
        project_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            api_version: default_api_version(),
            context,
            probe,
            project_id: project_id.into(),
            version: version.into(),
            pipeline: None,
            stage: None,
            test_reports: Vec::new(),
            results: Vec::new(),
            data: None,
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable access for post-run enrichment of the context.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn probe(&self) -> &Probe {
        &self.probe
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn test_reports(&self) -> &[TestReport] {
        &self.test_reports
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn data(&self) -> Option<&MetaData> {
        self.data.as_ref()
    }

    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key).map(String::as_str)
    }

    pub fn set_pipeline(&mut self, pipeline: Option<String>) {
        self.pipeline = pipeline;
    }

    pub fn set_stage(&mut self, stage: Option<String>) {
        self.stage = stage;
    }

    pub fn set_test_reports(&mut self, test_reports: Vec<TestReport>) {
        self.test_reports = test_reports;
    }

    pub fn set_data(&mut self, data: Option<MetaData>) {
        self.data = data;
    }

    /// Inserts one metadata entry, creating the map when absent.
    pub fn insert_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data
            .get_or_insert_with(MetaData::new)
            .insert(key.into(), value.into());
    }

    /// Appends a result to this run.
    pub fn add_test_result(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Appends several results, preserving their order.
    pub fn add_test_results(&mut self, results: impl IntoIterator<Item = TestResult>) {
        self.results.extend(results);
    }
}

impl fmt::Display for TestRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TestRun: {} {} ({} results, {} reports)",
            self.project_id,
            self.version,
            self.results.len(),
            self.test_reports.len()
        )
    }
}

impl_model_trait!(TestRun, ModelType::TestRun);

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::model::ModelTrait;

    fn sample_run() -> TestRun {
        TestRun::new(Context::new(), Probe::new("probe", "1.0"), "project", "1.2.3")
    }

    #[test]
    fn test_new_run_defaults() {
        let run = sample_run();
        assert_eq!(run.api_version(), "v1");
        assert!(run.test_reports().is_empty());
        assert!(run.results().is_empty());
        assert!(run.data().is_none());
    }

    #[test]
    fn test_results_are_appended_in_order() {
        let mut run = sample_run();
        run.add_test_result(TestResult::new("first"));
        run.add_test_results([TestResult::new("second"), TestResult::new("third")]);

        let fingerprints: Vec<&str> = run.results().iter().map(|r| r.fingerprint()).collect();
        assert_eq!(fingerprints, vec!["first", "second", "third"]);
        assert_eq!(run.to_string(), "TestRun: project 1.2.3 (3 results, 0 reports)");
    }

    #[test]
    fn test_minimal_run_json_omits_absent_fields() {
        let run = sample_run();
        let value: Value = serde_json::from_slice(&run.to_data().unwrap()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["apiVersion"], "v1");
        assert_eq!(object["projectId"], "project");
        assert_eq!(object["testReports"], Value::Array(vec![]));
        assert_eq!(object["results"], Value::Array(vec![]));
        assert!(!object.contains_key("pipeline"));
        assert!(!object.contains_key("stage"));
        assert!(!object.contains_key("data"));

        let decoded = TestRun::from_bytes(&run.to_data().unwrap()).unwrap();
        assert_eq!(decoded, run);
    }

    #[test]
    fn test_insert_data_creates_map() {
        let mut run = sample_run();
        run.insert_data(DATA_REPORT_UID, "uid");
        assert_eq!(run.data_value(DATA_REPORT_UID), Some("uid"));
        assert_eq!(run.data().map(|d| d.len()), Some(1));
    }
}

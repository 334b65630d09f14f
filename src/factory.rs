//! Model factories.
//!
//! Every submission value is built here. The factories validate mandatory fields first,
//! failing fast with a [`ModelError`] and leaving nothing half-built, then apply the
//! defaulting rules that give each optional field its presence semantics.
//!
//! # Entry points
//!
//! | Function | Builds |
//! |----------|--------|
//! | [`create_fingerprint`] | test fingerprint |
//! | [`create_context`] / [`enrich_context`] | run [`Context`] |
//! | [`create_probe`] | [`Probe`] |
//! | [`create_test_report`] | [`TestReport`] |
//! | [`create_test_result`] / [`enrich_test_result`] | [`TestResult`] |
//! | [`create_test_run`] | [`TestRun`] |
//!
//! Blank handling is per field: `key`, `category`, `pipeline` and `stage` treat blank
//! strings as absent, while `name` is stored exactly as given.

use std::collections::BTreeSet;

use crate::{
    config::Configuration,
    errors::ModelError,
    fingerprint::fingerprint,
    model::{
        context::{self, Context},
        metadata::MetaData,
        probe::Probe,
        test_report::TestReport,
        test_result::{self, TestResult},
        test_run::{DATA_REPORT_UID, TestRun},
    },
    system::{HostSystem, SystemProbe},
};

/// Longest message, in characters, kept on a test result.
pub const MESSAGE_MAX_LENGTH: usize = 50_000;

/// Marker placed in front of a truncated message.
pub const TRUNCATION_MARKER: &str = "...";

/// Message of a failed test reported without any message.
pub const NO_MESSAGE_AVAILABLE: &str = "No message available.";

/// Message of a failed test reported with an empty message.
pub const EMPTY_FAILING_MESSAGE: &str = "Failing message was empty.";

/// Raw field values of a test result, as handed over by a reporter.
///
/// Every field is taken as-is; [`create_test_result`] validates and normalizes them.
#[derive(Debug, Clone, Default)]
pub struct TestResultDraft {
    pub key: Option<String>,
    /// Mandatory.
    pub fingerprint: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Milliseconds; must not be negative.
    pub duration: i64,
    pub message: Option<String>,
    pub passed: bool,
    pub active: Option<bool>,
    pub contributors: Option<BTreeSet<String>>,
    pub tags: Option<BTreeSet<String>>,
    pub tickets: Option<BTreeSet<String>>,
    pub data: Option<MetaData>,
}

/// Raw field values of a test run.
///
/// Every field is taken as-is; [`create_test_run`] validates and normalizes them.
#[derive(Debug, Clone, Default)]
pub struct TestRunDraft {
    /// Mandatory.
    pub context: Option<Context>,
    /// Mandatory.
    pub probe: Option<Probe>,
    /// Mandatory, non-blank.
    pub project_id: Option<String>,
    /// Mandatory, non-blank.
    pub version: Option<String>,
    pub pipeline: Option<String>,
    pub stage: Option<String>,
    pub reports: Option<Vec<TestReport>>,
    pub data: Option<MetaData>,
}

/// Fingerprint of a test from its declaring type and method.
pub fn create_fingerprint(type_identifier: &str, method_identifier: &str) -> String {
    fingerprint(type_identifier, method_identifier)
}

/// Builds the run context from the current host.
pub fn create_context(config: &impl Configuration) -> Context {
    create_context_with(config, &HostSystem)
}

/// Builds the run context from the given system probe.
///
/// Platform facts land in the properties and a memory sample in the pre-properties.
/// SCM facts are written only when the configuration knows them, one key per known
/// value.
pub fn create_context_with(config: &impl Configuration, system: &impl SystemProbe) -> Context {
    let mut context = Context::new();

    let platform = system.platform();
    context.set_property(context::OS_NAME, platform.os_name);
    context.set_property(context::OS_VERSION, platform.os_version);
    context.set_property(context::OS_ARCHITECTURE, platform.os_arch);
    context.set_property(context::RUNTIME_NAME, platform.runtime_name);
    context.set_property(context::RUNTIME_VERSION, platform.runtime_version);
    context.set_property(context::RUNTIME_VENDOR, platform.runtime_vendor);
    context.set_property(context::VM_NAME, platform.vm_name);
    context.set_property(context::VM_VERSION, platform.vm_version);
    context.set_property(context::VM_VENDOR, platform.vm_vendor);
    context.set_property(context::VM_SPEC_NAME, platform.vm_spec_name);
    context.set_property(context::VM_SPEC_VERSION, platform.vm_spec_version);
    context.set_property(context::VM_SPEC_VENDOR, platform.vm_spec_vendor);
    context.set_property(context::RUNTIME_SPEC_NAME, platform.runtime_spec_name);
    context.set_property(context::RUNTIME_SPEC_VERSION, platform.runtime_spec_version);
    context.set_property(context::RUNTIME_SPEC_VENDOR, platform.runtime_spec_vendor);
    context.set_property(context::RUNTIME_CLASS_VERSION, platform.class_version);

    let memory = system.memory();
    context.set_pre_property(context::MEMORY_TOTAL, memory.total);
    context.set_pre_property(context::MEMORY_FREE, memory.free);
    context.set_pre_property(context::MEMORY_USED, memory.used());

    if let Some(scm) = config.scm_info() {
        context.set_property_if_present(context::SCM_NAME, scm.name.clone());
        context.set_property_if_present(context::SCM_VERSION, scm.version.clone());
        context.set_property_if_present(context::SCM_COMMIT, scm.commit.clone());
        context.set_property_if_present(context::SCM_BRANCH, scm.branch.clone());
        context.set_property_if_present(context::SCM_DIRTY, scm.dirty);

        if let Some(remote) = &scm.remote {
            context.set_property_if_present(context::SCM_REMOTE_NAME, remote.name.clone());
            context.set_property_if_present(
                context::SCM_REMOTE_FETCH_URL,
                remote.fetch_url.clone(),
            );
            context
                .set_property_if_present(context::SCM_REMOTE_PUSH_URL, remote.push_url.clone());
            context.set_property_if_present(context::SCM_REMOTE_AHEAD, remote.ahead);
            context.set_property_if_present(context::SCM_REMOTE_BEHIND, remote.behind);
        }
    }

    tracing::debug!(
        "created context with {} properties",
        context.properties().len()
    );
    context
}

/// Re-samples host memory into the post-properties of `context`.
pub fn enrich_context(context: &mut Context) {
    enrich_context_with(context, &HostSystem);
}

/// Re-samples memory from `system` into the post-properties of `context`, overwriting
/// any earlier sample.
pub fn enrich_context_with(context: &mut Context, system: &impl SystemProbe) {
    let memory = system.memory();
    context.set_post_property(context::MEMORY_TOTAL, memory.total);
    context.set_post_property(context::MEMORY_FREE, memory.free);
    context.set_post_property(context::MEMORY_USED, memory.used());
}

pub fn create_probe(name: impl Into<String>, version: impl Into<String>) -> Probe {
    Probe::new(name, version)
}

pub fn create_test_report(uid: impl Into<String>) -> TestReport {
    TestReport::new(uid)
}

/// Validates and assembles a test result.
///
/// # Errors
/// - [`ModelError::FingerprintMandatory`] when no fingerprint is given.
/// - [`ModelError::NegativeDuration`] when `duration < 0`.
pub fn create_test_result(draft: TestResultDraft) -> Result<TestResult, ModelError> {
    let fingerprint = draft.fingerprint.ok_or(ModelError::FingerprintMandatory)?;
    let duration = u64::try_from(draft.duration).map_err(|_| ModelError::NegativeDuration)?;

    let mut result = TestResult::new(fingerprint.clone());
    result.set_key(non_blank(draft.key));
    result.set_name(draft.name);
    result.set_category(non_blank(draft.category));
    result.set_duration(duration);
    result.set_passed(draft.passed);
    result.set_message(normalize_message(draft.message, draft.passed));
    result.set_active(draft.active);

    let has_data = draft.contributors.is_some()
        || draft.tags.is_some()
        || draft.tickets.is_some()
        || draft.data.is_some();

    result.set_contributors(draft.contributors);
    result.set_tags(draft.tags);
    result.set_tickets(draft.tickets);

    if has_data {
        let mut data = draft.data.unwrap_or_default();
        data.insert(test_result::DATA_FINGERPRINT.to_string(), fingerprint);
        result.set_data(Some(data));
    }

    tracing::debug!("created test result {}", result.fingerprint());
    Ok(result)
}

/// Records the source location of a test in the metadata of `result`.
///
/// Metadata created here starts with the `fingerprint` entry, like the metadata built by
/// [`create_test_result`]. `line` is written only when non-negative. The file path is derived from the package
/// and class name and prefixed with the configured base test path, if any.
pub fn enrich_test_result(
    config: &impl Configuration,
    result: &mut TestResult,
    package: Option<&str>,
    class: &str,
    method: &str,
    line: i64,
) {
    let path = test_file_path(config.project_base_test_path(), package, class);
    let fingerprint = result.fingerprint().to_string();

    let data = result.data_mut();
    data.entry(test_result::DATA_FINGERPRINT.to_string())
        .or_insert(fingerprint);
    if let Some(package) = package {
        data.insert(test_result::DATA_JAVA_PACKAGE.to_string(), package.to_string());
    }
    data.insert(test_result::DATA_JAVA_CLASS.to_string(), class.to_string());
    data.insert(test_result::DATA_JAVA_METHOD.to_string(), method.to_string());
    if line >= 0 {
        data.insert(test_result::DATA_FILE_LINE.to_string(), line.to_string());
    }
    data.insert(test_result::DATA_FILE_PATH.to_string(), path);

    tracing::debug!(
        "enriched test result {} with {}.{}",
        result.fingerprint(),
        class,
        method
    );
}

/// Validates and assembles a test run.
///
/// When the configuration knows a current report UID and no report was given, the run
/// attaches to that report: it gets it as sole report and records the UID under
/// [`DATA_REPORT_UID`].
///
/// # Errors
/// - [`ModelError::MissingContext`], [`ModelError::MissingProbe`],
///   [`ModelError::MissingProjectId`], [`ModelError::MissingProjectVersion`], checked in
///   that order.
pub fn create_test_run(
    config: &impl Configuration,
    draft: TestRunDraft,
) -> Result<TestRun, ModelError> {
    let context = draft.context.ok_or(ModelError::MissingContext)?;
    let probe = draft.probe.ok_or(ModelError::MissingProbe)?;
    let project_id = non_blank(draft.project_id).ok_or(ModelError::MissingProjectId)?;
    let version = non_blank(draft.version).ok_or(ModelError::MissingProjectVersion)?;

    let mut run = TestRun::new(context, probe, project_id, version);
    run.set_pipeline(non_blank(draft.pipeline));
    run.set_stage(non_blank(draft.stage));

    let reports = draft.reports.unwrap_or_default();
    let no_reports = reports.is_empty();
    run.set_test_reports(reports);
    run.set_data(draft.data.filter(|d| !d.is_empty()));

    let attached_uid = if no_reports { config.current_uid() } else { None };
    if let Some(uid) = attached_uid {
        tracing::debug!("attaching test run to report {}", uid);
        run.set_test_reports(vec![create_test_report(uid.clone())]);
        run.insert_data(DATA_REPORT_UID, uid);
    }

    tracing::debug!("created test run for project {}", run.project_id());
    Ok(run)
}

/// Blank strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_message(message: Option<String>, passed: bool) -> Option<String> {
    let message = match message {
        None if !passed => Some(NO_MESSAGE_AVAILABLE.to_string()),
        Some(m) if !passed && m.is_empty() => Some(EMPTY_FAILING_MESSAGE.to_string()),
        other => other,
    };
    message.map(truncate_message)
}

/// Keeps the last characters of an oversized message behind [`TRUNCATION_MARKER`], for
/// exactly [`MESSAGE_MAX_LENGTH`] characters in total.
fn truncate_message(message: String) -> String {
    let length = message.chars().count();
    if length <= MESSAGE_MAX_LENGTH {
        return message;
    }

    let keep = MESSAGE_MAX_LENGTH - TRUNCATION_MARKER.chars().count();
    tracing::warn!(
        "truncating test message from {} to {} characters",
        length,
        MESSAGE_MAX_LENGTH
    );
    let tail: String = message.chars().skip(length - keep).collect();
    format!("{TRUNCATION_MARKER}{tail}")
}

fn test_file_path(base: Option<&str>, package: Option<&str>, class: &str) -> String {
    let file = match package {
        Some(package) => format!("{}/{}.java", package.replace('.', "/"), class),
        None => format!("{class}.java"),
    };

    match base.filter(|b| !b.is_empty()) {
        Some(base) => {
            let base = base.replace('\\', "/");
            format!("{}/{}", base.trim_end_matches('/'), file)
        }
        None => file,
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some("  \t".to_string())), None);
        assert_eq!(non_blank(Some(" a ".to_string())), Some(" a ".to_string()));
    }

    #[test]
    fn test_normalize_message_only_defaults_failures() {
        assert_eq!(normalize_message(None, true), None);
        assert_eq!(normalize_message(Some(String::new()), true), Some(String::new()));
        assert_eq!(
            normalize_message(None, false).as_deref(),
            Some(NO_MESSAGE_AVAILABLE)
        );
        assert_eq!(
            normalize_message(Some(String::new()), false).as_deref(),
            Some(EMPTY_FAILING_MESSAGE)
        );
        assert_eq!(
            normalize_message(Some("boom".to_string()), false).as_deref(),
            Some("boom")
        );
    }

    #[test]
    fn test_truncate_keeps_tail() {
        crate::tests::init_logger();
        let message = format!("{}{}", "a".repeat(MESSAGE_MAX_LENGTH), "tail");
        let truncated = truncate_message(message);
        assert_eq!(truncated.chars().count(), MESSAGE_MAX_LENGTH);
        assert!(truncated.starts_with("...a"));
        assert!(truncated.ends_with("atail"));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let message = "é".repeat(MESSAGE_MAX_LENGTH);
        assert_eq!(truncate_message(message.clone()), message);
    }

    #[test]
    fn prop_truncated_message_never_exceeds_limit() {
        fn prop(extra: u16) -> bool {
            let length = MESSAGE_MAX_LENGTH - 10 + extra as usize;
            let truncated = truncate_message("x".repeat(length));
            let count = truncated.chars().count();
            if length > MESSAGE_MAX_LENGTH {
                count == MESSAGE_MAX_LENGTH && truncated.starts_with(TRUNCATION_MARKER)
            } else {
                count == length
            }
        }
        quickcheck(prop as fn(u16) -> bool);
    }

    #[test]
    fn test_file_path_derivation() {
        assert_eq!(test_file_path(None, None, "D"), "D.java");
        assert_eq!(test_file_path(None, Some("a.b.c"), "D"), "a/b/c/D.java");
        assert_eq!(test_file_path(Some(""), Some("a"), "D"), "a/D.java");
        assert_eq!(
            test_file_path(Some("src\\test\\java\\"), Some("a"), "D"),
            "src/test/java/a/D.java"
        );
    }
}

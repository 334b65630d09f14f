//! Probedock-Model: the client-side data model of the Probe Dock test reporting
//! system: test runs, test results, execution context and probe identity.
//!
//! Goals
//! - Build submission values that are valid by construction: mandatory fields are
//!   checked up front and rejected with a typed [`ModelError`].
//! - Keep the exact presence semantics expected by the backend (absent vs empty vs
//!   blank) so the transport layer can serialize values as-is.
//! - Keep ambient state (configuration, host facts) behind traits so that every factory
//!   is deterministic under test.
//!
//! Core Capabilities
//! - Fingerprints: SHA-1 of `type.method`, the cross-run key of a test.
//! - Context: OS/runtime facts, SCM snapshot, memory samples before and after a run.
//! - Results: message defaulting and truncation, optional collections, source-location
//!   enrichment.
//! - Runs: mandatory project coordinates, attachment to an externally tracked report.
//!
//! Modules
//! - `factory`: validating constructors and enrichment routines.
//! - `model`: value types and their JSON encoding.
//! - `config`: configuration trait and the stock JSON/environment loader.
//! - `system`: host facts behind the `SystemProbe` trait.
//! - `fingerprint`: test fingerprint hashing.
//! - `errors`: unified error type.
//!
//! Typical Usage
//! - `create_context(&config)` at run start, `enrich_context(run.context_mut())` at the end.
//! - `create_test_result(TestResultDraft { .. })` per test, then
//!   `enrich_test_result(&config, &mut result, package, class, method, line)`.
//! - `create_test_run(&config, TestRunDraft { .. })`, then `add_test_result` for each result.

pub mod config;
pub mod errors;
pub mod factory;
pub mod fingerprint;
pub mod model;
pub mod system;

pub use config::{Configuration, NoConfiguration, ProbeConfig, ScmInfo, ScmRemoteInfo};
pub use errors::ModelError;
pub use factory::{TestResultDraft, TestRunDraft};
pub use model::{
    API_VERSION, ModelTrait, ModelType,
    context::Context,
    metadata::{MetaData, MetaDataBuilder},
    probe::Probe,
    test_report::TestReport,
    test_result::TestResult,
    test_run::TestRun,
};
pub use system::{HostSystem, MemorySnapshot, PlatformInfo, SystemProbe};

#[cfg(test)]
mod tests {
    use tracing_subscriber::util::SubscriberInitExt;

    /// Installs a debug-level subscriber once for the unit tests that want log output.
    pub(crate) fn init_logger() {
        let _ = tracing_subscriber::fmt::Subscriber::builder()
            .with_target(false)
            .without_time()
            .with_level(true)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
            .try_init(); // avoid multi-init
    }
}

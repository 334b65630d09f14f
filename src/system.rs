//! Platform and runtime facts recorded in a test run context.
//!
//! The context builder never talks to the operating system directly. It asks a
//! [`SystemProbe`] for a [`PlatformInfo`] snapshot (collected once per run) and for
//! [`MemorySnapshot`]s (sampled before and after the run). [`HostSystem`] reads the
//! current host; integrations that report on behalf of another runtime, or tests that
//! need stable values, supply their own probe.

use serde::{Deserialize, Serialize};
use sysinfo::System;

const UNKNOWN: &str = "unknown";

/// Source of platform facts and memory samples.
pub trait SystemProbe: Send + Sync {
    /// Static description of the platform and runtime executing the tests.
    fn platform(&self) -> PlatformInfo;

    /// Memory usage sampled at call time.
    fn memory(&self) -> MemorySnapshot;
}

/// Static description of the operating system, runtime and virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
    pub runtime_name: String,
    pub runtime_version: String,
    pub runtime_vendor: String,
    pub vm_name: String,
    pub vm_version: String,
    pub vm_vendor: String,
    pub vm_spec_name: String,
    pub vm_spec_version: String,
    pub vm_spec_vendor: String,
    pub runtime_spec_name: String,
    pub runtime_spec_version: String,
    pub runtime_spec_vendor: String,
    /// Version of the compiled artifact format understood by the runtime.
    pub class_version: String,
}

impl PlatformInfo {
    /// Capture the platform facts of the current process.
    ///
    /// Native code runs without a virtual machine, so the VM fields describe the
    /// host kernel, the language fields describe the compiler that built this crate and
    /// the class version is the target triple of the compiled artifact.
    pub fn capture() -> Self {
        let rustc_version = build_fact("rustc version", option_env!("PROBEDOCK_RUSTC_VERSION"));
        Self {
            os_name: host_fact("os name", System::name()),
            os_version: host_fact("os version", System::os_version()),
            os_arch: std::env::consts::ARCH.to_string(),
            runtime_name: "rust".to_string(),
            runtime_version: rustc_version.clone(),
            runtime_vendor: "The Rust Project".to_string(),
            vm_name: "native".to_string(),
            vm_version: host_fact("kernel version", System::kernel_version()),
            vm_vendor: std::env::consts::FAMILY.to_string(),
            vm_spec_name: "Rust Reference".to_string(),
            vm_spec_version: rustc_version.clone(),
            vm_spec_vendor: "The Rust Project".to_string(),
            runtime_spec_name: "Rust Standard Library".to_string(),
            runtime_spec_version: rustc_version,
            runtime_spec_vendor: "The Rust Project".to_string(),
            class_version: build_fact("target triple", option_env!("PROBEDOCK_TARGET")),
        }
    }
}

fn build_fact(what: &str, value: Option<&str>) -> String {
    host_fact(what, value.map(str::to_string))
}

fn host_fact(what: &str, value: Option<String>) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => v,
        None => {
            tracing::warn!("Failed to read {}, recording `{}`", what, UNKNOWN);
            UNKNOWN.to_string()
        }
    }
}

/// Memory usage in bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub total: u64,
    pub free: u64,
}

impl MemorySnapshot {
    pub fn new(total: u64, free: u64) -> Self {
        Self { total, free }
    }

    /// Bytes in use, `total - free`.
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }
}

/// [`SystemProbe`] reading the current host through `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSystem;

impl SystemProbe for HostSystem {
    fn platform(&self) -> PlatformInfo {
        PlatformInfo::capture()
    }

    fn memory(&self) -> MemorySnapshot {
        let mut sys = System::new();
        sys.refresh_memory();
        MemorySnapshot::new(sys.total_memory(), sys.available_memory())
    }
}

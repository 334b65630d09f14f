//! Probe Dock submission model (API `v1`).
//!
//! # Shape of a submission
//!
//! ```text
//!  TestRun ─────────────────────────────────────────────
//!    │  apiVersion, projectId, version, pipeline?, stage?, data?
//!    │
//!    ├──context──▶ Context (properties / preProperties / postProperties)
//!    ├──probe────▶ Probe (name, version)
//!    ├──testReports──▶ [TestReport(uid), ...]
//!    └──results──────▶ [TestResult, ...]
//! ```
//!
//! A run either embeds freshly built [`TestResult`](test_result::TestResult)s or
//! references reports tracked elsewhere by UID. Every value here is owned by exactly one
//! run; nothing is shared between runs.
//!
//! Values are built through the [`factory`](crate::factory) functions, which apply the
//! validation and defaulting rules. Optional fields are skipped during serialization, so
//! an absent field never reaches the wire as `null`.

/// Implements [`ModelTrait`] through `serde_json` for a serializable model type.
macro_rules! impl_model_trait {
    ($ty:ty, $kind:expr) => {
        impl $crate::model::ModelTrait for $ty {
            fn from_bytes(data: &[u8]) -> Result<Self, $crate::errors::ModelError>
            where
                Self: Sized,
            {
                serde_json::from_slice(data)
                    .map_err(|e| $crate::errors::ModelError::InvalidModelInfo(e.to_string()))
            }

            fn get_type(&self) -> $crate::model::ModelType {
                $kind
            }

            fn get_size(&self) -> usize {
                match serde_json::to_vec(self) {
                    Ok(v) => v.len(),
                    Err(e) => {
                        tracing::warn!("failed to compute {} size: {}", $kind, e);
                        0
                    }
                }
            }

            fn to_data(&self) -> Result<Vec<u8>, $crate::errors::ModelError> {
                serde_json::to_vec(self)
                    .map_err(|e| $crate::errors::ModelError::InvalidModelInfo(e.to_string()))
            }
        }
    };
}

pub mod context;
pub mod metadata;
pub mod probe;
pub mod test_report;
pub mod test_result;
pub mod test_run;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Version tag of this model revision, sent as `apiVersion`.
pub const API_VERSION: &str = "v1";

/// Kinds of model values handed to the transport layer.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Context,
    Probe,
    TestReport,
    TestResult,
    TestRun,
}

impl Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Context => write!(f, "context"),
            ModelType::Probe => write!(f, "probe"),
            ModelType::TestReport => write!(f, "test_report"),
            ModelType::TestResult => write!(f, "test_result"),
            ModelType::TestRun => write!(f, "test_run"),
        }
    }
}

impl ModelType {
    /// Parses the string representation produced by `Display`.
    pub fn from_string(s: &str) -> Result<ModelType, ModelError> {
        match s {
            "context" => Ok(ModelType::Context),
            "probe" => Ok(ModelType::Probe),
            "test_report" => Ok(ModelType::TestReport),
            "test_result" => Ok(ModelType::TestResult),
            "test_run" => Ok(ModelType::TestRun),
            _ => Err(ModelError::InvalidModelInfo(format!(
                "`{s}` is not a valid model type"
            ))),
        }
    }
}

/// **The Model Trait**
/// Common interface of all submission values: JSON encoding for the transport layer.
pub trait ModelTrait: Send + Sync + Display {
    /// Decodes a value from its JSON encoding.
    fn from_bytes(data: &[u8]) -> Result<Self, ModelError>
    where
        Self: Sized;

    /// Returns the kind of the value.
    fn get_type(&self) -> ModelType;

    /// Size in bytes of the JSON encoding.
    fn get_size(&self) -> usize;

    /// Encodes the value as JSON.
    fn to_data(&self) -> Result<Vec<u8>, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_round_trips_through_display() {
        for kind in [
            ModelType::Context,
            ModelType::Probe,
            ModelType::TestReport,
            ModelType::TestResult,
            ModelType::TestRun,
        ] {
            assert_eq!(ModelType::from_string(&kind.to_string()).unwrap(), kind);
        }
        assert!(ModelType::from_string("commit").is_err());
    }
}

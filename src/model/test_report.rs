//! Reference to a report tracked outside the current submission.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ModelType;

/// Handle on a previously submitted or externally tracked report, identified by an
/// opaque UID. A run lists these instead of, or besides, inline results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct TestReport {
    uid: String,
}

impl TestReport {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestReport: {}", self.uid)
    }
}

impl_model_trait!(TestReport, ModelType::TestReport);

//! Identity of the reporting tool that produced a submission.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ModelType;

/// Name and version of the probe (the client library or plugin reporting results).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Probe {
    name: String,
    version: String,
}

impl Probe {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Probe: {} {}", self.name, self.version)
    }
}

impl_model_trait!(Probe, ModelType::Probe);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelTrait;

    #[test]
    fn test_probe_json_shape() {
        let probe = Probe::new("probedock-rust", "0.1.0");
        let data = probe.to_data().expect("encode");
        assert_eq!(
            String::from_utf8(data).unwrap(),
            r#"{"name":"probedock-rust","version":"0.1.0"}"#
        );
        assert_eq!(probe.get_type(), ModelType::Probe);
        assert_eq!(probe.to_string(), "Probe: probedock-rust 0.1.0");
    }
}

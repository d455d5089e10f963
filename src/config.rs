use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Simulation settings, stored as RON.
///
/// ```ron
/// (
///     settle_pass_limit: Some(1000),
///     log_filter: "wiregrid=debug",
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Upper bound on wire settling passes per board and tick. Wires alone always
    /// converge; the limit only stops a passthrough component that keeps asking for
    /// more passes.
    pub settle_pass_limit: Option<usize>,

    /// `tracing` filter used by the driver when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            settle_pass_limit: None,
            log_filter: "info".into(),
        }
    }
}

impl SimConfig {
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = SimConfig::from_ron_str("(settle_pass_limit: Some(16))").unwrap();
        assert_eq!(config.settle_pass_limit, Some(16));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn survives_ron_round_trip() {
        let config = SimConfig {
            settle_pass_limit: Some(3),
            log_filter: "wiregrid=trace".into(),
        };
        let text = config.to_ron_string().unwrap();
        assert_eq!(SimConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            SimConfig::from_ron_str("(settle_pass_limit: \"lots\")"),
            Err(Error::Config(_))
        ));
    }
}

//! Configuration for huffpack

use crate::error::{CompressError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Largest accepted source text, in bytes.
    pub max_input_size: usize,
    /// Decode every freshly encoded document and compare before returning it.
    pub verify_roundtrip: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            verify_roundtrip: false,
        }
    }
}

impl CompressionConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CompressError::ConfigError(e.to_string()))
    }

    /// Load a JSON config from `path`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "verify_roundtrip": true }"#;
        let config = CompressionConfig::from_json_str(json).unwrap();
        assert!(config.verify_roundtrip);
        let defaults = CompressionConfig::default();
        assert_eq!(config.max_input_size, defaults.max_input_size);
    }

    #[test]
    fn test_invalid_json() {
        let result = CompressionConfig::from_json_str("{ max_input_size: ");
        assert!(matches!(result, Err(CompressError::ConfigError(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CompressionConfig {
            max_input_size: 1024,
            verify_roundtrip: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CompressionConfig::from_json_str(&json).unwrap(), config);
    }
}

//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for cardscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardScanConfig {
    /// Scan session configuration.
    pub scan: ScanConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Scan session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum frames to feed before giving up (0 = unlimited).
    pub max_frames: usize,

    /// Delay between replayed frames, in milliseconds.
    pub frame_interval_ms: u64,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,

    /// Hide all but the last four card digits in output.
    pub mask_card_number: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            mask_card_number: true,
        }
    }
}

impl CardScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CardScanConfig =
            serde_json::from_str(r#"{"output": {"format": "csv"}}"#).unwrap();

        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.output.mask_card_number);
        assert_eq!(config.scan.frame_interval_ms, 0);
        assert_eq!(config.scan.max_frames, 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CardScanConfig::default();
        config.scan.max_frames = 30;
        config.save(&path).unwrap();

        let loaded = CardScanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.scan.max_frames, 30);
    }
}

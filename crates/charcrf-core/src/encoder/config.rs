use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CharCrfError, Result};

/// Hyperparameters of the character LSTM.
///
/// Optional fields fall back to a single bidirectional layer without dropout
/// when omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharLstmConfig {
    /// Width of each character's input vector (e.g. one-hot vocabulary size).
    pub n_chars: usize,
    /// Hidden state width per layer and direction.
    pub hidden_size: usize,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
    #[serde(default = "default_layers")]
    pub layers: usize,
    /// Dropout between stacked layers, training only.
    #[serde(default)]
    pub dropout: f32,
}

fn default_bidirectional() -> bool {
    true
}

fn default_layers() -> usize {
    1
}

impl CharLstmConfig {
    /// Single-layer bidirectional config with no dropout.
    pub fn new(n_chars: usize, hidden_size: usize) -> Self {
        Self {
            n_chars,
            hidden_size,
            bidirectional: default_bidirectional(),
            layers: default_layers(),
            dropout: 0.0,
        }
    }

    #[must_use]
    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    #[must_use]
    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
        self
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 1 or 2.
    pub fn num_directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }

    /// `layers * hidden_size * directions`.
    pub fn output_size(&self) -> usize {
        self.layers * self.hidden_size * self.num_directions()
    }

    /// Check every hyperparameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.n_chars == 0 {
            return Err(CharCrfError::InvalidConfiguration(
                "n_chars must be positive".into(),
            ));
        }
        if self.hidden_size == 0 {
            return Err(CharCrfError::InvalidConfiguration(
                "hidden_size must be positive".into(),
            ));
        }
        if self.layers == 0 {
            return Err(CharCrfError::InvalidConfiguration(
                "layers must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(CharCrfError::InvalidConfiguration(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CharLstmConfig::new(30, 25);
        assert!(config.bidirectional);
        assert_eq!(config.layers, 1);
        assert_eq!(config.dropout, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_size() {
        for layers in 1..4 {
            for hidden_size in [1, 3, 50] {
                for bidirectional in [false, true] {
                    let config = CharLstmConfig::new(10, hidden_size)
                        .with_layers(layers)
                        .with_bidirectional(bidirectional);
                    let directions = if bidirectional { 2 } else { 1 };
                    assert_eq!(config.output_size(), layers * hidden_size * directions);
                }
            }
        }
    }

    #[test]
    fn test_invalid_values() {
        let bad = [
            CharLstmConfig::new(0, 3),
            CharLstmConfig::new(5, 0),
            CharLstmConfig::new(5, 3).with_layers(0),
            CharLstmConfig::new(5, 3).with_dropout(1.0),
            CharLstmConfig::new(5, 3).with_dropout(-0.1),
            CharLstmConfig::new(5, 3).with_dropout(f32::NAN),
        ];
        for config in bad {
            assert!(
                matches!(
                    config.validate(),
                    Err(CharCrfError::InvalidConfiguration(_))
                ),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_json_defaults() {
        let config = CharLstmConfig::from_json_str(r#"{"n_chars": 80, "hidden_size": 50}"#).unwrap();
        assert_eq!(config, CharLstmConfig::new(80, 50));

        let config = CharLstmConfig::from_json_str(
            r#"{"n_chars": 80, "hidden_size": 50, "bidirectional": false, "layers": 2, "dropout": 0.25}"#,
        )
        .unwrap();
        assert!(!config.bidirectional);
        assert_eq!(config.layers, 2);
        assert_eq!(config.output_size(), 100);
    }

    #[test]
    fn test_from_json_rejects() {
        assert!(matches!(
            CharLstmConfig::from_json_str(r#"{"n_chars": 80}"#),
            Err(CharCrfError::Config(_))
        ));
        assert!(matches!(
            CharLstmConfig::from_json_str(r#"{"n_chars": 80, "hidden_size": 50, "layers": 0}"#),
            Err(CharCrfError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            CharLstmConfig::from_file("does/not/exist/config.json"),
            Err(CharCrfError::Io(_))
        ));
    }
}

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::vocabulary::Vocabulary;

// ============================================================================
// Detector constants
// ============================================================================

/// Forward-scan windows and fixed confidences of the pattern detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_dropdown_confidence")]
    pub dropdown_confidence: f64,

    #[serde(default = "default_modal_window")]
    pub modal_window: usize,
    #[serde(default = "default_modal_confidence")]
    pub modal_confidence: f64,

    #[serde(default = "default_login_window")]
    pub login_window: usize,
    #[serde(default = "default_login_confidence")]
    pub login_confidence: f64,

    #[serde(default = "default_search_window")]
    pub search_window: usize,
    #[serde(default = "default_search_confidence")]
    pub search_confidence: f64,

    #[serde(default = "default_navigation_window")]
    pub navigation_window: usize,
    #[serde(default = "default_navigation_confidence")]
    pub navigation_confidence: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            dropdown_confidence: default_dropdown_confidence(),
            modal_window: default_modal_window(),
            modal_confidence: default_modal_confidence(),
            login_window: default_login_window(),
            login_confidence: default_login_confidence(),
            search_window: default_search_window(),
            search_confidence: default_search_confidence(),
            navigation_window: default_navigation_window(),
            navigation_confidence: default_navigation_confidence(),
        }
    }
}

// Serde default helpers
fn default_dropdown_confidence() -> f64 { 0.95 }
fn default_modal_window() -> usize { 5 }
fn default_modal_confidence() -> f64 { 0.90 }
fn default_login_window() -> usize { 6 }
fn default_login_confidence() -> f64 { 1.0 }
fn default_search_window() -> usize { 10 }
fn default_search_confidence() -> f64 { 0.85 }
fn default_navigation_window() -> usize { 2 }
fn default_navigation_confidence() -> f64 { 0.95 }

// ============================================================================
// Pipeline configuration
// ============================================================================

/// Everything a pipeline run is parameterized by.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub vocabulary: Vocabulary,

    #[serde(default)]
    pub detection: DetectionConfig,
}

impl PipelineConfig {
    /// Parse a YAML document; absent keys take their defaults.
    pub fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject windows and confidences the detectors cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detection;
        let confidences = [
            ("dropdown_confidence", d.dropdown_confidence),
            ("modal_confidence", d.modal_confidence),
            ("login_confidence", d.login_confidence),
            ("search_confidence", d.search_confidence),
            ("navigation_confidence", d.navigation_confidence),
        ];
        for (name, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let windows = [
            ("modal_window", d.modal_window, 2),
            ("login_window", d.login_window, 3),
            ("search_window", d.search_window, 1),
            ("navigation_window", d.navigation_window, 1),
        ];
        for (name, value, min) in windows {
            if value < min {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at least {}, got {}",
                    name, min, value
                )));
            }
        }

        if self.vocabulary.modules.iter().any(|m| m.name.trim().is_empty()) {
            return Err(ConfigError::Invalid("module names must not be empty".to_string()));
        }
        Ok(())
    }
}

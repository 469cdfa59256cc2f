//! Renderer configuration for application-specific settings
//!
//! Applications customize the renderer through this structure instead of
//! hardcoding values in the rendering system itself. The config can be
//! built programmatically or loaded from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a renderer configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file contents were not valid TOML for this structure
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Present-mode preference for swapchain negotiation
///
/// `LowLatency` asks for a mailbox-style mode when the device offers
/// one; `Vsync` sticks with FIFO, which every device supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentPreference {
    /// Prefer mailbox (no tearing, lowest latency), fall back to FIFO
    LowLatency,
    /// Always use FIFO (vsync)
    Vsync,
}

/// Configuration for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Application name for instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Whether to enable validation layers; `None` auto-detects from the
    /// build profile. Validation is only ever active in debug builds.
    pub enable_validation: Option<bool>,
    /// Reject physical devices that are not discrete GPUs
    pub require_discrete_gpu: bool,
    /// Present-mode preference for swapchain negotiation
    pub present_preference: PresentPreference,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            application_name: "Render Engine Application".to_string(),
            application_version: (0, 1, 0),
            enable_validation: None,
            require_discrete_gpu: true,
            present_preference: PresentPreference::LowLatency,
        }
    }
}

impl RendererConfig {
    /// Create a configuration with the given application name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Set the application version
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Allow non-discrete GPUs during device selection
    pub fn allow_integrated_gpu(mut self) -> Self {
        self.require_discrete_gpu = false;
        self
    }

    /// Set the present-mode preference
    pub fn with_present_preference(mut self, preference: PresentPreference) -> Self {
        self.present_preference = preference;
        self
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Whether validation layers should be requested for this build
    pub fn validation_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_require_discrete_gpu_and_low_latency() {
        let config = RendererConfig::default();
        assert!(config.require_discrete_gpu);
        assert_eq!(config.present_preference, PresentPreference::LowLatency);
        assert_eq!(config.enable_validation, None);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = RendererConfig::from_toml_str(
            r#"
            application_name = "Demo"
            present_preference = "vsync"
            "#,
        )
        .unwrap();
        assert_eq!(config.application_name, "Demo");
        assert_eq!(config.present_preference, PresentPreference::Vsync);
        // Unspecified fields fall back to defaults
        assert!(config.require_discrete_gpu);
        assert_eq!(config.application_version, (0, 1, 0));
    }

    #[test]
    fn rejects_unknown_present_preference() {
        let result = RendererConfig::from_toml_str(r#"present_preference = "triple""#);
        assert!(result.is_err());
    }
}

//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! A configuration file declares the controller settings and an ordered list
//! of mappings:
//!
//! ```toml
//! [controller]
//! axis_threshold = 0.0
//!
//! [[mapping]]
//! inputs = ["a", "b"]
//! command = "notify-send 'combo!'"
//!
//! [[mapping]]
//! inputs = ["lefttrigger", "rightshoulder"]
//! command = "playerctl play-pause"
//! ```
//!
//! Mapping order in the file is significant: the first mapping whose inputs
//! are all held wins when several could match.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Ordered mapping records, converted into the mapping table at startup.
    #[serde(default, rename = "mapping")]
    pub mappings: Vec<MappingEntry>,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Trigger-axis activity threshold. A trigger counts as held while its
    /// reading's magnitude is strictly greater than this value. The default
    /// of 0.0 treats any non-centered reading as active; raise it if resting
    /// trigger noise fires mappings on real hardware.
    #[serde(default = "default_axis_threshold")]
    pub axis_threshold: f32,
}

/// One raw mapping record as it appears in the file.
///
/// Input names are validated against the vocabulary when the mapping table is
/// built, not here; deserialization only checks structure.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Input names that must all be held at once.
    #[serde(alias = "buttons")]
    pub inputs: Vec<String>,

    /// Shell command to run when the combination becomes active.
    pub command: String,
}

// Default value functions
fn default_axis_threshold() -> f32 { 0.0 }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            axis_threshold: default_axis_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// The load is atomic: any failure yields no configuration at all, and
    /// startup aborts before the dispatch loop runs.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padcmd::config::Config;
    ///
    /// let config = Config::load("padcmd.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.controller.axis_threshold) {
            return Err(crate::error::PadcmdError::Config(toml::de::Error::custom(
                "axis_threshold must be at least 0.0 and below 1.0",
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            controller: ControllerConfig::default(),
            mappings: vec![MappingEntry {
                inputs: vec!["a".to_string(), "b".to_string()],
                command: "true".to_string(),
            }],
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = create_valid_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_axis_threshold_is_zero() {
        // Any non-centered trigger reading counts as active by default
        assert_eq!(default_axis_threshold(), 0.0);
        assert_eq!(ControllerConfig::default().axis_threshold, 0.0);
    }

    #[test]
    fn test_negative_axis_threshold_rejected() {
        let mut config = create_valid_config();
        config.controller.axis_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_threshold_of_one_rejected() {
        // A threshold of 1.0 could never be exceeded
        let mut config = create_valid_config();
        config.controller.axis_threshold = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_threshold_upper_range_valid() {
        let mut config = create_valid_config();
        config.controller.axis_threshold = 0.99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[controller]
axis_threshold = 0.05

[[mapping]]
inputs = ["a", "b"]
command = "notify-send hi"

[[mapping]]
inputs = ["lefttrigger"]
command = "true"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.controller.axis_threshold, 0.05);
        assert_eq!(config.mappings.len(), 2);
        assert_eq!(config.mappings[0].inputs, vec!["a", "b"]);
        assert_eq!(config.mappings[0].command, "notify-send hi");
    }

    #[test]
    fn test_load_accepts_buttons_alias() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        // The original configuration key for an input list
        let toml_content = r#"
[[mapping]]
buttons = ["x", "y"]
command = "true"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.mappings[0].inputs, vec!["x", "y"]);
    }

    #[test]
    fn test_load_empty_file_gives_defaults() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"").unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.controller.axis_threshold, 0.0);
        assert!(config.mappings.is_empty());
    }

    #[test]
    fn test_load_missing_command_field_fails() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[[mapping]]
inputs = ["a"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load("/nonexistent/padcmd-test-config.toml");
        assert!(matches!(result, Err(crate::error::PadcmdError::Io(_))));
    }
}

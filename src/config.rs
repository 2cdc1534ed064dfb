//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{PadMapperError, Result};

/// Baud rates the gamepad bridge firmware accepts
pub const SUPPORTED_BAUD_RATES: [u32; 4] = [115_200, 230_400, 460_800, 921_600];

/// Report rates matching common USB polling intervals
pub const SUPPORTED_REPORT_RATES_HZ: [u32; 5] = [60, 125, 250, 500, 1000];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub controller: ControllerConfig,
    pub mapping: MappingConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// evdev node; empty means auto-detect
    #[serde(default)]
    pub device_path: String,
}

/// Mapping profile configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    #[serde(default = "default_profile_path")]
    pub profile_path: String,

    #[serde(default)]
    pub save_on_exit: bool,
}

/// Bridge output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Serial device; empty means auto-detect
    #[serde(default = "default_serial_port")]
    pub serial_port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_report_rate_hz")]
    pub report_rate_hz: u32,
}

/// Telemetry configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,

    #[serde(default = "default_log_interval_ms")]
    pub log_interval_ms: u64,
}

// Default value functions
fn default_profile_path() -> String { "profiles/dualsense.ini".to_string() }

fn default_serial_port() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { 115_200 }
fn default_report_rate_hz() -> u32 { 250 }

fn default_telemetry_enabled() -> bool { true }
fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }
fn default_log_interval_ms() -> u64 { 100 }

fn config_error(msg: impl std::fmt::Display) -> PadMapperError {
    PadMapperError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_mapper::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Interval between two reports sent to the bridge
    pub fn report_interval(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.output.report_rate_hz))
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.mapping.profile_path.trim().is_empty() {
            return Err(config_error("mapping profile_path cannot be empty"));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.output.baud_rate) {
            return Err(config_error(
                "baud_rate must be one of: 115200, 230400, 460800, 921600",
            ));
        }

        if !SUPPORTED_REPORT_RATES_HZ.contains(&self.output.report_rate_hz) {
            return Err(config_error(
                "report_rate_hz must be one of: 60, 125, 250, 500, 1000",
            ));
        }

        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(config_error("telemetry log_dir cannot be empty when enabled"));
        }

        if self.telemetry.log_interval_ms == 0 || self.telemetry.log_interval_ms > 60000 {
            return Err(config_error("log_interval_ms must be between 1 and 60000"));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(config_error("max_records_per_file must be greater than 0"));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(config_error("max_files_to_keep must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            controller: ControllerConfig {
                device_path: String::new(),
            },
            mapping: MappingConfig {
                profile_path: default_profile_path(),
                save_on_exit: false,
            },
            output: OutputConfig {
                serial_port: default_serial_port(),
                baud_rate: default_baud_rate(),
                report_rate_hz: default_report_rate_hz(),
            },
            telemetry: TelemetryConfig {
                enabled: default_telemetry_enabled(),
                log_dir: default_log_dir(),
                max_records_per_file: default_max_records_per_file(),
                max_files_to_keep: default_max_files_to_keep(),
                log_interval_ms: default_log_interval_ms(),
            },
        }
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[controller]

[mapping]
profile_path = "profiles/pad.ini"
save_on_exit = true

[output]
serial_port = "/dev/ttyUSB0"

[telemetry]
enabled = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.mapping.profile_path, "profiles/pad.ini");
        assert!(config.mapping.save_on_exit);
        assert_eq!(config.output.serial_port, "/dev/ttyUSB0");
        assert_eq!(config.output.baud_rate, 115_200);
        assert_eq!(config.output.report_rate_hz, 250);
        assert!(!config.telemetry.enabled);
        assert!(config.controller.device_path.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/pad-mapper.toml");
        assert!(matches!(result, Err(PadMapperError::Io(_))));
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let result = Config::from_toml("[controller]\n[mapping]\n[output]\n");
        assert!(matches!(result, Err(PadMapperError::Config(_))));
    }

    #[test]
    fn test_shipped_default_config_is_valid() {
        let config = Config::from_toml(include_str!("../config/default.toml")).unwrap();
        assert_eq!(config.output.report_rate_hz, default_report_rate_hz());
    }

    #[test]
    fn test_empty_profile_path() {
        let mut config = create_valid_config();
        config.mapping.profile_path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_serial_port_means_auto_detect() {
        let mut config = create_valid_config();
        config.output.serial_port = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_valid_baud_rates() {
        let mut config = create_valid_config();
        for rate in SUPPORTED_BAUD_RATES {
            config.output.baud_rate = rate;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", rate);
        }
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = create_valid_config();
        config.output.baud_rate = 420_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("baud_rate"));
    }

    #[test]
    fn test_valid_report_rates() {
        let mut config = create_valid_config();
        for rate in SUPPORTED_REPORT_RATES_HZ {
            config.output.report_rate_hz = rate;
            assert!(config.validate().is_ok(), "Report rate {} should be valid", rate);
        }
    }

    #[test]
    fn test_invalid_report_rate() {
        let mut config = create_valid_config();
        config.output.report_rate_hz = 0;
        assert!(config.validate().is_err());

        config.output.report_rate_hz = 150;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_report_interval() {
        let mut config = create_valid_config();
        config.output.report_rate_hz = 250;
        assert_eq!(config.report_interval(), std::time::Duration::from_millis(4));

        config.output.report_rate_hz = 1000;
        assert_eq!(config.report_interval(), std::time::Duration::from_millis(1));
    }

    #[test]
    fn test_empty_log_dir_when_enabled() {
        let mut config = create_valid_config();
        config.telemetry.enabled = true;
        config.telemetry.log_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_when_disabled() {
        let mut config = create_valid_config();
        config.telemetry.enabled = false;
        config.telemetry.log_dir = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_interval_zero() {
        let mut config = create_valid_config();
        config.telemetry.log_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_interval_too_high() {
        let mut config = create_valid_config();
        config.telemetry.log_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_records_per_file_zero() {
        let mut config = create_valid_config();
        config.telemetry.max_records_per_file = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_files_to_keep_zero() {
        let mut config = create_valid_config();
        config.telemetry.max_files_to_keep = 0;
        assert!(config.validate().is_err());
    }
}

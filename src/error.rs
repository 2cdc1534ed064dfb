//! # Error Types
//!
//! Custom error types for Pad Mapper using `thiserror`.
//!
//! Profile deserialization never produces these: malformed entries are
//! reported through [`LoadReport`](crate::mapping::mapper::LoadReport) instead.

use thiserror::Error;

/// Main error type for Pad Mapper
#[derive(Debug, Error)]
pub enum PadMapperError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Controller access errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No supported controller attached
    #[error("No supported controller found")]
    ControllerNotFound,

    /// Serial bridge errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial ports could be opened
    #[error("Serial port not found (tried: {0})")]
    SerialPortNotFound(String),

    /// Telemetry recorder errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Result type alias for Pad Mapper
pub type Result<T> = std::result::Result<T, PadMapperError>;

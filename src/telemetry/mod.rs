//! # Telemetry Module
//!
//! Records the virtual gamepad state to JSONL files with rotation.
//!
//! This module handles:
//! - Formatting state snapshots as JSONL (JSON Lines)
//! - Writing to rotating log files (max N records per file)
//! - Retaining only the last M files

pub mod recorder;

pub use recorder::StateRecorder;

//! # Mapping Module
//!
//! The mapping and calibration engine.
//!
//! This module handles:
//! - The virtual XInput channel vocabulary
//! - Per-channel calibration records (source, range, deadzone)
//! - Assignment and get-or-create lookup of records
//! - Conversion to and from flat `key=value` mapping profiles

pub mod xinput;
pub mod calibration;
pub mod store;
pub mod mapper;
pub mod profile;

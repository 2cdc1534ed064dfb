//! # Controller Module
//!
//! Physical device families and their input handling.
//!
//! This module handles:
//! - The seams between devices and the mapping engine ([`input`])
//! - PS5 DualSense detection and connection via evdev
//! - Parsing evdev events into controller state
//! - Generic numbered-control joysticks
//!
//! Each family implements [`DeviceFamily`], naming its physical input type
//! and supplying its default mapping.

pub mod input;
pub mod dualsense;
pub mod events;
pub mod generic;

use crate::mapping::mapper::{Dictionary, InputMapper, LoadReport};
use input::PhysicalInput;

/// A family of physical devices sharing one control vocabulary.
pub trait DeviceFamily {
    /// Controls of this family.
    type Input: PhysicalInput + 'static;

    /// Short identifier used in configuration and logs.
    const NAME: &'static str;

    /// Mapping used when no profile exists for the device.
    fn default_mapper() -> InputMapper<Self::Input>;

    /// Builds a mapper from a loaded profile, resolving source names with
    /// this family's vocabulary.
    fn load_mapper(data: &Dictionary) -> (InputMapper<Self::Input>, LoadReport) {
        InputMapper::from_dictionary(data)
    }
}

//! # Physical Input Abstractions
//!
//! Seams between a device family and the mapping engine.
//!
//! A device family names its controls with a type implementing
//! [`PhysicalInput`]; the name resolution is explicit so that mapping
//! profiles can be parsed without any runtime type inspection. A live device
//! exposes its current readings through [`SampleSource`].

use std::fmt::Debug;
use std::hash::Hash;

/// A control on a physical device family (an axis, a button, a trigger).
///
/// # Examples
///
/// ```
/// use pad_mapper::controller::input::PhysicalInput;
/// use pad_mapper::controller::dualsense::DualSenseInput;
///
/// let input = DualSenseInput::from_name("LeftStickX").unwrap();
/// assert_eq!(input.name(), "LeftStickX");
/// assert!(DualSenseInput::from_name("Bogus").is_none());
/// ```
pub trait PhysicalInput: Copy + Eq + Hash + Debug {
    /// Canonical name written into mapping profiles.
    fn name(&self) -> String;

    /// Resolves a canonical name back to an input. Returns `None` for names
    /// this device family does not know.
    fn from_name(name: &str) -> Option<Self>;
}

/// Position of a D-pad (hat switch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HatState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HatState {
    /// Builds a hat state from evdev-style axis values (-1/0/1 per axis).
    ///
    /// # Examples
    ///
    /// ```
    /// use pad_mapper::controller::input::HatState;
    ///
    /// let hat = HatState::from_axes(-1, 1);
    /// assert!(hat.left && hat.down);
    /// assert!(!hat.right && !hat.up);
    /// ```
    #[must_use]
    pub fn from_axes(x: i32, y: i32) -> Self {
        Self {
            up: y < 0,
            down: y > 0,
            left: x < 0,
            right: x > 0,
        }
    }
}

/// Current readings of a physical device.
///
/// Samples are normalized by the device layer to `0.0..=1.0`.
#[cfg_attr(test, mockall::automock)]
pub trait SampleSource<P: PhysicalInput + 'static> {
    /// Normalized value of `input`, or `None` if the device has no reading.
    fn sample(&self, input: P) -> Option<f64>;

    /// State of the hat switch at `index`, if the device has one.
    fn hat(&self, _index: usize) -> Option<HatState> {
        None
    }
}

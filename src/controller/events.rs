//! # Controller Event Processing
//!
//! Parses raw evdev events from the PS5 DualSense controller into a
//! [`DualSenseState`], which the mapping engine samples through
//! [`SampleSource`].
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Range |
//! |------|------------|-------|
//! | Left Stick X | ABS_X | 0-255 |
//! | Left Stick Y | ABS_Y | 0-255 |
//! | Right Stick X | ABS_Z | 0-255 |
//! | Right Stick Y | ABS_RZ | 0-255 |
//! | L2 Trigger | ABS_RX | 0-255 |
//! | R2 Trigger | ABS_RY | 0-255 |
//! | D-Pad X | ABS_HAT0X | -1/0/1 |
//! | D-Pad Y | ABS_HAT0Y | -1/0/1 |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code |
//! |--------|------------|
//! | Cross (×) | BTN_SOUTH |
//! | Circle (○) | BTN_EAST |
//! | Square (□) | BTN_WEST |
//! | Triangle (△) | BTN_NORTH |
//! | L1 / R1 | BTN_TL / BTN_TR |
//! | L2 / R2 (click) | BTN_TL2 / BTN_TR2 |
//! | Share / Options / PS | BTN_SELECT / BTN_START / BTN_MODE |
//! | L3 / R3 | BTN_THUMBL / BTN_THUMBR |
//! | Touchpad | BTN_TOUCH |
//!
//! ## Usage
//!
//! ```no_run
//! use pad_mapper::controller::dualsense::{DualSense, DualSenseController};
//! use pad_mapper::controller::events::EventProcessor;
//! use pad_mapper::controller::DeviceFamily;
//!
//! let mut controller = DualSenseController::open()?;
//! let mut processor = EventProcessor::new();
//! let mapper = DualSense::default_mapper();
//!
//! loop {
//!     for event in controller.fetch_events()? {
//!         processor.process_event(&event);
//!     }
//!     let output = mapper.evaluate(processor.state());
//!     // Hand output to the virtual controller sink...
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use evdev::{AbsoluteAxisType, InputEvent, Key};

use super::dualsense::DualSenseInput;
use super::input::{HatState, SampleSource};
use crate::mapping::calibration::normalize;

/// Raw axis value range from DualSense controller.
pub const AXIS_MIN: i32 = 0;
/// Raw axis value range from DualSense controller.
pub const AXIS_MAX: i32 = 255;
/// Raw axis center value.
pub const AXIS_CENTER: i32 = 128;

/// D-Pad axis value when released.
pub const DPAD_RELEASED: i32 = 0;

/// Index of the DualSense's only hat switch.
pub const DUALSENSE_HAT_INDEX: usize = 0;

/// Raw state of the PS5 DualSense controller.
///
/// Analog values are stored as raw evdev values (0-255 for sticks/triggers,
/// -1/0/1 for d-pad). Normalization happens when the mapping engine samples
/// the state.
///
/// # Examples
///
/// ```
/// use pad_mapper::controller::events::DualSenseState;
///
/// let state = DualSenseState::default();
/// assert_eq!(state.left_stick_x, 128);  // Centered
/// assert!(!state.btn_l1);               // Not pressed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualSenseState {
    // Analog sticks (0-255, 128 = center)
    /// Left stick X axis. 0 = full left, 255 = full right.
    pub left_stick_x: i32,
    /// Left stick Y axis. 0 = full up, 255 = full down.
    pub left_stick_y: i32,
    /// Right stick X axis. 0 = full left, 255 = full right.
    pub right_stick_x: i32,
    /// Right stick Y axis. 0 = full up, 255 = full down.
    pub right_stick_y: i32,

    // Triggers (0-255)
    pub trigger_l2: i32,
    pub trigger_r2: i32,

    // D-Pad (-1, 0, 1)
    /// D-Pad X axis. -1 = left, 0 = center, 1 = right.
    pub dpad_x: i32,
    /// D-Pad Y axis. -1 = up, 0 = center, 1 = down.
    pub dpad_y: i32,

    pub btn_cross: bool,
    pub btn_circle: bool,
    pub btn_square: bool,
    pub btn_triangle: bool,
    pub btn_l1: bool,
    pub btn_r1: bool,
    pub btn_l2: bool,
    pub btn_r2: bool,
    pub btn_share: bool,
    pub btn_options: bool,
    pub btn_ps: bool,
    pub btn_l3: bool,
    pub btn_r3: bool,
    pub btn_touchpad: bool,
}

impl Default for DualSenseState {
    /// Creates a new controller state with all sticks centered and buttons released.
    fn default() -> Self {
        Self {
            left_stick_x: AXIS_CENTER,
            left_stick_y: AXIS_CENTER,
            right_stick_x: AXIS_CENTER,
            right_stick_y: AXIS_CENTER,

            trigger_l2: AXIS_MIN,
            trigger_r2: AXIS_MIN,

            dpad_x: DPAD_RELEASED,
            dpad_y: DPAD_RELEASED,

            btn_cross: false,
            btn_circle: false,
            btn_square: false,
            btn_triangle: false,
            btn_l1: false,
            btn_r1: false,
            btn_l2: false,
            btn_r2: false,
            btn_share: false,
            btn_options: false,
            btn_ps: false,
            btn_l3: false,
            btn_r3: false,
            btn_touchpad: false,
        }
    }
}

impl DualSenseState {
    /// Creates a new controller state with default (centered/released) values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn button(pressed: bool) -> f64 {
        if pressed {
            1.0
        } else {
            0.0
        }
    }

    fn axis(raw: i32) -> f64 {
        normalize(raw, AXIS_MIN, AXIS_MAX)
    }
}

impl SampleSource<DualSenseInput> for DualSenseState {
    fn sample(&self, input: DualSenseInput) -> Option<f64> {
        let hat = HatState::from_axes(self.dpad_x, self.dpad_y);
        let value = match input {
            DualSenseInput::LeftStickX => Self::axis(self.left_stick_x),
            DualSenseInput::LeftStickY => Self::axis(self.left_stick_y),
            DualSenseInput::RightStickX => Self::axis(self.right_stick_x),
            DualSenseInput::RightStickY => Self::axis(self.right_stick_y),
            DualSenseInput::L2Trigger => Self::axis(self.trigger_l2),
            DualSenseInput::R2Trigger => Self::axis(self.trigger_r2),
            DualSenseInput::Cross => Self::button(self.btn_cross),
            DualSenseInput::Circle => Self::button(self.btn_circle),
            DualSenseInput::Square => Self::button(self.btn_square),
            DualSenseInput::Triangle => Self::button(self.btn_triangle),
            DualSenseInput::L1 => Self::button(self.btn_l1),
            DualSenseInput::R1 => Self::button(self.btn_r1),
            DualSenseInput::L2 => Self::button(self.btn_l2),
            DualSenseInput::R2 => Self::button(self.btn_r2),
            DualSenseInput::Share => Self::button(self.btn_share),
            DualSenseInput::Options => Self::button(self.btn_options),
            DualSenseInput::PS => Self::button(self.btn_ps),
            DualSenseInput::L3 => Self::button(self.btn_l3),
            DualSenseInput::R3 => Self::button(self.btn_r3),
            DualSenseInput::Touchpad => Self::button(self.btn_touchpad),
            DualSenseInput::DPadUp => Self::button(hat.up),
            DualSenseInput::DPadDown => Self::button(hat.down),
            DualSenseInput::DPadLeft => Self::button(hat.left),
            DualSenseInput::DPadRight => Self::button(hat.right),
        };
        Some(value)
    }

    fn hat(&self, index: usize) -> Option<HatState> {
        (index == DUALSENSE_HAT_INDEX).then(|| HatState::from_axes(self.dpad_x, self.dpad_y))
    }
}

/// Parses raw evdev events and maintains controller state.
///
/// Not thread-safe. Use from a single task/thread only.
#[derive(Debug, Default)]
pub struct EventProcessor {
    state: DualSenseState,
}

impl EventProcessor {
    /// Creates a new event processor with default controller state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the current controller state.
    #[must_use]
    pub fn state(&self) -> &DualSenseState {
        &self.state
    }

    /// Processes a single evdev input event and updates internal state.
    ///
    /// Handles absolute axis events (sticks, triggers, d-pad) and key events
    /// (buttons). Everything else is ignored.
    pub fn process_event(&mut self, event: &InputEvent) {
        match event.kind() {
            evdev::InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
            }
            evdev::InputEventKind::Key(key) => {
                self.process_key_event(key, event.value() != 0);
            }
            _ => {
                // Ignore sync events and other event types
            }
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        match axis {
            AbsoluteAxisType::ABS_X => self.state.left_stick_x = value,
            AbsoluteAxisType::ABS_Y => self.state.left_stick_y = value,

            // DualSense reports the right stick on ABS_Z and ABS_RZ
            AbsoluteAxisType::ABS_Z => self.state.right_stick_x = value,
            AbsoluteAxisType::ABS_RZ => self.state.right_stick_y = value,

            // and the analog triggers on ABS_RX and ABS_RY
            AbsoluteAxisType::ABS_RX => self.state.trigger_l2 = value,
            AbsoluteAxisType::ABS_RY => self.state.trigger_r2 = value,

            AbsoluteAxisType::ABS_HAT0X => self.state.dpad_x = value,
            AbsoluteAxisType::ABS_HAT0Y => self.state.dpad_y = value,

            _ => {
                // Ignore other axes (gyro, accelerometer, etc.)
            }
        }
    }

    fn process_key_event(&mut self, key: Key, pressed: bool) {
        match key {
            Key::BTN_SOUTH => self.state.btn_cross = pressed,
            Key::BTN_EAST => self.state.btn_circle = pressed,
            Key::BTN_WEST => self.state.btn_square = pressed,
            Key::BTN_NORTH => self.state.btn_triangle = pressed,

            Key::BTN_TL => self.state.btn_l1 = pressed,
            Key::BTN_TR => self.state.btn_r1 = pressed,
            Key::BTN_TL2 => self.state.btn_l2 = pressed,
            Key::BTN_TR2 => self.state.btn_r2 = pressed,

            Key::BTN_SELECT => self.state.btn_share = pressed,
            Key::BTN_START => self.state.btn_options = pressed,
            Key::BTN_MODE => self.state.btn_ps = pressed,

            Key::BTN_THUMBL => self.state.btn_l3 = pressed,
            Key::BTN_THUMBR => self.state.btn_r3 = pressed,

            Key::BTN_TOUCH => self.state.btn_touchpad = pressed,

            _ => {
                // Ignore unknown buttons
            }
        }
    }

    /// Resets all state to default (centered sticks, released buttons).
    ///
    /// Used when the controller reconnects.
    pub fn reset(&mut self) {
        self.state = DualSenseState::default();
    }
}

//! # Virtual Controller Inputs
//!
//! The closed set of channels exposed by the virtual Xbox 360 (XInput)
//! controller. The canonical names returned by [`XInputType::name`] are the
//! keys used in persisted mapping profiles and must not change.
//!
//! ## Value Domain
//!
//! Every virtual channel carries a value in `0.0..=1.0`:
//!
//! | Kind | Channels | Neutral |
//! |------|----------|---------|
//! | Button | A, B, X, Y, L1, R1, L3, R3, Start, Back, Home | 0.0 |
//! | DPad | UP, DOWN, LEFT, RIGHT | 0.0 |
//! | Axis | LX, LY, RX, RY | 0.5 |
//! | Trigger | L2, R2 | 0.0 |

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::controller::input::HatState;

/// Number of virtual controller channels.
pub const XINPUT_TYPE_COUNT: usize = 21;

/// Neutral value for centered stick axes.
pub const AXIS_NEUTRAL: f64 = 0.5;

/// Neutral value for buttons, D-pad directions and triggers.
pub const RELEASED: f64 = 0.0;

/// Category of a virtual channel, which decides its neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Digital face, shoulder, stick-click and system buttons.
    Button,
    /// Digital D-pad directions.
    DPad,
    /// Stick axes, centered at rest.
    Axis,
    /// Analog triggers, released at rest.
    Trigger,
}

impl InputKind {
    /// Value the channel reports when nothing drives it.
    #[must_use]
    pub fn neutral(self) -> f64 {
        match self {
            InputKind::Axis => AXIS_NEUTRAL,
            InputKind::Button | InputKind::DPad | InputKind::Trigger => RELEASED,
        }
    }
}

/// A channel of the virtual XInput controller.
///
/// Declaration order is the iteration order of the mapping store and of
/// [`XInputType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum XInputType {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L3,
    R3,
    Start,
    Back,
    Home,
    Up,
    Down,
    Left,
    Right,
    LX,
    LY,
    RX,
    RY,
    L2,
    R2,
}

impl XInputType {
    /// All virtual channels in declaration order.
    pub const ALL: [XInputType; XINPUT_TYPE_COUNT] = [
        XInputType::A,
        XInputType::B,
        XInputType::X,
        XInputType::Y,
        XInputType::L1,
        XInputType::R1,
        XInputType::L3,
        XInputType::R3,
        XInputType::Start,
        XInputType::Back,
        XInputType::Home,
        XInputType::Up,
        XInputType::Down,
        XInputType::Left,
        XInputType::Right,
        XInputType::LX,
        XInputType::LY,
        XInputType::RX,
        XInputType::RY,
        XInputType::L2,
        XInputType::R2,
    ];

    /// Canonical profile name of the channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use pad_mapper::mapping::xinput::XInputType;
    ///
    /// assert_eq!(XInputType::LX.name(), "LX");
    /// assert_eq!(XInputType::Up.name(), "UP");
    /// ```
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            XInputType::A => "A",
            XInputType::B => "B",
            XInputType::X => "X",
            XInputType::Y => "Y",
            XInputType::L1 => "L1",
            XInputType::R1 => "R1",
            XInputType::L3 => "L3",
            XInputType::R3 => "R3",
            XInputType::Start => "Start",
            XInputType::Back => "Back",
            XInputType::Home => "Home",
            XInputType::Up => "UP",
            XInputType::Down => "DOWN",
            XInputType::Left => "LEFT",
            XInputType::Right => "RIGHT",
            XInputType::LX => "LX",
            XInputType::LY => "LY",
            XInputType::RX => "RX",
            XInputType::RY => "RY",
            XInputType::L2 => "L2",
            XInputType::R2 => "R2",
        }
    }

    /// Resolves a canonical profile name. Matching is exact.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|input| input.name() == name)
    }

    /// Category of the channel.
    #[must_use]
    pub fn kind(self) -> InputKind {
        match self {
            XInputType::Up | XInputType::Down | XInputType::Left | XInputType::Right => {
                InputKind::DPad
            }
            XInputType::LX | XInputType::LY | XInputType::RX | XInputType::RY => InputKind::Axis,
            XInputType::L2 | XInputType::R2 => InputKind::Trigger,
            _ => InputKind::Button,
        }
    }

    /// Sentinel stored as min and max of a channel nobody drives.
    ///
    /// Equal to the channel's neutral value, so a disabled record both
    /// serializes consistently and evaluates to rest.
    #[must_use]
    pub fn disable_value(self) -> f64 {
        self.kind().neutral()
    }

    /// Position of the channel in [`XInputType::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for XInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a profile key is not a virtual channel name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown XInput channel '{0}'")]
pub struct UnknownXInputType(pub String);

impl FromStr for XInputType {
    type Err = UnknownXInputType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownXInputType(s.to_string()))
    }
}

/// Calibrated values of every virtual channel at one instant.
///
/// # Examples
///
/// ```
/// use pad_mapper::mapping::xinput::{XInputState, XInputType};
///
/// let mut state = XInputState::neutral();
/// assert_eq!(state.get(XInputType::LX), 0.5);
///
/// state.set(XInputType::A, 1.0);
/// assert!(state.is_pressed(XInputType::A));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XInputState {
    values: [f64; XINPUT_TYPE_COUNT],
}

impl Default for XInputState {
    fn default() -> Self {
        Self::neutral()
    }
}

impl XInputState {
    /// Threshold above which a digital channel counts as pressed.
    pub const PRESS_THRESHOLD: f64 = 0.5;

    /// State with every channel at its neutral value.
    #[must_use]
    pub fn neutral() -> Self {
        let mut values = [RELEASED; XINPUT_TYPE_COUNT];
        for input in XInputType::ALL {
            values[input.index()] = input.kind().neutral();
        }
        Self { values }
    }

    #[must_use]
    pub fn get(&self, input: XInputType) -> f64 {
        self.values[input.index()]
    }

    pub fn set(&mut self, input: XInputType, value: f64) {
        self.values[input.index()] = value;
    }

    /// True when a digital channel is above [`Self::PRESS_THRESHOLD`].
    #[must_use]
    pub fn is_pressed(&self, input: XInputType) -> bool {
        self.get(input) > Self::PRESS_THRESHOLD
    }

    /// Overwrites the four D-pad channels from a hat switch.
    pub fn set_dpad(&mut self, hat: HatState) {
        let level = |pressed: bool| if pressed { 1.0 } else { RELEASED };
        self.set(XInputType::Up, level(hat.up));
        self.set(XInputType::Down, level(hat.down));
        self.set(XInputType::Left, level(hat.left));
        self.set(XInputType::Right, level(hat.right));
    }

    /// Iterates channels with their values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (XInputType, f64)> + '_ {
        XInputType::ALL
            .into_iter()
            .map(move |input| (input, self.get(input)))
    }
}

impl Serialize for XInputState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(XINPUT_TYPE_COUNT))?;
        for (input, value) in self.iter() {
            map.serialize_entry(input.name(), &value)?;
        }
        map.end()
    }
}

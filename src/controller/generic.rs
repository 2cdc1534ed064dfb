//! # Generic Joystick Family
//!
//! Device family for HID joysticks whose controls are only known by index:
//! `Axis1`..`Axis255`, `Slider1`.., `Button1`... Numbering is 1-based in
//! profile names; index 0 is not representable.

use std::num::NonZeroU8;

use super::input::{HatState, PhysicalInput, SampleSource};
use super::DeviceFamily;
use crate::mapping::calibration::CalibrationRecord;
use crate::mapping::mapper::InputMapper;
use crate::mapping::xinput::XInputType;

/// Default deadzone applied to generic joystick axes.
const AXIS_DEADZONE: f64 = 0.05;

/// A numbered control of a generic joystick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericInput {
    Axis(NonZeroU8),
    Slider(NonZeroU8),
    Button(NonZeroU8),
}

impl GenericInput {
    fn prefix(self) -> &'static str {
        match self {
            GenericInput::Axis(_) => "Axis",
            GenericInput::Slider(_) => "Slider",
            GenericInput::Button(_) => "Button",
        }
    }

    /// 1-based number as written in profile names.
    #[must_use]
    pub fn number(self) -> NonZeroU8 {
        match self {
            GenericInput::Axis(n) | GenericInput::Slider(n) | GenericInput::Button(n) => n,
        }
    }

    /// 0-based index into the joystick's readings.
    fn index(self) -> usize {
        usize::from(self.number().get() - 1)
    }
}

impl PhysicalInput for GenericInput {
    fn name(&self) -> String {
        format!("{}{}", self.prefix(), self.number())
    }

    /// Accepts `<Prefix><n>` with `n` in `1..=255` written without leading
    /// zeros or sign, which is exactly what [`PhysicalInput::name`] emits.
    fn from_name(name: &str) -> Option<Self> {
        let constructors: [(&str, fn(NonZeroU8) -> GenericInput); 3] = [
            ("Axis", GenericInput::Axis),
            ("Slider", GenericInput::Slider),
            ("Button", GenericInput::Button),
        ];

        constructors.into_iter().find_map(|(prefix, make)| {
            let digits = name.strip_prefix(prefix)?;
            let number: NonZeroU8 = digits.parse().ok()?;
            (number.to_string() == digits).then(|| make(number))
        })
    }
}

/// The generic joystick device family.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericJoystick;

impl DeviceFamily for GenericJoystick {
    type Input = GenericInput;

    const NAME: &'static str = "generic";

    /// Axes 1-4 drive the sticks, axes 5-6 the triggers, buttons 1-10 the
    /// face, shoulder, system and stick-click buttons, and hat 0 the D-pad.
    fn default_mapper() -> InputMapper<GenericInput> {
        let mut mapper = InputMapper::new();

        let axes = [XInputType::LX, XInputType::LY, XInputType::RX, XInputType::RY];
        for (number, input) in numbers_from(1).zip(axes) {
            mapper.set_mapping(
                input,
                CalibrationRecord::new(GenericInput::Axis(number), 0.0, 1.0, AXIS_DEADZONE),
            );
        }

        for (number, input) in numbers_from(5).zip([XInputType::L2, XInputType::R2]) {
            mapper.set_mapping(
                input,
                CalibrationRecord::new(GenericInput::Axis(number), 0.0, 1.0, 0.0),
            );
        }

        let buttons = [
            XInputType::A,
            XInputType::B,
            XInputType::X,
            XInputType::Y,
            XInputType::L1,
            XInputType::R1,
            XInputType::Back,
            XInputType::Start,
            XInputType::L3,
            XInputType::R3,
        ];
        for (number, input) in numbers_from(1).zip(buttons) {
            mapper.set_mapping(
                input,
                CalibrationRecord::new(GenericInput::Button(number), 0.0, 1.0, 0.0),
            );
        }

        mapper.settings.selected_dpad = 0;
        mapper
    }
}

fn numbers_from(first: u8) -> impl Iterator<Item = NonZeroU8> {
    (first..=u8::MAX).filter_map(NonZeroU8::new)
}

/// Normalized readings of a generic joystick, indexed from zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericJoystickState {
    pub axes: Vec<f64>,
    pub sliders: Vec<f64>,
    pub buttons: Vec<bool>,
    pub hats: Vec<HatState>,
}

impl SampleSource<GenericInput> for GenericJoystickState {
    fn sample(&self, input: GenericInput) -> Option<f64> {
        let index = input.index();
        match input {
            GenericInput::Axis(_) => self.axes.get(index).copied(),
            GenericInput::Slider(_) => self.sliders.get(index).copied(),
            GenericInput::Button(_) => self
                .buttons
                .get(index)
                .map(|pressed| if *pressed { 1.0 } else { 0.0 }),
        }
    }

    fn hat(&self, index: usize) -> Option<HatState> {
        self.hats.get(index).copied()
    }
}

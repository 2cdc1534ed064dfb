//! # Bridge Protocol Constants and Types
//!
//! Layout of the XUSB (Xbox 360 USB) gamepad report and of the serial frame
//! carrying it to the USB gamepad bridge.
//!
//! ## Frame
//!
//! ```text
//! +------+-----+------+-------------------+-----+
//! | 0xA5 | len | type | payload (12 B LE) | crc |
//! +------+-----+------+-------------------+-----+
//! ```
//!
//! `len` counts type + payload + crc. The CRC covers len + type + payload.

use crate::mapping::xinput::{XInputState, XInputType};

/// Frame sync byte
pub const FRAME_SYNC_BYTE: u8 = 0xA5;

/// XUSB report frame type
pub const FRAME_TYPE_XUSB_REPORT: u8 = 0x01;

/// XUSB report payload size
pub const XUSB_REPORT_SIZE: usize = 12;

/// Report frame length field (type + payload + crc)
pub const XUSB_FRAME_LENGTH: u8 = (1 + XUSB_REPORT_SIZE + 1) as u8;

/// Complete report frame size (sync + length + type + payload + crc)
pub const XUSB_FRAME_SIZE: usize = 2 + XUSB_FRAME_LENGTH as usize;

/// Stick axis range.
pub const THUMB_MIN: i16 = i16::MIN;
pub const THUMB_MAX: i16 = i16::MAX;

/// Trigger range.
pub const TRIGGER_MAX: u8 = u8::MAX;

/// XUSB button bits.
pub mod buttons {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const GUIDE: u16 = 0x0400;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// Button bit of a digital virtual channel, `None` for analog channels.
#[must_use]
pub fn button_bit(input: XInputType) -> Option<u16> {
    let bit = match input {
        XInputType::Up => buttons::DPAD_UP,
        XInputType::Down => buttons::DPAD_DOWN,
        XInputType::Left => buttons::DPAD_LEFT,
        XInputType::Right => buttons::DPAD_RIGHT,
        XInputType::Start => buttons::START,
        XInputType::Back => buttons::BACK,
        XInputType::L3 => buttons::LEFT_THUMB,
        XInputType::R3 => buttons::RIGHT_THUMB,
        XInputType::L1 => buttons::LEFT_SHOULDER,
        XInputType::R1 => buttons::RIGHT_SHOULDER,
        XInputType::Home => buttons::GUIDE,
        XInputType::A => buttons::A,
        XInputType::B => buttons::B,
        XInputType::X => buttons::X,
        XInputType::Y => buttons::Y,
        XInputType::LX
        | XInputType::LY
        | XInputType::RX
        | XInputType::RY
        | XInputType::L2
        | XInputType::R2 => return None,
    };
    Some(bit)
}

/// Xbox 360 gamepad report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XusbReport {
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl XusbReport {
    /// Converts calibrated virtual channel values into a report.
    ///
    /// # Examples
    ///
    /// ```
    /// use pad_mapper::mapping::xinput::{XInputState, XInputType};
    /// use pad_mapper::report::protocol::{buttons, XusbReport};
    ///
    /// let mut state = XInputState::neutral();
    /// state.set(XInputType::A, 1.0);
    /// state.set(XInputType::LX, 1.0);
    ///
    /// let report = XusbReport::from_state(&state);
    /// assert_eq!(report.buttons, buttons::A);
    /// assert_eq!(report.thumb_lx, i16::MAX);
    /// assert_eq!(report.thumb_ly, 0);
    /// ```
    #[must_use]
    pub fn from_state(state: &XInputState) -> Self {
        let buttons = XInputType::ALL
            .into_iter()
            .filter(|input| state.is_pressed(*input))
            .filter_map(button_bit)
            .fold(0u16, |bits, bit| bits | bit);

        Self {
            buttons,
            left_trigger: to_trigger(state.get(XInputType::L2)),
            right_trigger: to_trigger(state.get(XInputType::R2)),
            thumb_lx: to_thumb(state.get(XInputType::LX)),
            thumb_ly: to_thumb(state.get(XInputType::LY)),
            thumb_rx: to_thumb(state.get(XInputType::RX)),
            thumb_ry: to_thumb(state.get(XInputType::RY)),
        }
    }
}

/// Converts an axis value (0.0-1.0, 0.5 = center) to the XUSB stick range.
///
/// Center maps exactly to 0; each half is scaled to its own extreme.
#[must_use]
pub fn to_thumb(value: f64) -> i16 {
    let centered = (value.clamp(0.0, 1.0) - 0.5) * 2.0;
    if centered >= 0.0 {
        (centered * f64::from(THUMB_MAX)).round() as i16
    } else {
        (centered * -f64::from(THUMB_MIN)).round() as i16
    }
}

/// Converts a trigger value (0.0-1.0) to the XUSB trigger range.
#[must_use]
pub fn to_trigger(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * f64::from(TRIGGER_MAX)).round() as u8
}

//! # Pad Mapper Library
//!
//! Map and calibrate physical controller inputs onto a virtual XInput
//! (Xbox 360) gamepad.
//!
//! Each of the 21 virtual channels is driven by one physical control through
//! a calibration record (source, min, max, deadzone). Mappings persist as a
//! flat key/value profile. The resulting state is handed to a
//! [`report::sink::ReportSink`] as an XUSB report; the bundled sink is a USB
//! gamepad bridge on a serial port.

pub mod config;
pub mod error;
pub mod controller;
pub mod mapping;
pub mod report;
pub mod serial;
pub mod telemetry;

//! # Report Module
//!
//! Turns the virtual gamepad state into reports and hands them to a sink.
//!
//! This module handles:
//! - Converting calibrated channel values into an XUSB report
//! - Framing reports with sync, length, type and CRC8-DVB-S2
//! - The [`sink::ReportSink`] seam and the start gate in front of it

pub mod protocol;
pub mod encoder;
pub mod crc;
pub mod sink;
pub mod forward;

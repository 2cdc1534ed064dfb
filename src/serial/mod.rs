//! # Serial Communication Module
//!
//! Report sink for a USB gamepad bridge: a microcontroller that enumerates as
//! an Xbox 360 pad on the host side and listens for report frames on a UART.
//!
//! This module handles:
//! - Opening the bridge port (8N1, configurable baud rate)
//! - Auto-detecting the bridge among common device paths
//! - Framing and writing reports

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, trace, warn};

use crate::error::{PadMapperError, Result};
use crate::report::encoder::encode_report_frame;
use crate::report::protocol::XusbReport;
use crate::report::sink::ReportSink;

/// Default bridge baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Bridge device paths to try (in order of preference)
pub const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC (RP2040, ATmega32U4 boards)
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Serial link to the gamepad bridge.
///
/// Generic over the byte stream so frames can be captured in tests.
pub struct BridgeSerial<W = SerialStream> {
    writer: W,
    device_path: String,
}

impl<W> std::fmt::Debug for BridgeSerial<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl BridgeSerial<SerialStream> {
    /// Open the bridge, trying the default device paths
    ///
    /// # Errors
    ///
    /// Returns [`PadMapperError::SerialPortNotFound`] if no path opens
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_mapper::serial::{BridgeSerial, DEFAULT_BAUD_RATE};
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let bridge = BridgeSerial::open(DEFAULT_BAUD_RATE)?;
    ///     println!("Bridge at {}", bridge.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(baud_rate: u32) -> Result<Self> {
        Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate)
    }

    /// Open the bridge at the first path that succeeds
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(stream) => {
                    info!("Opened gamepad bridge at {} ({} baud)", path, baud_rate);
                    return Ok(Self::from_writer(stream, *path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                }
            }
        }

        Err(PadMapperError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port as 8N1 without flow control
    fn open_port(path: &str, baud_rate: u32) -> Result<SerialStream> {
        tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| PadMapperError::Serial(format!("Failed to open {}: {}", path, e)))
    }
}

impl<W: AsyncWrite + Unpin + Send> BridgeSerial<W> {
    /// Wrap an already opened byte stream
    pub fn from_writer(writer: W, device_path: impl Into<String>) -> Self {
        Self {
            writer,
            device_path: device_path.into(),
        }
    }

    /// Write a complete frame and flush it
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.writer
            .write_all(frame)
            .await
            .map_err(|e| PadMapperError::Serial(format!("Failed to write frame: {}", e)))?;

        self.writer
            .flush()
            .await
            .map_err(|e| PadMapperError::Serial(format!("Failed to flush serial port: {}", e)))?;

        trace!("Sent report frame ({} bytes)", frame.len());
        Ok(())
    }

    /// Path of the opened serial device
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Releases the underlying stream
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> ReportSink for BridgeSerial<W> {
    async fn submit(&mut self, report: &XusbReport) -> Result<()> {
        let frame = encode_report_frame(report);
        self.send_frame(&frame).await
    }

    fn describe(&self) -> String {
        format!("gamepad bridge at {}", self.device_path)
    }
}

//! # PS5 DualSense Controller Module
//!
//! The DualSense device family: its named controls, its default mapping onto
//! the virtual controller, and detection/connection through Linux evdev.
//!
//! ## Controller Detection
//!
//! The DualSense controller is identified by:
//! - Vendor ID: 0x054c (Sony)
//! - Product ID: 0x0ce6 (DualSense, both wired and Bluetooth)
//!
//! ## Default Mapping
//!
//! | Virtual | DualSense | Range | Deadzone |
//! |---------|-----------|-------|----------|
//! | LX / RX | Left / Right Stick X | 0..100 | 5 |
//! | LY / RY | Left / Right Stick Y | 100..0 (inverted, evdev Y grows downward) | 5 |
//! | L2 / R2 | L2 / R2 Trigger | 0..100 | 10 |
//! | A, B, X, Y | Cross, Circle, Square, Triangle | 0..100 | 0 |
//! | L1, R1, L3, R3 | L1, R1, L3, R3 | 0..100 | 0 |
//! | Start, Back, Home | Options, Share, PS | 0..100 | 0 |
//! | UP, DOWN, LEFT, RIGHT | D-Pad directions | 0..100 | 0 |

use evdev::Device;
use std::path::Path;
use tracing::{debug, info};

use super::input::PhysicalInput;
use super::DeviceFamily;
use crate::error::{PadMapperError, Result};
use crate::mapping::calibration::CalibrationRecord;
use crate::mapping::mapper::InputMapper;
use crate::mapping::xinput::XInputType;

/// PS5 DualSense vendor ID (Sony)
const DUALSENSE_VENDOR_ID: u16 = 0x054c;

/// PS5 DualSense product ID (wired and Bluetooth)
const DUALSENSE_PRODUCT_ID: u16 = 0x0ce6;

/// Default stick deadzone.
const STICK_DEADZONE: f64 = 0.05;

/// Default trigger deadzone.
const TRIGGER_DEADZONE: f64 = 0.10;

/// A control on the DualSense controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DualSenseInput {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    L2Trigger,
    R2Trigger,
    Cross,
    Circle,
    Square,
    Triangle,
    L1,
    R1,
    /// L2 digital click
    L2,
    /// R2 digital click
    R2,
    Share,
    Options,
    PS,
    L3,
    R3,
    Touchpad,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl DualSenseInput {
    /// Every DualSense control.
    pub const ALL: [DualSenseInput; 24] = [
        DualSenseInput::LeftStickX,
        DualSenseInput::LeftStickY,
        DualSenseInput::RightStickX,
        DualSenseInput::RightStickY,
        DualSenseInput::L2Trigger,
        DualSenseInput::R2Trigger,
        DualSenseInput::Cross,
        DualSenseInput::Circle,
        DualSenseInput::Square,
        DualSenseInput::Triangle,
        DualSenseInput::L1,
        DualSenseInput::R1,
        DualSenseInput::L2,
        DualSenseInput::R2,
        DualSenseInput::Share,
        DualSenseInput::Options,
        DualSenseInput::PS,
        DualSenseInput::L3,
        DualSenseInput::R3,
        DualSenseInput::Touchpad,
        DualSenseInput::DPadUp,
        DualSenseInput::DPadDown,
        DualSenseInput::DPadLeft,
        DualSenseInput::DPadRight,
    ];

    fn as_str(self) -> &'static str {
        match self {
            DualSenseInput::LeftStickX => "LeftStickX",
            DualSenseInput::LeftStickY => "LeftStickY",
            DualSenseInput::RightStickX => "RightStickX",
            DualSenseInput::RightStickY => "RightStickY",
            DualSenseInput::L2Trigger => "L2Trigger",
            DualSenseInput::R2Trigger => "R2Trigger",
            DualSenseInput::Cross => "Cross",
            DualSenseInput::Circle => "Circle",
            DualSenseInput::Square => "Square",
            DualSenseInput::Triangle => "Triangle",
            DualSenseInput::L1 => "L1",
            DualSenseInput::R1 => "R1",
            DualSenseInput::L2 => "L2",
            DualSenseInput::R2 => "R2",
            DualSenseInput::Share => "Share",
            DualSenseInput::Options => "Options",
            DualSenseInput::PS => "PS",
            DualSenseInput::L3 => "L3",
            DualSenseInput::R3 => "R3",
            DualSenseInput::Touchpad => "Touchpad",
            DualSenseInput::DPadUp => "DPadUp",
            DualSenseInput::DPadDown => "DPadDown",
            DualSenseInput::DPadLeft => "DPadLeft",
            DualSenseInput::DPadRight => "DPadRight",
        }
    }
}

impl PhysicalInput for DualSenseInput {
    fn name(&self) -> String {
        self.as_str().to_string()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|input| input.as_str() == name)
    }
}

/// The DualSense device family.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualSense;

impl DeviceFamily for DualSense {
    type Input = DualSenseInput;

    const NAME: &'static str = "dualsense";

    fn default_mapper() -> InputMapper<DualSenseInput> {
        use DualSenseInput as D;
        use XInputType as X;

        let mut mapper = InputMapper::new();

        let sticks = [
            (X::LX, D::LeftStickX, false),
            (X::LY, D::LeftStickY, true),
            (X::RX, D::RightStickX, false),
            (X::RY, D::RightStickY, true),
        ];
        for (virtual_input, source, inverted) in sticks {
            let (min, max) = if inverted { (1.0, 0.0) } else { (0.0, 1.0) };
            mapper.set_mapping(
                virtual_input,
                CalibrationRecord::new(source, min, max, STICK_DEADZONE),
            );
        }

        for (virtual_input, source) in [(X::L2, D::L2Trigger), (X::R2, D::R2Trigger)] {
            mapper.set_mapping(
                virtual_input,
                CalibrationRecord::new(source, 0.0, 1.0, TRIGGER_DEADZONE),
            );
        }

        let buttons = [
            (X::A, D::Cross),
            (X::B, D::Circle),
            (X::X, D::Square),
            (X::Y, D::Triangle),
            (X::L1, D::L1),
            (X::R1, D::R1),
            (X::L3, D::L3),
            (X::R3, D::R3),
            (X::Start, D::Options),
            (X::Back, D::Share),
            (X::Home, D::PS),
            (X::Up, D::DPadUp),
            (X::Down, D::DPadDown),
            (X::Left, D::DPadLeft),
            (X::Right, D::DPadRight),
        ];
        for (virtual_input, source) in buttons {
            mapper.set_mapping(virtual_input, CalibrationRecord::new(source, 0.0, 1.0, 0.0));
        }

        mapper
    }
}

/// PS5 DualSense controller handle
///
/// Represents an active connection to a PS5 DualSense controller via evdev.
/// Provides methods for reading controller input events.
pub struct DualSenseController {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for DualSenseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualSenseController")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl DualSenseController {
    /// Detect and open the first available PS5 DualSense controller
    ///
    /// Scans all `/dev/input/event*` devices to find a connected DualSense controller
    /// by matching vendor and product IDs.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No DualSense controller found on the system
    /// - `Controller`: `/dev/input` is missing or unreadable
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_mapper::controller::dualsense::DualSenseController;
    ///
    /// let controller = DualSenseController::open()?;
    /// println!("Connected to controller at: {}", controller.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(PadMapperError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| PadMapperError::Controller(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PadMapperError::Controller(format!("Failed to read directory entry: {}", e)))?;

        // Sort entries for deterministic device selection when multiple controllers are connected
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let is_event_device = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("event"));
            if !is_event_device {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let id = device.input_id();
                    debug!(
                        "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                        path.display(),
                        id.vendor(),
                        id.product()
                    );

                    if is_dualsense(id.vendor(), id.product()) {
                        let device_path = path.to_string_lossy().to_string();
                        info!("Found PS5 DualSense controller at: {}", device_path);
                        return Ok(Self {
                            device,
                            device_path,
                        });
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(PadMapperError::ControllerNotFound)
    }

    /// Open a DualSense controller at a known event device path.
    ///
    /// # Errors
    ///
    /// - `Controller`: the device cannot be opened
    /// - `ControllerNotFound`: the device is not a DualSense
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path).map_err(|e| {
            PadMapperError::Controller(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let id = device.input_id();
        if !is_dualsense(id.vendor(), id.product()) {
            debug!(
                "{} is not a DualSense (vendor: 0x{:04x}, product: 0x{:04x})",
                path.display(),
                id.vendor(),
                id.product()
            );
            return Err(PadMapperError::ControllerNotFound);
        }

        let device_path = path.to_string_lossy().to_string();
        info!("Opened PS5 DualSense controller at: {}", device_path);
        Ok(Self {
            device,
            device_path,
        })
    }

    /// Get the device path of this controller
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Fetch events from the controller
    ///
    /// Returns an iterator over available input events. This call blocks
    /// until the kernel has events for the device.
    ///
    /// # Errors
    ///
    /// Returns `Controller` error if fetching events fails (e.g., controller disconnected).
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = evdev::InputEvent> + '_> {
        self.device
            .fetch_events()
            .map_err(|e| PadMapperError::Controller(format!("Failed to fetch events: {}", e)))
    }

    /// Get controller name from evdev
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }
}

fn is_dualsense(vendor: u16, product: u16) -> bool {
    vendor == DUALSENSE_VENDOR_ID && product == DUALSENSE_PRODUCT_ID
}

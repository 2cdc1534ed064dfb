//! # Pad Mapper
//!
//! Reads a PS5 DualSense through evdev, calibrates its controls onto the
//! virtual XInput channels and forwards the result to a USB gamepad bridge.
//!
//! ```bash
//! pad-mapper [config/default.toml]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pad_mapper::config::Config;
use pad_mapper::controller::dualsense::{DualSense, DualSenseController, DualSenseInput};
use pad_mapper::controller::events::EventProcessor;
use pad_mapper::controller::DeviceFamily;
use pad_mapper::mapping::mapper::InputMapper;
use pad_mapper::mapping::profile;
use pad_mapper::mapping::xinput::XInputState;
use pad_mapper::report::forward::{forward, ForwardGate};
use pad_mapper::report::protocol::XusbReport;
use pad_mapper::report::sink::ReportSink;
use pad_mapper::serial::BridgeSerial;
use pad_mapper::telemetry::StateRecorder;

/// Configuration used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of reports between status log messages
const LOG_INTERVAL_REPORTS: u64 = 1000;

/// Queued evdev events between the reader thread and the report loop
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Loads the profile for the controller, falling back to (and saving) the
/// built-in defaults when the file does not exist.
fn load_mapper(path: &Path) -> Result<InputMapper<DualSenseInput>> {
    if !path.exists() {
        info!("No profile at {}, using DualSense defaults", path.display());
        let mapper = DualSense::default_mapper();
        profile::save(path, &mapper.to_dictionary())
            .with_context(|| format!("Failed to create profile {}", path.display()))?;
        return Ok(mapper);
    }

    let dict = profile::load(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let (mapper, report) = DualSense::load_mapper(&dict);

    info!("Applied {} mapping entries", report.applied());
    for (key, reason) in report.skipped() {
        warn!("Skipped profile entry '{}': {}", key, reason);
    }

    Ok(mapper)
}

fn init_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer();

    if config.telemetry.log_dir.is_empty() {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all(&config.telemetry.log_dir)
        .with_context(|| format!("Failed to create log dir {}", config.telemetry.log_dir))?;
    let file_appender = tracing_appender::rolling::daily(&config.telemetry.log_dir, "pad-mapper.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(Some(guard))
}

fn open_bridge(config: &Config) -> Result<BridgeSerial> {
    let baud_rate = config.output.baud_rate;
    let bridge = if config.output.serial_port.is_empty() {
        BridgeSerial::open(baud_rate)?
    } else {
        BridgeSerial::open_with_paths(&[config.output.serial_port.as_str()], baud_rate)?
    };
    Ok(bridge)
}

fn open_controller(config: &Config) -> Result<DualSenseController> {
    let controller = if config.controller.device_path.is_empty() {
        DualSenseController::open()?
    } else {
        DualSenseController::open_path(&config.controller.device_path)?
    };
    Ok(controller)
}

/// Reads evdev events on a dedicated thread until the device goes away or the
/// receiver is dropped.
///
/// `fetch_events` blocks in the kernel; the runtime must not wait on this
/// thread at shutdown.
fn spawn_event_reader(
    mut controller: DualSenseController,
    events: mpsc::Sender<evdev::InputEvent>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new().name("evdev-reader".to_string()).spawn(move || loop {
        let batch: Vec<evdev::InputEvent> = match controller.fetch_events() {
            Ok(batch) => batch.collect(),
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        for event in batch {
            if events.blocking_send(event).is_err() {
                debug!("Event receiver closed, stopping reader");
                return;
            }
        }
    })
}

/// Main entry point for Pad Mapper
///
/// 1. Load configuration, set up logging (stdout + daily log file)
/// 2. Load or create the mapping profile
/// 3. Open the controller and the bridge
/// 4. At `report_rate_hz`: evaluate the mapping, send a report, and record
///    telemetry every `log_interval_ms`
/// 5. On Ctrl+C or disconnect: send a neutral report and optionally save the
///    profile
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path))?;

    let _log_guard = init_logging(&config)?;
    info!("Pad Mapper v{} starting...", env!("CARGO_PKG_VERSION"));

    let profile_path = Path::new(&config.mapping.profile_path);
    let mapper = load_mapper(profile_path)?;
    for (input, warning) in mapper.validate() {
        warn!("Calibration of {} looks wrong: {:?}", input, warning);
    }

    let controller = open_controller(&config)?;
    info!(
        "Controller: {} at {}",
        controller.name().unwrap_or("unknown"),
        controller.device_path()
    );

    let mut sink: Box<dyn ReportSink> = Box::new(open_bridge(&config)?);
    info!("Forwarding to {}", sink.describe());

    let mut recorder = if config.telemetry.enabled {
        Some(StateRecorder::from_config(&config.telemetry)?)
    } else {
        None
    };

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let _reader = spawn_event_reader(controller, event_tx).context("Failed to start event reader")?;

    let mut processor = EventProcessor::new();
    let mut gate = ForwardGate::for_mapper(&mapper);

    let mut report_interval = interval(config.report_interval());
    report_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut telemetry_interval = interval(Duration::from_millis(config.telemetry.log_interval_ms));
    telemetry_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Forwarding reports at {}Hz", config.output.report_rate_hz);
    info!("Press Ctrl+C to exit");

    let mut state = XInputState::neutral();
    let mut reports_sent: u64 = 0;
    let mut last_log_count: u64 = 0;

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(event) => processor.process_event(&event),
                    None => {
                        warn!("Controller disconnected");
                        break;
                    }
                }
            }

            _ = report_interval.tick() => {
                let evaluated = mapper.evaluate(processor.state());
                match forward(sink.as_mut(), &mut gate, evaluated).await {
                    Ok(sent) => state = sent,
                    Err(e) => {
                        debug!("Failed to send report: {}", e);
                        continue;
                    }
                }

                reports_sent += 1;
                if reports_sent - last_log_count >= LOG_INTERVAL_REPORTS {
                    info!("Sent {} reports ({}Hz)", reports_sent, config.output.report_rate_hz);
                    last_log_count = reports_sent;
                }
            }

            _ = telemetry_interval.tick(), if recorder.is_some() => {
                let failed = recorder
                    .as_mut()
                    .and_then(|recorder| recorder.record(&state).err());
                if let Some(e) = failed {
                    warn!("Telemetry disabled: {}", e);
                    recorder = None;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    drop(event_rx);

    if let Err(e) = sink.submit(&XusbReport::default()).await {
        warn!("Failed to send neutral report: {}", e);
    }
    info!("Total reports sent: {}", reports_sent);

    if let Some(recorder) = recorder.as_mut() {
        recorder.flush()?;
        info!("Recorded {} state snapshots", recorder.frames_recorded());
    }

    if config.mapping.save_on_exit {
        profile::save(profile_path, &mapper.to_dictionary())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pad_mapper::mapping::xinput::XInputType;
    use tempfile::TempDir;

    #[test]
    fn test_log_interval_constant() {
        assert_eq!(LOG_INTERVAL_REPORTS, 1000);

        // At 250Hz, 1000 reports = 4 seconds
        let seconds = LOG_INTERVAL_REPORTS as f64 / 250.0;
        assert_eq!(seconds, 4.0);
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    // ==== Profile Loading Tests ====

    #[test]
    fn test_load_mapper_creates_missing_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles/pad.ini");

        let mapper = load_mapper(&path).unwrap();
        assert!(path.exists());
        assert_eq!(mapper.mappings().len(), XInputType::ALL.len());

        let reloaded = load_mapper(&path).unwrap();
        assert_eq!(reloaded.to_dictionary(), mapper.to_dictionary());
    }

    #[test]
    fn test_load_mapper_keeps_valid_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pad.ini");
        std::fs::write(&path, "A=Cross,0,100,0\nB=Nope,0,100,0\nStartWhenConnected=true\n").unwrap();

        let mapper = load_mapper(&path).unwrap();
        assert_eq!(mapper.mappings().len(), 1);
        assert!(mapper.try_get(XInputType::A).is_some());
        assert!(mapper.settings.start_when_connected);
    }
}

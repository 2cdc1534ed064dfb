//! JSONL recorder for virtual gamepad state snapshots.
//!
//! Each line holds one snapshot:
//!
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.123+00:00","frame":42,"buttons":4096,"values":{"A":1.0,...}}
//! ```
//!
//! Files are named `state_<YYYYmmdd_HHMMSS>_<seq>.jsonl` so that name order
//! is creation order.

use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::TelemetryConfig;
use crate::error::{PadMapperError, Result};
use crate::mapping::xinput::XInputState;
use crate::report::protocol::XusbReport;

const FILE_PREFIX: &str = "state_";
const FILE_EXTENSION: &str = "jsonl";

#[derive(Serialize)]
struct StateRecord<'a> {
    timestamp: String,
    frame: u64,
    buttons: u16,
    values: &'a XInputState,
}

/// Writes state snapshots to rotating JSONL files.
pub struct StateRecorder {
    log_dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    writer: Option<BufWriter<File>>,
    records_in_file: usize,
    files_opened: u64,
    frames_recorded: u64,
}

impl std::fmt::Debug for StateRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRecorder")
            .field("log_dir", &self.log_dir)
            .field("records_in_file", &self.records_in_file)
            .field("frames_recorded", &self.frames_recorded)
            .finish_non_exhaustive()
    }
}

impl StateRecorder {
    /// Creates the log directory if needed. No file is opened until the
    /// first record.
    pub fn new(
        log_dir: impl Into<PathBuf>,
        max_records_per_file: usize,
        max_files_to_keep: usize,
    ) -> Result<Self> {
        if max_records_per_file == 0 || max_files_to_keep == 0 {
            return Err(PadMapperError::Telemetry(
                "record and file limits must be greater than 0".to_string(),
            ));
        }

        let log_dir = log_dir.into();
        fs::create_dir_all(&log_dir)?;
        info!("Recording state telemetry to {}", log_dir.display());

        Ok(Self {
            log_dir,
            max_records_per_file,
            max_files_to_keep,
            writer: None,
            records_in_file: 0,
            files_opened: 0,
            frames_recorded: 0,
        })
    }

    pub fn from_config(config: &TelemetryConfig) -> Result<Self> {
        Self::new(
            &config.log_dir,
            config.max_records_per_file,
            config.max_files_to_keep,
        )
    }

    /// Appends one snapshot, rotating first if the current file is full.
    pub fn record(&mut self, state: &XInputState) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let record = StateRecord {
            timestamp: Local::now().to_rfc3339(),
            frame: self.frames_recorded,
            buttons: XusbReport::from_state(state).buttons,
            values: state,
        };
        let line = serde_json::to_string(&record)
            .map_err(|e| PadMapperError::Telemetry(format!("Failed to encode record: {}", e)))?;

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PadMapperError::Telemetry("no open telemetry file".to_string()))?;
        writeln!(writer, "{}", line)?;

        self.records_in_file += 1;
        self.frames_recorded += 1;
        Ok(())
    }

    /// Flushes buffered records to disk.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn frames_recorded(&self) -> u64 {
        self.frames_recorded
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn rotate(&mut self) -> Result<()> {
        self.flush()?;

        let name = format!(
            "{}{}_{:04}.{}",
            FILE_PREFIX,
            Local::now().format("%Y%m%d_%H%M%S"),
            self.files_opened,
            FILE_EXTENSION
        );
        let path = self.log_dir.join(name);
        let file = File::create(&path)?;
        debug!("Opened telemetry file {}", path.display());

        self.writer = Some(BufWriter::new(file));
        self.records_in_file = 0;
        self.files_opened += 1;

        self.remove_old_files()
    }

    fn remove_old_files(&self) -> Result<()> {
        let mut files = list_log_files(&self.log_dir)?;
        if files.len() <= self.max_files_to_keep {
            return Ok(());
        }

        files.sort();
        let excess = files.len() - self.max_files_to_keep;
        for path in files.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed old telemetry file {}", path.display()),
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
        Ok(())
    }
}

impl Drop for StateRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to flush telemetry on shutdown: {}", e);
        }
    }
}

/// Recorder files in `dir`, unsorted.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(FILE_PREFIX))
            && path.extension().is_some_and(|ext| ext == FILE_EXTENSION);
        if is_log {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::xinput::XInputType;
    use tempfile::TempDir;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn sorted_files(dir: &Path) -> Vec<PathBuf> {
        let mut files = list_log_files(dir).unwrap();
        files.sort();
        files
    }

    #[test]
    fn test_rejects_zero_limits() {
        let dir = TempDir::new().unwrap();
        assert!(StateRecorder::new(dir.path(), 0, 1).is_err());
        assert!(StateRecorder::new(dir.path(), 1, 0).is_err());
    }

    #[test]
    fn test_creates_log_dir_lazily_opens_file() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested/logs");

        let recorder = StateRecorder::new(&log_dir, 10, 2).unwrap();
        assert!(log_dir.is_dir());
        assert!(list_log_files(recorder.log_dir()).unwrap().is_empty());
    }

    #[test]
    fn test_record_writes_json_lines() {
        let dir = TempDir::new().unwrap();
        let mut recorder = StateRecorder::new(dir.path(), 10, 2).unwrap();

        let mut state = XInputState::neutral();
        state.set(XInputType::A, 1.0);
        recorder.record(&state).unwrap();
        recorder.record(&XInputState::neutral()).unwrap();
        recorder.flush().unwrap();

        let files = sorted_files(dir.path());
        assert_eq!(files.len(), 1);

        let lines = read_lines(&files[0]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["frame"], 0);
        assert_eq!(lines[0]["buttons"], 0x1000);
        assert_eq!(lines[0]["values"]["A"], 1.0);
        assert_eq!(lines[0]["values"]["LX"], 0.5);
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["frame"], 1);
        assert_eq!(lines[1]["buttons"], 0);
        assert_eq!(recorder.frames_recorded(), 2);
    }

    #[test]
    fn test_rotates_after_max_records() {
        let dir = TempDir::new().unwrap();
        let mut recorder = StateRecorder::new(dir.path(), 2, 10).unwrap();

        for _ in 0..5 {
            recorder.record(&XInputState::neutral()).unwrap();
        }
        recorder.flush().unwrap();

        let files = sorted_files(dir.path());
        let counts: Vec<usize> = files.iter().map(|f| read_lines(f).len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);
    }

    #[test]
    fn test_keeps_only_newest_files() {
        let dir = TempDir::new().unwrap();
        let mut recorder = StateRecorder::new(dir.path(), 1, 2).unwrap();

        for _ in 0..4 {
            recorder.record(&XInputState::neutral()).unwrap();
        }
        recorder.flush().unwrap();

        let files = sorted_files(dir.path());
        assert_eq!(files.len(), 2);

        let frames: Vec<u64> = files
            .iter()
            .map(|f| read_lines(f)[0]["frame"].as_u64().unwrap())
            .collect();
        assert_eq!(frames, vec![2, 3]);
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pad-mapper.log"), "x").unwrap();
        fs::write(dir.path().join("state_notes.txt"), "x").unwrap();

        let mut recorder = StateRecorder::new(dir.path(), 1, 1).unwrap();
        recorder.record(&XInputState::neutral()).unwrap();
        recorder.record(&XInputState::neutral()).unwrap();

        assert!(dir.path().join("pad-mapper.log").exists());
        assert!(dir.path().join("state_notes.txt").exists());
        assert_eq!(list_log_files(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_from_config() {
        let dir = TempDir::new().unwrap();
        let config = TelemetryConfig {
            enabled: true,
            log_dir: dir.path().to_string_lossy().into_owned(),
            max_records_per_file: 3,
            max_files_to_keep: 1,
            log_interval_ms: 100,
        };

        let recorder = StateRecorder::from_config(&config).unwrap();
        assert_eq!(recorder.log_dir(), dir.path());
    }
}

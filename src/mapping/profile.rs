//! # Mapping Profile Files
//!
//! Reads and writes the flat `key=value` files that hold a device's mapping.
//!
//! ## Format
//!
//! ```text
//! # DualSense profile
//! SelectedDPad=0
//! StartWhenConnected=false
//! LX=LeftStickX,0,100,8
//! A=Cross,0,100,0
//! ```
//!
//! - One entry per line, split at the first `=`
//! - Keys and values are trimmed
//! - Blank lines and lines starting with `#` or `;` are ignored
//! - Lines without `=` are ignored
//! - A repeated key keeps its last value
//!
//! The file layer does not interpret values; see
//! [`InputMapper::from_dictionary`](super::mapper::InputMapper::from_dictionary).

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::mapper::Dictionary;
use crate::error::Result;

/// Parses profile text into a dictionary.
///
/// # Examples
///
/// ```
/// use pad_mapper::mapping::profile::parse;
///
/// let dict = parse("# comment\nA = Cross,0,100,0\n\nStartWhenConnected=true\n");
/// assert_eq!(dict["A"], "Cross,0,100,0");
/// assert_eq!(dict["StartWhenConnected"], "true");
/// assert_eq!(dict.len(), 2);
/// ```
#[must_use]
pub fn parse(text: &str) -> Dictionary {
    let mut dict = Dictionary::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                dict.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => debug!("Ignoring profile line {} without '=': {}", number + 1, line),
        }
    }

    dict
}

/// Renders a dictionary as profile text, one `key=value` line per entry in
/// key order.
///
/// # Examples
///
/// ```
/// use pad_mapper::mapping::mapper::Dictionary;
/// use pad_mapper::mapping::profile::render;
///
/// let mut dict = Dictionary::new();
/// dict.insert("B".into(), "Circle,0,100,0".into());
/// dict.insert("A".into(), "Cross,0,100,0".into());
/// assert_eq!(render(&dict), "A=Cross,0,100,0\nB=Circle,0,100,0\n");
/// ```
#[must_use]
pub fn render(dict: &Dictionary) -> String {
    dict.iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}

/// Loads a profile file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read. Content problems never
/// cause an error.
///
/// # Examples
///
/// ```no_run
/// use pad_mapper::controller::dualsense::DualSenseInput;
/// use pad_mapper::mapping::mapper::InputMapper;
/// use pad_mapper::mapping::profile;
///
/// let dict = profile::load("profiles/dualsense.ini")?;
/// let (mapper, report) = InputMapper::<DualSenseInput>::from_dictionary(&dict);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dictionary> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let dict = parse(&text);
    info!("Loaded profile {} ({} entries)", path.display(), dict.len());
    Ok(dict)
}

/// Writes a profile file, replacing any existing content.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn save<P: AsRef<Path>>(path: P, dict: &Dictionary) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(dict))?;
    info!("Saved profile {} ({} entries)", path.display(), dict.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::dualsense::DualSenseInput;
    use crate::mapping::calibration::CalibrationRecord;
    use crate::mapping::mapper::InputMapper;
    use crate::mapping::xinput::XInputType;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let dict = parse("; header\n\n   \n# note\nLX=LeftStickX,0,100,5\n");
        assert_eq!(dict.len(), 1);
        assert_eq!(dict["LX"], "LeftStickX,0,100,5");
    }

    #[test]
    fn test_parse_ignores_lines_without_separator() {
        let dict = parse("garbage\nA=Cross,0,100,0\n");
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_parse_splits_at_first_equals() {
        let dict = parse("key=a=b\n");
        assert_eq!(dict["key"], "a=b");
    }

    #[test]
    fn test_parse_keeps_empty_values() {
        let dict = parse("RX=\n");
        assert_eq!(dict["RX"], "");
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let dict = parse("A=Cross,0,100,0\nA=Circle,0,100,0\n");
        assert_eq!(dict["A"], "Circle,0,100,0");
    }

    #[test]
    fn test_parse_handles_crlf() {
        let dict = parse("A=Cross,0,100,0\r\nB=Circle,0,100,0\r\n");
        assert_eq!(dict["A"], "Cross,0,100,0");
        assert_eq!(dict["B"], "Circle,0,100,0");
    }

    #[test]
    fn test_render_then_parse_preserves_dictionary() {
        let mut dict = Dictionary::new();
        dict.insert("SelectedDPad".into(), "-1".into());
        dict.insert("RX".into(), ",50,50,0".into());
        assert_eq!(parse(&render(&dict)), dict);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load(dir.path().join("missing.ini")).is_err());
    }

    #[test]
    fn test_save_and_load_mapper() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles").join("pad.ini");

        let mut mapper = InputMapper::<DualSenseInput>::new();
        mapper.settings.start_when_connected = true;
        mapper.set_mapping(
            XInputType::R2,
            CalibrationRecord::new(DualSenseInput::R2Trigger, 0.0, 1.0, 0.05),
        );

        save(&path, &mapper.to_dictionary()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("R2=R2Trigger,0,100,5\n"));

        let (restored, report) = InputMapper::<DualSenseInput>::from_dictionary(&load(&path).unwrap());
        assert!(report.is_clean());
        assert_eq!(restored, mapper);
    }
}

//! # Input Mapper Module
//!
//! Owns the calibration records of one device and the device-level settings,
//! and converts them to and from the flat string dictionary stored in
//! mapping profiles.
//!
//! ## Profile Entries
//!
//! | Key | Value | Example |
//! |-----|-------|---------|
//! | `SelectedDPad` | hat index, `-1` for none | `0` |
//! | `StartWhenConnected` | `true` / `false` | `false` |
//! | XInput channel name | `source,minPct,maxPct,deadzonePct` | `LeftStickX,0,100,10` |
//!
//! An empty source disables the channel: `RX,,50,50,0`.
//!
//! ## Loading
//!
//! Loading is best-effort. An entry with an unknown channel, a wrong number of
//! fields or an unknown source is skipped and recorded in the [`LoadReport`];
//! an unparseable number inside an otherwise valid entry reads as `0`. Loading
//! never fails.
//!
//! ## Usage
//!
//! ```
//! use pad_mapper::controller::dualsense::DualSenseInput;
//! use pad_mapper::mapping::calibration::CalibrationRecord;
//! use pad_mapper::mapping::mapper::InputMapper;
//! use pad_mapper::mapping::xinput::XInputType;
//!
//! let mut mapper = InputMapper::<DualSenseInput>::new();
//! mapper.set_mapping(
//!     XInputType::A,
//!     CalibrationRecord::new(DualSenseInput::Cross, 0.0, 1.0, 0.0),
//! );
//!
//! let dict = mapper.to_dictionary();
//! assert_eq!(dict["A"], "Cross,0,100,0");
//!
//! let (restored, report) = InputMapper::<DualSenseInput>::from_dictionary(&dict);
//! assert!(report.is_clean());
//! assert_eq!(restored.try_get(XInputType::A), mapper.try_get(XInputType::A));
//! ```

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use super::calibration::{CalibrationRecord, CalibrationWarning};
use super::store::MappingStore;
use super::xinput::{XInputState, XInputType};
use crate::controller::input::{PhysicalInput, SampleSource};

/// Flat string dictionary exchanged with the profile file.
pub type Dictionary = BTreeMap<String, String>;

/// Separator between the fields of a calibration entry.
const SEPARATOR: &str = ",";

/// Number of fields in a calibration entry.
const ENTRY_FIELD_COUNT: usize = 4;

/// Profile key of the selected D-pad setting.
pub const SELECTED_DPAD_KEY: &str = "SelectedDPad";

/// Profile key of the start-when-connected setting.
pub const START_WHEN_CONNECTED_KEY: &str = "StartWhenConnected";

/// `selected_dpad` value meaning no hat drives the virtual D-pad.
pub const NO_DPAD: i32 = -1;

/// Device-level settings persisted next to the calibration records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperSettings {
    /// Index of the hat switch feeding the virtual D-pad, or [`NO_DPAD`].
    pub selected_dpad: i32,
    /// Start forwarding as soon as the device is connected.
    pub start_when_connected: bool,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            selected_dpad: NO_DPAD,
            start_when_connected: false,
        }
    }
}

impl MapperSettings {
    /// Hat index selected for the virtual D-pad, if any.
    #[must_use]
    pub fn selected_dpad_index(&self) -> Option<usize> {
        usize::try_from(self.selected_dpad).ok()
    }
}

/// Why a profile entry was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Key is not an XInput channel name.
    #[error("unknown XInput channel '{0}'")]
    UnknownKey(String),

    /// Value does not have exactly four comma-separated fields.
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    /// Source name is not known to the device family.
    #[error("unknown source '{0}'")]
    UnknownSource(String),
}

/// Result of processing one profile entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    /// Profile key of the entry.
    pub key: String,
    /// Channel the entry was applied to, or why it was skipped.
    pub result: std::result::Result<XInputType, SkipReason>,
}

/// Per-entry diagnostics of a profile load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl LoadReport {
    /// Number of entries applied to the store.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Entries that were skipped, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|reason| (o.key.as_str(), reason)))
    }

    /// True when every entry was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    fn record(&mut self, key: &str, result: std::result::Result<XInputType, SkipReason>) {
        self.outcomes.push(EntryOutcome {
            key: key.to_string(),
            result,
        });
    }
}

/// Maps physical inputs of one device family onto the virtual controller.
///
/// Single-threaded: callers that share a mapper across threads must
/// synchronize access themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMapper<P> {
    mappings: MappingStore<P>,
    /// Device-level settings.
    pub settings: MapperSettings,
}

impl<P: PhysicalInput> Default for InputMapper<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PhysicalInput> InputMapper<P> {
    /// Creates a mapper with no records and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mappings: MappingStore::new(),
            settings: MapperSettings::default(),
        }
    }

    /// Stores `record` for `input`, replacing any previous record.
    ///
    /// The record is not validated.
    pub fn set_mapping(&mut self, input: XInputType, record: CalibrationRecord<P>) {
        self.mappings.insert(input, record);
    }

    /// Returns the stored record for `input`. Never modifies the store.
    #[must_use]
    pub fn try_get(&self, input: XInputType) -> Option<&CalibrationRecord<P>> {
        self.mappings.get(input)
    }

    /// Returns the record for `input`, storing the disabled default first if
    /// the channel has none.
    pub fn get_or_insert_default(&mut self, input: XInputType) -> &mut CalibrationRecord<P> {
        self.mappings.get_or_insert_default(input)
    }

    /// Looks up an optional channel.
    ///
    /// `None` yields `None` and leaves the store untouched; otherwise this is
    /// [`InputMapper::get_or_insert_default`], so every queried channel ends
    /// up with a row in the next [`InputMapper::to_dictionary`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pad_mapper::controller::dualsense::DualSenseInput;
    /// use pad_mapper::mapping::mapper::InputMapper;
    /// use pad_mapper::mapping::xinput::XInputType;
    ///
    /// let mut mapper = InputMapper::<DualSenseInput>::new();
    /// assert!(mapper.get_mapping(None).is_none());
    /// assert!(mapper.mappings().is_empty());
    ///
    /// let record = mapper.get_mapping(Some(XInputType::LX)).unwrap();
    /// assert!(record.source.is_none());
    /// assert_eq!(mapper.mappings().len(), 1);
    /// ```
    pub fn get_mapping(&mut self, input: Option<XInputType>) -> Option<&CalibrationRecord<P>> {
        let input = input?;
        Some(&*self.get_or_insert_default(input))
    }

    /// Read-only view of the calibration records.
    #[must_use]
    pub fn mappings(&self) -> &MappingStore<P> {
        &self.mappings
    }

    /// Calibrates every virtual channel from the current device readings.
    ///
    /// Channels without a record report their neutral value; no records are
    /// created. When a hat is selected and the device reports it, the hat
    /// drives the four D-pad channels instead of their records.
    #[must_use]
    pub fn evaluate<S>(&self, samples: &S) -> XInputState
    where
        S: SampleSource<P> + ?Sized,
        P: 'static,
    {
        let mut state = XInputState::neutral();

        for input in XInputType::ALL {
            if let Some(record) = self.mappings.get(input) {
                let raw = record.source.and_then(|source| samples.sample(source));
                state.set(input, record.apply(input.kind(), raw));
            }
        }

        if let Some(hat) = self
            .settings
            .selected_dpad_index()
            .and_then(|index| samples.hat(index))
        {
            state.set_dpad(hat);
        }

        state
    }

    /// Lists records holding values the transform was not designed for.
    ///
    /// Assignment stays permissive; this is advisory only.
    #[must_use]
    pub fn validate(&self) -> Vec<(XInputType, CalibrationWarning)> {
        self.mappings
            .iter()
            .flat_map(|(input, record)| {
                record
                    .warnings()
                    .into_iter()
                    .map(move |warning| (input, warning))
            })
            .collect()
    }

    /// Serializes settings and records into a flat dictionary.
    ///
    /// Percentages are rounded half to even.
    #[must_use]
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert(
            SELECTED_DPAD_KEY.to_string(),
            self.settings.selected_dpad.to_string(),
        );
        dict.insert(
            START_WHEN_CONNECTED_KEY.to_string(),
            if self.settings.start_when_connected { "true" } else { "false" }.to_string(),
        );

        for (input, record) in self.mappings.iter() {
            let source = record.source.map(|s| s.name()).unwrap_or_default();
            let fields = [
                source,
                to_percent(record.min).to_string(),
                to_percent(record.max).to_string(),
                to_percent(record.deadzone).to_string(),
            ];
            dict.insert(input.name().to_string(), fields.join(SEPARATOR));
        }

        dict
    }

    /// Builds a mapper from a flat dictionary.
    ///
    /// Never fails: skipped entries are listed in the returned report.
    #[must_use]
    pub fn from_dictionary(data: &Dictionary) -> (Self, LoadReport) {
        let mut mapper = Self::new();
        let report = mapper.load_dictionary(data);
        (mapper, report)
    }

    /// Replaces the records and settings of this mapper with the contents of
    /// a flat dictionary.
    pub fn load_dictionary(&mut self, data: &Dictionary) -> LoadReport {
        self.mappings.clear();
        self.settings = MapperSettings {
            selected_dpad: read_selected_dpad(data),
            start_when_connected: read_start_when_connected(data),
        };

        let mut report = LoadReport::default();
        for (key, value) in data {
            if key == SELECTED_DPAD_KEY || key == START_WHEN_CONNECTED_KEY {
                continue;
            }

            match parse_entry::<P>(key, value) {
                Ok((input, record)) => {
                    self.mappings.insert(input, record);
                    report.record(key, Ok(input));
                }
                Err(reason) => {
                    match &reason {
                        SkipReason::UnknownKey(_) => debug!("Ignoring profile entry {}: {}", key, reason),
                        _ => warn!("Skipping profile entry {}={}: {}", key, value, reason),
                    }
                    report.record(key, Err(reason));
                }
            }
        }

        debug!(
            "Loaded {} mappings ({} entries skipped)",
            report.applied(),
            report.outcomes.len() - report.applied()
        );
        report
    }
}

/// Parses one `channel -> "source,min,max,deadzone"` entry.
fn parse_entry<P: PhysicalInput>(
    key: &str,
    value: &str,
) -> std::result::Result<(XInputType, CalibrationRecord<P>), SkipReason> {
    let input =
        XInputType::from_name(key).ok_or_else(|| SkipReason::UnknownKey(key.to_string()))?;

    let fields: Vec<&str> = value.split(SEPARATOR).collect();
    if fields.len() != ENTRY_FIELD_COUNT {
        return Err(SkipReason::FieldCount(fields.len()));
    }

    // Surrounding whitespace is tolerated here just like in the numeric fields.
    let name = fields[0].trim();
    let source = if name.is_empty() {
        None
    } else {
        Some(P::from_name(name).ok_or_else(|| SkipReason::UnknownSource(name.to_string()))?)
    };

    let record = CalibrationRecord {
        source,
        min: try_read_value(fields[1], 0.0),
        max: try_read_value(fields[2], 0.0),
        deadzone: try_read_value(fields[3], 0.0),
    };

    Ok((input, record))
}

/// Converts an internal value to its persisted integer percentage.
fn to_percent(value: f64) -> i64 {
    (value * 100.0).round_ties_even() as i64
}

/// Reads a persisted percentage back into the internal domain.
///
/// Returns `default` unchanged when `data` is not a finite number.
///
/// # Examples
///
/// ```
/// use pad_mapper::mapping::mapper::try_read_value;
///
/// assert_eq!(try_read_value("50", 0.0), 0.5);
/// assert_eq!(try_read_value("abc", 0.0), 0.0);
/// assert_eq!(try_read_value("", 0.25), 0.25);
/// ```
#[must_use]
pub fn try_read_value(data: &str, default: f64) -> f64 {
    match data.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value / 100.0,
        _ => default,
    }
}

/// Reads the start-when-connected setting. Only the exact literal `true`
/// enables it; anything else, including a missing key, reads as `false`.
#[must_use]
pub fn read_start_when_connected(data: &Dictionary) -> bool {
    data.get(START_WHEN_CONNECTED_KEY)
        .is_some_and(|value| value == "true")
}

/// Reads the selected D-pad setting, falling back to [`NO_DPAD`].
#[must_use]
pub fn read_selected_dpad(data: &Dictionary) -> i32 {
    data.get(SELECTED_DPAD_KEY)
        .and_then(|value| value.trim().parse::<i32>().ok())
        .unwrap_or(NO_DPAD)
}

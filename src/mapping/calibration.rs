//! # Calibration Module
//!
//! Per-channel calibration records and the transform that turns a physical
//! sample into a virtual controller value.
//!
//! ## Range Remap
//!
//! A physical sample arrives normalized to `0.0..=1.0`. It is remapped
//! linearly onto `min..=max` of the record. Setting `min > max` inverts the
//! channel; a narrow range trims it.
//!
//! ## Deadzone
//!
//! Remapped values closer to the channel's neutral point than `deadzone` are
//! snapped to neutral. For stick axes neutral is `0.5`, for everything else
//! it is `0.0`.
//!
//! ## Usage
//!
//! ```
//! use pad_mapper::controller::dualsense::DualSenseInput;
//! use pad_mapper::mapping::calibration::CalibrationRecord;
//! use pad_mapper::mapping::xinput::InputKind;
//!
//! let record = CalibrationRecord::new(DualSenseInput::LeftStickX, 0.0, 1.0, 0.1);
//!
//! // Near center: snapped to neutral
//! assert_eq!(record.apply(InputKind::Axis, Some(0.55)), 0.5);
//!
//! // Full deflection passes through
//! assert_eq!(record.apply(InputKind::Axis, Some(1.0)), 1.0);
//! ```

use crate::mapping::xinput::{InputKind, XInputType};

/// Lower bound of the virtual output range.
pub const OUTPUT_MIN: f64 = 0.0;
/// Upper bound of the virtual output range.
pub const OUTPUT_MAX: f64 = 1.0;

/// Calibration of one virtual channel.
///
/// Fields are not validated on assignment; an editor may hold transient
/// invalid values. See [`CalibrationRecord::warnings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRecord<P> {
    /// Physical control feeding this channel. `None` disables it.
    pub source: Option<P>,
    /// Output produced at the low end of the physical range.
    pub min: f64,
    /// Output produced at the high end of the physical range.
    pub max: f64,
    /// Distance from neutral below which output is forced to neutral.
    pub deadzone: f64,
}

/// A calibration value outside the range the transform was designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationWarning {
    /// Enabled channel with `min == max` never moves.
    FlatRange,
    /// `min` or `max` outside `-1.0..=1.0`.
    BoundsOutOfRange,
    /// Deadzone outside `0.0..=1.0`.
    DeadzoneOutOfRange,
}

impl<P: Copy> CalibrationRecord<P> {
    /// Creates an enabled record.
    #[must_use]
    pub fn new(source: P, min: f64, max: f64, deadzone: f64) -> Self {
        Self {
            source: Some(source),
            min,
            max,
            deadzone,
        }
    }

    /// Creates the disabled record synthesized for a channel without a
    /// mapping: no source, min and max at the channel's sentinel, no deadzone.
    ///
    /// # Examples
    ///
    /// ```
    /// use pad_mapper::controller::dualsense::DualSenseInput;
    /// use pad_mapper::mapping::calibration::CalibrationRecord;
    /// use pad_mapper::mapping::xinput::XInputType;
    ///
    /// let record = CalibrationRecord::<DualSenseInput>::disabled(XInputType::LY);
    /// assert!(record.source.is_none());
    /// assert_eq!((record.min, record.max), (0.5, 0.5));
    /// ```
    #[must_use]
    pub fn disabled(input: XInputType) -> Self {
        let sentinel = input.disable_value();
        Self {
            source: None,
            min: sentinel,
            max: sentinel,
            deadzone: 0.0,
        }
    }

    /// Returns true when a physical control feeds this channel.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Applies the calibration to a normalized physical sample.
    ///
    /// # Arguments
    ///
    /// * `kind` - Kind of the virtual channel, which fixes the neutral point
    /// * `raw` - Sample in `0.0..=1.0`, or `None` if the device has no reading
    ///
    /// # Returns
    ///
    /// Virtual channel value in `0.0..=1.0`
    #[must_use]
    pub fn apply(&self, kind: InputKind, raw: Option<f64>) -> f64 {
        let neutral = kind.neutral();

        let raw = match (self.source, raw) {
            (Some(_), Some(raw)) if raw.is_finite() => raw,
            _ => return neutral,
        };

        let value = self.remap(raw);

        if (value - neutral).abs() < self.deadzone {
            return neutral;
        }

        value.clamp(OUTPUT_MIN, OUTPUT_MAX)
    }

    /// Linear map of `0.0..=1.0` onto `min..=max`.
    #[inline]
    fn remap(&self, raw: f64) -> f64 {
        let raw = raw.clamp(0.0, 1.0);
        self.min + raw * (self.max - self.min)
    }

    /// Lists values the transform was not designed for. Nothing is rejected.
    #[must_use]
    pub fn warnings(&self) -> Vec<CalibrationWarning> {
        let mut warnings = Vec::new();
        if self.is_enabled() && self.min == self.max {
            warnings.push(CalibrationWarning::FlatRange);
        }
        if !(-1.0..=1.0).contains(&self.min) || !(-1.0..=1.0).contains(&self.max) {
            warnings.push(CalibrationWarning::BoundsOutOfRange);
        }
        if !(0.0..=1.0).contains(&self.deadzone) {
            warnings.push(CalibrationWarning::DeadzoneOutOfRange);
        }
        warnings
    }
}

/// Normalizes a raw reading from `min..=max` to `0.0..=1.0`.
///
/// # Examples
///
/// ```
/// use pad_mapper::mapping::calibration::normalize;
///
/// assert_eq!(normalize(0, 0, 255), 0.0);
/// assert_eq!(normalize(255, 0, 255), 1.0);
/// assert_eq!(normalize(-1, -1, 1), 0.0);
/// ```
#[must_use]
pub fn normalize(raw: i32, min: i32, max: i32) -> f64 {
    if max <= min {
        return 0.0;
    }
    let span = f64::from(max) - f64::from(min);
    ((f64::from(raw) - f64::from(min)) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Src;

    fn record(min: f64, max: f64, deadzone: f64) -> CalibrationRecord<Src> {
        CalibrationRecord::new(Src, min, max, deadzone)
    }

    // ==================== Disabled Tests ====================

    #[test]
    fn test_disabled_axis_outputs_center() {
        let rec = CalibrationRecord::<Src>::disabled(XInputType::LX);
        assert_eq!(rec.apply(InputKind::Axis, Some(1.0)), 0.5);
        assert_eq!(rec.apply(InputKind::Axis, Some(0.0)), 0.5);
    }

    #[test]
    fn test_disabled_button_outputs_released() {
        let rec = CalibrationRecord::<Src>::disabled(XInputType::A);
        assert_eq!(rec.apply(InputKind::Button, Some(1.0)), 0.0);
    }

    #[test]
    fn test_disabled_ignores_min_max() {
        let rec = CalibrationRecord::<Src> {
            source: None,
            min: 1.0,
            max: 1.0,
            deadzone: 0.0,
        };
        assert_eq!(rec.apply(InputKind::Trigger, Some(0.7)), 0.0);
    }

    #[test]
    fn test_missing_sample_outputs_neutral() {
        let rec = record(0.0, 1.0, 0.0);
        assert_eq!(rec.apply(InputKind::Axis, None), 0.5);
        assert_eq!(rec.apply(InputKind::Trigger, None), 0.0);
        assert_eq!(rec.apply(InputKind::Axis, Some(f64::NAN)), 0.5);
    }

    // ==================== Remap Tests ====================

    #[test]
    fn test_full_range_is_identity() {
        let rec = record(0.0, 1.0, 0.0);
        for raw in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!((rec.apply(InputKind::Axis, Some(raw)) - raw).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inverted_range() {
        let rec = record(1.0, 0.0, 0.0);
        assert_eq!(rec.apply(InputKind::Axis, Some(0.0)), 1.0);
        assert_eq!(rec.apply(InputKind::Axis, Some(1.0)), 0.0);
        assert!((rec.apply(InputKind::Axis, Some(0.25)) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_narrowed_range() {
        let rec = record(0.2, 0.8, 0.0);
        assert!((rec.apply(InputKind::Trigger, Some(0.0)) - 0.2).abs() < 1e-9);
        assert!((rec.apply(InputKind::Trigger, Some(1.0)) - 0.8).abs() < 1e-9);
        assert!((rec.apply(InputKind::Trigger, Some(0.5)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_raw_sample_is_clamped_before_remap() {
        let rec = record(0.0, 1.0, 0.0);
        assert_eq!(rec.apply(InputKind::Trigger, Some(1.5)), 1.0);
        assert_eq!(rec.apply(InputKind::Trigger, Some(-0.5)), 0.0);
    }

    #[test]
    fn test_output_is_clamped() {
        let rec = record(-1.0, 2.0, 0.0);
        assert_eq!(rec.apply(InputKind::Trigger, Some(0.0)), 0.0);
        assert_eq!(rec.apply(InputKind::Trigger, Some(1.0)), 1.0);
    }

    // ==================== Deadzone Tests ====================

    #[test]
    fn test_axis_deadzone_is_around_center() {
        let rec = record(0.0, 1.0, 0.1);
        assert_eq!(rec.apply(InputKind::Axis, Some(0.45)), 0.5);
        assert_eq!(rec.apply(InputKind::Axis, Some(0.59)), 0.5);
        assert!((rec.apply(InputKind::Axis, Some(0.7)) - 0.7).abs() < 1e-9);
        assert!((rec.apply(InputKind::Axis, Some(0.2)) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_trigger_deadzone_is_near_zero() {
        let rec = record(0.0, 1.0, 0.1);
        assert_eq!(rec.apply(InputKind::Trigger, Some(0.05)), 0.0);
        assert!((rec.apply(InputKind::Trigger, Some(0.3)) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_deadzone_applies_after_remap() {
        // Raw 0.1 remaps to 0.55, within 0.1 of center
        let rec = record(0.5, 1.0, 0.1);
        assert_eq!(rec.apply(InputKind::Axis, Some(0.1)), 0.5);
    }

    #[test]
    fn test_zero_deadzone_passes_everything() {
        let rec = record(0.0, 1.0, 0.0);
        assert!((rec.apply(InputKind::Axis, Some(0.501)) - 0.501).abs() < 1e-9);
    }

    // ==================== Warning Tests ====================

    #[test]
    fn test_valid_record_has_no_warnings() {
        assert!(record(0.0, 1.0, 0.1).warnings().is_empty());
        assert!(CalibrationRecord::<Src>::disabled(XInputType::LX).warnings().is_empty());
    }

    #[test]
    fn test_warnings_are_reported() {
        assert_eq!(record(0.3, 0.3, 0.0).warnings(), vec![CalibrationWarning::FlatRange]);
        assert_eq!(
            record(0.0, 1.5, 0.0).warnings(),
            vec![CalibrationWarning::BoundsOutOfRange]
        );
        assert_eq!(
            record(0.0, 1.0, -0.2).warnings(),
            vec![CalibrationWarning::DeadzoneOutOfRange]
        );
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_axis_range() {
        assert_eq!(normalize(0, 0, 255), 0.0);
        assert!((normalize(128, 0, 255) - 0.502).abs() < 0.01);
        assert_eq!(normalize(255, 0, 255), 1.0);
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize(300, 0, 255), 1.0);
        assert_eq!(normalize(-10, 0, 255), 0.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        assert_eq!(normalize(5, 10, 10), 0.0);
        assert_eq!(normalize(5, 10, 0), 0.0);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shape-detection parameters and the store that validates writes to them.
//
// The parameter set always holds all five values. Writes that fail to parse
// are rejected and the previous value stays in place, so nothing non-numeric
// can ever reach the processing service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{KonturwerkError, Result};

/// Numeric kind a parameter is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Integer,
    Float,
}

/// The five recognised processing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    ThresholdValue,
    SmoothingFactor,
    CurvinessFactor,
    PixelsPerMm,
    ScaleFactor,
}

impl ParameterName {
    /// All parameters, in display order.
    pub const ALL: [ParameterName; 5] = [
        Self::ThresholdValue,
        Self::SmoothingFactor,
        Self::CurvinessFactor,
        Self::PixelsPerMm,
        Self::ScaleFactor,
    ];

    /// Key used on the wire and by the presentation layer.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::ThresholdValue => "thresholdValue",
            Self::SmoothingFactor => "smoothingFactor",
            Self::CurvinessFactor => "curvinessFactor",
            Self::PixelsPerMm => "pixelsPerMm",
            Self::ScaleFactor => "scaleFactor",
        }
    }

    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::ThresholdValue | Self::CurvinessFactor => ParameterKind::Integer,
            Self::SmoothingFactor | Self::PixelsPerMm | Self::ScaleFactor => ParameterKind::Float,
        }
    }

    /// Form label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThresholdValue => "Threshold Value (0 - 255)",
            Self::SmoothingFactor => "Smoothing Factor (0.0001 - 0.01)",
            Self::CurvinessFactor => "Curviness Factor (0 - 100000)",
            Self::PixelsPerMm => "Pixels per mm (0.1 - 10)",
            Self::ScaleFactor => "Scale Factor (0.001 - 0.1)",
        }
    }

    /// Tooltip text.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ThresholdValue => {
                "Intensity cutoff for edge detection. Higher values keep only the strongest edges."
            }
            Self::SmoothingFactor => {
                "How much the contour is simplified before smoothing. Smaller values keep more detail."
            }
            Self::CurvinessFactor => {
                "Weight of the curve fit applied to the simplified contour. Higher values give smoother curves."
            }
            Self::PixelsPerMm => {
                "Spatial calibration: how many image pixels make up one millimetre on the export."
            }
            Self::ScaleFactor => "Geometric scale applied to the contour when exporting to DXF.",
        }
    }

    /// Suggested input range. Values outside it are accepted.
    pub fn advisory_range(&self) -> (f64, f64) {
        match self {
            Self::ThresholdValue => (0.0, 255.0),
            Self::SmoothingFactor => (0.0001, 0.01),
            Self::CurvinessFactor => (0.0, 100_000.0),
            Self::PixelsPerMm => (0.1, 10.0),
            Self::ScaleFactor => (0.001, 0.1),
        }
    }

    /// Input step for number fields.
    pub fn step(&self) -> &'static str {
        match self {
            Self::ThresholdValue | Self::CurvinessFactor => "1",
            Self::SmoothingFactor => "0.0001",
            Self::PixelsPerMm => "0.1",
            Self::ScaleFactor => "0.001",
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ParameterName {
    type Err = KonturwerkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.wire_name() == s)
            .ok_or_else(|| KonturwerkError::UnknownParameter(s.to_string()))
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
}

impl ParameterValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// The complete set of processing parameters.
///
/// Serialises with the service's camelCase key names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    pub threshold_value: i64,
    pub smoothing_factor: f64,
    pub curviness_factor: i64,
    pub pixels_per_mm: f64,
    pub scale_factor: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            threshold_value: 245,
            smoothing_factor: 0.001,
            curviness_factor: 100_000,
            pixels_per_mm: 1.0,
            scale_factor: 0.002,
        }
    }
}

impl ParameterSet {
    pub fn get(&self, name: ParameterName) -> ParameterValue {
        match name {
            ParameterName::ThresholdValue => ParameterValue::Integer(self.threshold_value),
            ParameterName::SmoothingFactor => ParameterValue::Float(self.smoothing_factor),
            ParameterName::CurvinessFactor => ParameterValue::Integer(self.curviness_factor),
            ParameterName::PixelsPerMm => ParameterValue::Float(self.pixels_per_mm),
            ParameterName::ScaleFactor => ParameterValue::Float(self.scale_factor),
        }
    }

    /// Check every value the way the store would. Used for sets loaded from
    /// configuration files.
    pub fn validate(&self) -> Result<()> {
        for name in ParameterName::ALL {
            check(name, self.get(name))?;
        }
        Ok(())
    }

    fn assign(&mut self, name: ParameterName, value: ParameterValue) {
        match (name, value) {
            (ParameterName::ThresholdValue, ParameterValue::Integer(v)) => self.threshold_value = v,
            (ParameterName::CurvinessFactor, ParameterValue::Integer(v)) => {
                self.curviness_factor = v
            }
            (ParameterName::SmoothingFactor, v) => self.smoothing_factor = v.as_f64(),
            (ParameterName::PixelsPerMm, v) => self.pixels_per_mm = v.as_f64(),
            (ParameterName::ScaleFactor, v) => self.scale_factor = v.as_f64(),
            // `coerce` never hands a float to an integer parameter.
            (ParameterName::ThresholdValue | ParameterName::CurvinessFactor, _) => {}
        }
    }
}

/// Owns the current [`ParameterSet`] and validates every write.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    values: ParameterSet,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configured set. Invalid values fall back to defaults.
    pub fn with_values(values: ParameterSet) -> Self {
        match values.validate() {
            Ok(()) => Self { values },
            Err(e) => {
                warn!(error = %e, "configured parameters rejected, using defaults");
                Self::default()
            }
        }
    }

    /// Current values.
    pub fn get(&self) -> ParameterSet {
        self.values
    }

    /// Parse and store a raw user-entered value for the named parameter.
    ///
    /// On any error the store is left unchanged.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<ParameterSet> {
        let param: ParameterName = name.parse()?;
        let value = parse_value(param, raw)?;
        self.set_typed(param, value)
    }

    /// Store an already-typed value.
    pub fn set_typed(&mut self, name: ParameterName, value: ParameterValue) -> Result<ParameterSet> {
        let value = coerce(name, value)?;
        check(name, value)?;
        self.values.assign(name, value);
        debug!(parameter = %name, %value, "parameter updated");
        Ok(self.values)
    }

    /// Restore the default values.
    pub fn reset(&mut self) -> ParameterSet {
        self.values = ParameterSet::default();
        self.values
    }
}

fn invalid(name: ParameterName, value: impl fmt::Display, reason: &str) -> KonturwerkError {
    KonturwerkError::InvalidValue {
        name: name.wire_name().to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value(name: ParameterName, raw: &str) -> Result<ParameterValue> {
    let trimmed = raw.trim();
    match name.kind() {
        ParameterKind::Integer => {
            if let Ok(v) = trimmed.parse::<i64>() {
                return Ok(ParameterValue::Integer(v));
            }
            // Number fields may hand back "100000.0" or "1e5".
            match trimmed.parse::<f64>() {
                Ok(v) => coerce(name, ParameterValue::Float(v)),
                Err(_) => Err(invalid(name, raw, "not an integer")),
            }
        }
        ParameterKind::Float => trimmed
            .parse::<f64>()
            .map(ParameterValue::Float)
            .map_err(|_| invalid(name, raw, "not a number")),
    }
}

fn coerce(name: ParameterName, value: ParameterValue) -> Result<ParameterValue> {
    match (name.kind(), value) {
        (ParameterKind::Integer, ParameterValue::Float(v)) => {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(ParameterValue::Integer(v as i64))
            } else {
                Err(invalid(name, v, "not an integer"))
            }
        }
        (ParameterKind::Float, ParameterValue::Integer(v)) => Ok(ParameterValue::Float(v as f64)),
        _ => Ok(value),
    }
}

fn check(name: ParameterName, value: ParameterValue) -> Result<()> {
    let v = value.as_f64();
    if !v.is_finite() {
        return Err(invalid(name, value, "not a finite number"));
    }
    if name == ParameterName::PixelsPerMm && v <= 0.0 {
        return Err(invalid(name, value, "must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_keys(set: &ParameterSet) -> Vec<String> {
        let mut keys: Vec<String> = serde_json::to_value(set)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn defaults_match_service_defaults() {
        let set = ParameterStore::new().get();
        assert_eq!(set.threshold_value, 245);
        assert_eq!(set.smoothing_factor, 0.001);
        assert_eq!(set.curviness_factor, 100_000);
        assert_eq!(set.pixels_per_mm, 1.0);
        assert_eq!(set.scale_factor, 0.002);
    }

    #[test]
    fn serialises_exactly_five_wire_keys() {
        let keys = wire_keys(&ParameterSet::default());
        assert_eq!(
            keys,
            vec![
                "curvinessFactor",
                "pixelsPerMm",
                "scaleFactor",
                "smoothingFactor",
                "thresholdValue"
            ]
        );
    }

    #[test]
    fn unknown_name_is_rejected_and_set_unchanged() {
        let mut store = ParameterStore::new();
        let before = store.get();
        let err = store.set("offsetValue", "3").unwrap_err();
        assert!(matches!(err, KonturwerkError::UnknownParameter(ref n) if n == "offsetValue"));
        assert_eq!(store.get(), before);
        assert_eq!(wire_keys(&store.get()).len(), 5);
    }

    #[test]
    fn non_numeric_input_keeps_previous_value() {
        let mut store = ParameterStore::new();
        store.set("thresholdValue", "200").unwrap();
        for raw in ["", "abc", "12px", "NaN", "inf", "-infinity"] {
            let err = store.set("thresholdValue", raw).unwrap_err();
            assert!(matches!(err, KonturwerkError::InvalidValue { .. }), "{raw}");
            let err = store.set("scaleFactor", raw).unwrap_err();
            assert!(matches!(err, KonturwerkError::InvalidValue { .. }), "{raw}");
        }
        assert_eq!(store.get().threshold_value, 200);
        assert_eq!(store.get().scale_factor, 0.002);
    }

    #[test]
    fn integer_parameters_reject_fractions() {
        let mut store = ParameterStore::new();
        assert!(store.set("curvinessFactor", "12.5").is_err());
        assert_eq!(store.get().curviness_factor, 100_000);
        store.set("curvinessFactor", "1e3").unwrap();
        assert_eq!(store.get().curviness_factor, 1000);
    }

    #[test]
    fn float_parameters_parse() {
        let mut store = ParameterStore::new();
        let set = store.set("smoothingFactor", " 0.0005 ").unwrap();
        assert_eq!(set.smoothing_factor, 0.0005);
        let set = store.set("pixelsPerMm", "3").unwrap();
        assert_eq!(set.pixels_per_mm, 3.0);
    }

    #[test]
    fn pixels_per_mm_must_be_positive() {
        let mut store = ParameterStore::new();
        assert!(store.set("pixelsPerMm", "0").is_err());
        assert!(store.set("pixelsPerMm", "-2").is_err());
        assert_eq!(store.get().pixels_per_mm, 1.0);
    }

    #[test]
    fn out_of_range_values_are_advisory() {
        let mut store = ParameterStore::new();
        let set = store.set("thresholdValue", "400").unwrap();
        assert_eq!(set.threshold_value, 400);
    }

    #[test]
    fn set_typed_coerces_between_kinds() {
        let mut store = ParameterStore::new();
        store
            .set_typed(ParameterName::ScaleFactor, ParameterValue::Integer(1))
            .unwrap();
        assert_eq!(store.get().scale_factor, 1.0);
        assert!(store
            .set_typed(ParameterName::ThresholdValue, ParameterValue::Float(f64::NAN))
            .is_err());
        assert_eq!(store.get().threshold_value, 245);
    }

    #[test]
    fn with_values_rejects_invalid_configuration() {
        let bad = ParameterSet {
            pixels_per_mm: 0.0,
            ..ParameterSet::default()
        };
        assert_eq!(ParameterStore::with_values(bad).get(), ParameterSet::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = ParameterStore::new();
        store.set("thresholdValue", "10").unwrap();
        assert_eq!(store.reset(), ParameterSet::default());
    }

    #[test]
    fn names_round_trip_through_wire_names() {
        for name in ParameterName::ALL {
            assert_eq!(name.wire_name().parse::<ParameterName>().unwrap(), name);
        }
    }

    #[test]
    fn integers_beyond_i64_are_rejected() {
        let mut store = ParameterStore::new();
        let err = store.set("curvinessFactor", "9223372036854775808").unwrap_err();
        assert!(matches!(err, KonturwerkError::InvalidValue { .. }));
        assert_eq!(store.get().curviness_factor, 100_000);
        assert!(store.set("curvinessFactor", "1e19").is_err());
    }
}

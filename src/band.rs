//! Three-point (low / typical / high) estimates used for energy and peak power.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// How conservatively a pack is counted: one slot of a [`Band`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UsageLevel {
    Low,
    Typical,
    High,
}

impl UsageLevel {
    /// Maps a raw usage index onto a level, clamping into `0..=2`.
    ///
    /// ```
    /// use station_sizer::band::UsageLevel;
    ///
    /// assert_eq!(UsageLevel::from_index(-3), UsageLevel::Low);
    /// assert_eq!(UsageLevel::from_index(1), UsageLevel::Typical);
    /// assert_eq!(UsageLevel::from_index(9), UsageLevel::High);
    /// ```
    pub fn from_index(index: i64) -> Self {
        match index.clamp(0, 2) {
            0 => Self::Low,
            1 => Self::Typical,
            _ => Self::High,
        }
    }

    /// Position of this level inside a band (0, 1 or 2).
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Typical => 1,
            Self::High => 2,
        }
    }
}

/// A (min, typical, max) triple.
///
/// Serialized as a three-element JSON array to match the catalog files and
/// the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Band<T> {
    pub min: T,
    pub typical: T,
    pub max: T,
}

impl<T: Copy> Band<T> {
    pub const fn new(min: T, typical: T, max: T) -> Self {
        Self { min, typical, max }
    }

    /// Returns the slot selected by `level`.
    pub fn get(&self, level: UsageLevel) -> T {
        match level {
            UsageLevel::Low => self.min,
            UsageLevel::Typical => self.typical,
            UsageLevel::High => self.max,
        }
    }

    /// Mutable access to the slot selected by `level`.
    pub fn get_mut(&mut self, level: UsageLevel) -> &mut T {
        match level {
            UsageLevel::Low => &mut self.min,
            UsageLevel::Typical => &mut self.typical,
            UsageLevel::High => &mut self.max,
        }
    }

    pub fn to_array(self) -> [T; 3] {
        [self.min, self.typical, self.max]
    }
}

impl<T: Copy + PartialOrd> Band<T> {
    /// `true` when `min <= typical <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.typical && self.typical <= self.max
    }
}

impl Band<f64> {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Parses a catalog band: a list of exactly three numbers (or numeric strings).
    ///
    /// Returns `None` for anything else, including non-finite components.
    /// Negative components are clamped to zero.
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 3 {
            return None;
        }
        let min = parse_number(&items[0])?;
        let typical = parse_number(&items[1])?;
        let max = parse_number(&items[2])?;
        Some(Self::new(min.max(0.0), typical.max(0.0), max.max(0.0)))
    }

    /// Like [`Band::from_value`] but falls back to all zeros.
    pub fn lenient(value: Option<&Value>) -> Self {
        value.and_then(Self::from_value).unwrap_or(Self::ZERO)
    }

    /// Restores `min <= typical <= max`.
    ///
    /// A band with nothing in the high slot but a positive typical value
    /// takes the typical value as its maximum first.
    pub fn normalized(self) -> Self {
        let Self {
            mut min,
            mut typical,
            mut max,
        } = self;
        if max == 0.0 && typical > 0.0 {
            max = typical;
        }
        min = min.min(typical).min(max);
        max = max.max(typical).max(min);
        if typical < min {
            typical = min;
        }
        Self::new(min, typical, max)
    }

    pub fn rounded(self, decimals: i32) -> Self {
        Self::new(
            round_to(self.min, decimals),
            round_to(self.typical, decimals),
            round_to(self.max, decimals),
        )
    }

    /// Rounds every slot to the nearest whole number (ties to even).
    pub fn to_whole(self) -> Band<i64> {
        Band::new(
            self.min.round_ties_even() as i64,
            self.typical.round_ties_even() as i64,
            self.max.round_ties_even() as i64,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.typical.is_finite() && self.max.is_finite()
    }
}

impl<T: Copy + fmt::Display> fmt::Display for Band<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.min, self.typical, self.max)
    }
}

impl<T: Copy + Serialize> Serialize for Band<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de, T: Copy + Deserialize<'de>> Deserialize<'de> for Band<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [min, typical, max] = <[T; 3]>::deserialize(deserializer)?;
        Ok(Self::new(min, typical, max))
    }
}

/// Rounds `value` to `decimals` places.
///
/// Rounds the exact binary value, so `0.0055` (stored slightly below the
/// half) goes down while `0.0005` (stored slightly above) goes up. Exact
/// halves go to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let places = usize::try_from(decimals).unwrap_or(0);
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Reads a finite number from a JSON number or a numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn usage_index_is_clamped() {
        assert_eq!(UsageLevel::from_index(i64::MIN), UsageLevel::Low);
        assert_eq!(UsageLevel::from_index(0), UsageLevel::Low);
        assert_eq!(UsageLevel::from_index(2), UsageLevel::High);
        assert_eq!(UsageLevel::from_index(i64::MAX), UsageLevel::High);
        assert_eq!(UsageLevel::Typical.index(), 1);
    }

    #[test]
    fn parses_numeric_and_string_components() {
        let band = Band::from_value(&json!([0.5, "1.0", 2])).expect("band should parse");
        assert_eq!(band, Band::new(0.5, 1.0, 2.0));
    }

    #[test]
    fn malformed_bands_fall_back_to_zero() {
        assert_eq!(Band::lenient(Some(&json!([1, 2]))), Band::ZERO);
        assert_eq!(Band::lenient(Some(&json!([1, "x", 3]))), Band::ZERO);
        assert_eq!(Band::lenient(Some(&json!({"min": 1}))), Band::ZERO);
        assert_eq!(Band::lenient(Some(&json!(null))), Band::ZERO);
        assert_eq!(Band::lenient(None), Band::ZERO);
    }

    #[test]
    fn negative_components_are_clamped() {
        let band = Band::from_value(&json!([-1.0, 2.0, 3.0])).expect("band should parse");
        assert_eq!(band.min, 0.0);
    }

    #[test]
    fn normalize_fills_missing_max_from_typical() {
        let band = Band::new(1.0, 3.0, 0.0).normalized();
        assert_eq!(band, Band::new(1.0, 3.0, 3.0));
    }

    #[test]
    fn normalize_pulls_min_down_to_typical() {
        let band = Band::new(5.0, 3.0, 4.0).normalized();
        assert_eq!(band, Band::new(3.0, 3.0, 4.0));
        assert!(band.is_ordered());
    }

    #[test]
    fn normalize_raises_max_to_typical() {
        let band = Band::new(1.0, 6.0, 4.0).normalized();
        assert_eq!(band, Band::new(1.0, 6.0, 6.0));
    }

    #[test]
    fn low_only_band_collapses_to_zero() {
        // Nothing in typical or high: min is pulled down to them.
        let band = Band::new(2.0, 0.0, 0.0).normalized();
        assert_eq!(band, Band::ZERO);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(2.34567, 3), 2.346);
        assert_eq!(round_to(4526.000000000001, 2), 4526.0);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert!(round_to(f64::NAN, 3).is_nan());
        assert_eq!(Band::new(199.5, 400.4, 800.6).to_whole(), Band::new(200, 400, 801));
    }

    #[test]
    fn rounding_uses_stored_value_at_half_way_points() {
        assert_eq!(round_to(0.0055, 3), 0.005);
        assert_eq!(round_to(0.0005, 3), 0.001);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Band::new(1, 2, 3)).expect("serialize");
        assert_eq!(json, "[1,2,3]");
        let back: Band<i64> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Band::new(1, 2, 3));
    }
}

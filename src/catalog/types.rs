//! Catalog record types: archetypes, appliance packs, solar yields and tiers.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::band::{Band, parse_number};
use crate::error::SizingError;

/// Electrical group a pack belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackGroup {
    /// Single-phase AC.
    Ac1p,
    /// Three-phase AC.
    Ac3p,
    Dc12v,
    Dc24v,
    Dc48v,
}

impl PackGroup {
    pub const ALL: [PackGroup; 5] = [
        PackGroup::Ac1p,
        PackGroup::Ac3p,
        PackGroup::Dc12v,
        PackGroup::Dc24v,
        PackGroup::Dc48v,
    ];

    /// Canonical upper-case name, as used in catalog file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ac1p => "AC1P",
            Self::Ac3p => "AC3P",
            Self::Dc12v => "DC12V",
            Self::Dc24v => "DC24V",
            Self::Dc48v => "DC48V",
        }
    }

    /// Short key used in request payloads and the catalog listing.
    pub fn short_key(self) -> &'static str {
        match self {
            Self::Ac1p => "ac1p",
            Self::Ac3p => "ac3p",
            Self::Dc12v => "dc12",
            Self::Dc24v => "dc24",
            Self::Dc48v => "dc48",
        }
    }

    /// Catalog file holding this group's packs.
    pub fn file_name(self) -> String {
        format!("packs-{}.json", self.as_str())
    }
}

impl fmt::Display for PackGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackGroup {
    type Err = SizingError;

    /// Accepts the historical spellings of each group, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ac1p" | "ac" | "ac_1p" => Ok(Self::Ac1p),
            "ac3p" | "ac_3p" => Ok(Self::Ac3p),
            "dc12" | "dc12v" => Ok(Self::Dc12v),
            "dc24" | "dc24v" => Ok(Self::Dc24v),
            "dc48" | "dc48v" => Ok(Self::Dc48v),
            other => Err(SizingError::NotFound(format!("Unknown pack group: {other}"))),
        }
    }
}

/// Baseline household or site profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Archetype {
    #[serde(skip)]
    pub id: String,
    pub base_load_kwh_day: Band<f64>,
    pub base_peak_w: Band<f64>,
    /// Descriptive fields carried through from the catalog.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Archetype {
    pub fn new(id: impl Into<String>, base_load_kwh_day: Band<f64>, base_peak_w: Band<f64>) -> Self {
        Self {
            id: id.into(),
            base_load_kwh_day,
            base_peak_w,
            attributes: Map::new(),
        }
    }

    /// Builds an archetype from a raw catalog record, zeroing malformed bands.
    pub fn from_record(id: impl Into<String>, mut record: Map<String, Value>) -> Self {
        let id = id.into();
        let base_load_kwh_day = take_band(&mut record, "base_load_kwh_day", &id);
        let base_peak_w = take_band(&mut record, "base_peak_w", &id);
        Self {
            id,
            base_load_kwh_day,
            base_peak_w,
            attributes: record,
        }
    }
}

/// A selectable appliance or appliance group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pack {
    #[serde(skip)]
    pub group: PackGroup,
    #[serde(skip)]
    pub key: String,
    pub kwh_day: Band<f64>,
    pub peak_w: Band<f64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Pack {
    pub fn new(group: PackGroup, key: impl Into<String>, kwh_day: Band<f64>, peak_w: Band<f64>) -> Self {
        Self {
            group,
            key: key.into(),
            kwh_day,
            peak_w,
            attributes: Map::new(),
        }
    }

    pub fn from_record(group: PackGroup, key: impl Into<String>, mut record: Map<String, Value>) -> Self {
        let key = key.into();
        let kwh_day = take_band(&mut record, "kwh_day", &key);
        let peak_w = take_band(&mut record, "peak_w", &key);
        Self {
            group,
            key,
            kwh_day,
            peak_w,
            attributes: record,
        }
    }
}

/// Seasonal solar yield for one city, in kWh per installed kWp per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarCityYield {
    #[serde(skip)]
    pub city: String,
    pub summer_kwh_per_kwp: f64,
    pub winter_kwh_per_kwp: f64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl SolarCityYield {
    pub fn new(city: impl Into<String>, summer_kwh_per_kwp: f64, winter_kwh_per_kwp: f64) -> Self {
        Self {
            city: city.into(),
            summer_kwh_per_kwp,
            winter_kwh_per_kwp,
            attributes: Map::new(),
        }
    }

    /// Missing or non-numeric coefficients read as zero.
    pub fn from_record(city: impl Into<String>, mut record: Map<String, Value>) -> Self {
        let mut coefficient = |name: &str| {
            record
                .remove(name)
                .as_ref()
                .and_then(parse_number)
                .unwrap_or(0.0)
        };
        let summer_kwh_per_kwp = coefficient("summer_kwh_per_kwp");
        let winter_kwh_per_kwp = coefficient("winter_kwh_per_kwp");
        Self {
            city: city.into(),
            summer_kwh_per_kwp,
            winter_kwh_per_kwp,
            attributes: record,
        }
    }
}

/// A commercially defined power-station capacity class.
///
/// The catalog record is kept verbatim and passed through to the caller; the
/// two sizing figures are parsed views over it. A tier whose figures do not
/// parse is never eligible for recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub id: String,
    pub capacity_wh_total: Option<f64>,
    pub inverter_w_continuous: Option<f64>,
    record: Map<String, Value>,
}

impl Tier {
    pub const CAPACITY_FIELD: &'static str = "capacity_wh_total";
    pub const INVERTER_FIELD: &'static str = "inverter_w_continuous";

    pub fn from_record(id: impl Into<String>, record: Map<String, Value>) -> Self {
        let capacity_wh_total = record.get(Self::CAPACITY_FIELD).and_then(parse_number);
        let inverter_w_continuous = record.get(Self::INVERTER_FIELD).and_then(parse_number);
        Self {
            id: id.into(),
            capacity_wh_total,
            inverter_w_continuous,
            record,
        }
    }

    /// Builds a tier with just the two sizing figures and a display name.
    pub fn new(id: impl Into<String>, name: &str, capacity_wh_total: f64, inverter_w_continuous: f64) -> Self {
        let mut record = Map::new();
        record.insert("name".into(), Value::from(name));
        record.insert(Self::CAPACITY_FIELD.into(), Value::from(capacity_wh_total));
        record.insert(Self::INVERTER_FIELD.into(), Value::from(inverter_w_continuous));
        Self::from_record(id, record)
    }

    /// The raw catalog record.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Display name from the record, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(Value::as_str)
    }

    /// `true` when both sizing figures parsed.
    pub fn is_rated(&self) -> bool {
        self.capacity_wh_total.is_some() && self.inverter_w_continuous.is_some()
    }
}

impl Serialize for Tier {
    /// Emits the record unchanged, adding `tier_id` when the record lacks one.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_id = self.record.contains_key("tier_id");
        let len = self.record.len() + usize::from(!has_id);
        let mut map = serializer.serialize_map(Some(len))?;
        for (k, v) in &self.record {
            map.serialize_entry(k, v)?;
        }
        if !has_id {
            map.serialize_entry("tier_id", &self.id)?;
        }
        map.end()
    }
}

fn take_band(record: &mut Map<String, Value>, field: &str, owner: &str) -> Band<f64> {
    let raw = record.remove(field);
    match raw.as_ref().map(Band::from_value) {
        Some(Some(band)) => band,
        Some(None) => {
            warn!(record = owner, field, "malformed band in catalog, using zeros");
            Band::ZERO
        }
        None => Band::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn pack_group_synonyms() {
        assert_eq!("ac".parse::<PackGroup>(), Ok(PackGroup::Ac1p));
        assert_eq!("AC_1P".parse::<PackGroup>(), Ok(PackGroup::Ac1p));
        assert_eq!("ac_3p".parse::<PackGroup>(), Ok(PackGroup::Ac3p));
        assert_eq!("dc12".parse::<PackGroup>(), Ok(PackGroup::Dc12v));
        assert_eq!("DC24V".parse::<PackGroup>(), Ok(PackGroup::Dc24v));
        assert_eq!(" dc48 ".parse::<PackGroup>(), Ok(PackGroup::Dc48v));
    }

    #[test]
    fn unknown_pack_group_is_not_found() {
        let err = "dc36".parse::<PackGroup>().unwrap_err();
        assert_eq!(err, SizingError::NotFound("Unknown pack group: dc36".into()));
    }

    #[test]
    fn pack_group_file_names() {
        assert_eq!(PackGroup::Dc12v.file_name(), "packs-DC12V.json");
        assert_eq!(PackGroup::Ac3p.short_key(), "ac3p");
    }

    #[test]
    fn archetype_record_keeps_attributes() {
        let arch = Archetype::from_record(
            "flat",
            object(json!({
                "label": "Small flat",
                "base_load_kwh_day": [2.0, 3.0, 4.5],
                "base_peak_w": [200, 400, 800]
            })),
        );
        assert_eq!(arch.base_load_kwh_day, Band::new(2.0, 3.0, 4.5));
        assert_eq!(arch.base_peak_w, Band::new(200.0, 400.0, 800.0));
        assert_eq!(arch.attributes.get("label"), Some(&json!("Small flat")));
        assert!(!arch.attributes.contains_key("base_peak_w"));
    }

    #[test]
    fn pack_record_with_bad_band_is_zeroed() {
        let pack = Pack::from_record(
            PackGroup::Ac1p,
            "fridge",
            object(json!({"kwh_day": [1.0, 2.0], "peak_w": [100, 150, 900]})),
        );
        assert_eq!(pack.kwh_day, Band::ZERO);
        assert_eq!(pack.peak_w, Band::new(100.0, 150.0, 900.0));
    }

    #[test]
    fn solar_record_defaults_missing_coefficients() {
        let city = SolarCityYield::from_record("Rize", object(json!({"summer_kwh_per_kwp": "4.1"})));
        assert_eq!(city.summer_kwh_per_kwp, 4.1);
        assert_eq!(city.winter_kwh_per_kwp, 0.0);
    }

    #[test]
    fn tier_parses_numeric_strings() {
        let tier = Tier::from_record(
            "t",
            object(json!({"capacity_wh_total": "2048", "inverter_w_continuous": 2400})),
        );
        assert_eq!(tier.capacity_wh_total, Some(2048.0));
        assert_eq!(tier.inverter_w_continuous, Some(2400.0));
        assert!(tier.is_rated());
    }

    #[test]
    fn tier_with_unparseable_figures_is_unrated() {
        let tier = Tier::from_record(
            "t",
            object(json!({"capacity_wh_total": "lots", "inverter_w_continuous": 2400})),
        );
        assert_eq!(tier.capacity_wh_total, None);
        assert!(!tier.is_rated());
    }

    #[test]
    fn tier_serializes_record_with_tier_id() {
        let tier = Tier::new("tier_2_comfort", "Comfort", 2048.0, 2400.0);
        let json = serde_json::to_value(&tier).expect("serialize");
        assert_eq!(json["tier_id"], "tier_2_comfort");
        assert_eq!(json["name"], "Comfort");
        assert_eq!(json["capacity_wh_total"], 2048.0);
    }

    #[test]
    fn tier_keeps_existing_tier_id() {
        let tier = Tier::from_record("key", object(json!({"tier_id": "custom"})));
        let json = serde_json::to_value(&tier).expect("serialize");
        assert_eq!(json["tier_id"], "custom");
        assert_eq!(json.as_object().map(Map::len), Some(1));
    }
}

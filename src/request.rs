//! Caller-facing request payload and its translation into a [`ProfileRequest`].
//!
//! Two payload shapes are accepted:
//! - legacy: `{ "archetype": "...", "packs": ["lighting_basic", ...] }`
//! - rich: `{ "archetype_id": "...", "expert_mode": false,
//!   "packs": [{"group": "ac1p", "key": "lighting_basic", "usage_index": 1}],
//!   "city": "Istanbul", "solar_wp": 2000 }`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::band::parse_number;
use crate::catalog::PackGroup;
use crate::error::SizingError;
use crate::sizing::{PackInput, PackSelection, ProfileRequest};

/// Pack list in either shape.
///
/// The shape is decided by the element type: a list of strings is legacy,
/// a list of objects is rich. Mixed lists are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPacks {
    Keys(Vec<String>),
    Selections(Vec<RawSelection>),
}

/// One element of a rich pack list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSelection {
    /// Group name, any accepted spelling.
    #[serde(default = "default_group")]
    pub group: String,
    /// Selections without a key are dropped.
    #[serde(default)]
    pub key: String,
    /// A number or numeric string. Fractional values truncate toward zero
    /// before clamping.
    #[serde(default = "default_usage_index", deserialize_with = "lenient_usage_index")]
    pub usage_index: f64,
}

fn default_group() -> String {
    "ac1p".to_string()
}

fn default_usage_index() -> f64 {
    1.0
}

fn lenient_usage_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_number(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("usage_index must be a number, got {value}")))
}

/// Body of a calculate request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype_id: Option<String>,
    /// Legacy name for `archetype_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(default)]
    pub expert_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packs: Option<RawPacks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_wp: Option<f64>,
}

impl CalculateRequest {
    /// Resolves the archetype, pack groups and usage indices.
    ///
    /// # Errors
    ///
    /// * [`SizingError::Validation`] if no archetype id is given.
    /// * [`SizingError::NotFound`] if a pack names an unknown group.
    pub fn into_profile_request(self) -> Result<ProfileRequest, SizingError> {
        let archetype_id = [self.archetype_id, self.archetype]
            .into_iter()
            .flatten()
            .find(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                SizingError::Validation("archetype_id (or archetype) is required.".into())
            })?;

        let packs = match self.packs {
            None => PackInput::default(),
            Some(RawPacks::Keys(keys)) => PackInput::Legacy(keys),
            Some(RawPacks::Selections(raw)) => PackInput::Selections(
                raw.into_iter()
                    .map(RawSelection::into_selection)
                    .filter_map(Result::transpose)
                    .collect::<Result<_, _>>()?,
            ),
        };

        Ok(ProfileRequest {
            archetype_id: Some(archetype_id),
            expert_mode: self.expert_mode,
            packs,
            city: self.city,
            solar_wp: self.solar_wp,
        })
    }
}

impl RawSelection {
    /// Resolves the group and usage level; `None` for a selection with no key.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::NotFound`] if the group is unknown, even when
    /// the key is missing.
    pub fn into_selection(self) -> Result<Option<PackSelection>, SizingError> {
        let group: PackGroup = self.group.parse()?;
        if self.key.trim().is_empty() {
            debug!(%group, "dropping pack selection without a key");
            return Ok(None);
        }
        let usage_index = if self.usage_index.is_nan() {
            1
        } else {
            // Saturating float-to-int cast; clamped again by the selection.
            self.usage_index.trunc() as i64
        };
        Ok(Some(PackSelection::new(group, self.key, usage_index)))
    }
}

//! Matching computed requirements against the tier catalog.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::EnergyProfile;
use crate::catalog::{Catalog, Tier};

/// How requirements are derived and what to offer when nothing fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierPolicy {
    /// Tier offered when no tier satisfies the requirements.
    pub default_tier_id: String,
    /// Multiplier applied to peak load to size the inverter.
    pub inverter_safety_factor: f64,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            default_tier_id: "tier_2_comfort".to_string(),
            inverter_safety_factor: 1.2,
        }
    }
}

/// Minimum capacity and continuous inverter rating a tier must offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Requirements {
    pub capacity_wh: f64,
    pub inverter_w: f64,
}

impl Requirements {
    /// Capacity covers one typical day; the inverter covers the high peak
    /// (or the typical peak when the high slot is empty) plus the safety margin.
    pub fn for_profile(profile: &EnergyProfile, policy: &TierPolicy) -> Self {
        let peak = &profile.peak_power_band_w;
        let basis_w = if peak.max != 0 { peak.max } else { peak.typical };
        let inverter_w = if basis_w != 0 {
            basis_w as f64 * policy.inverter_safety_factor
        } else {
            0.0
        };
        Self {
            capacity_wh: profile.daily_kwh_band.typical * 1000.0,
            inverter_w,
        }
    }

    pub fn is_met_by(&self, tier: &Tier) -> bool {
        match (tier.capacity_wh_total, tier.inverter_w_continuous) {
            (Some(capacity), Some(inverter)) => {
                capacity >= self.capacity_wh && inverter >= self.inverter_w
            }
            _ => false,
        }
    }
}

/// Ranks the tiers that satisfy `profile`, smallest capacity first.
///
/// Never returns an empty list for a non-empty catalog: when nothing
/// qualifies, the policy's default tier is offered, or failing that the
/// largest tier in the catalog.
pub fn recommend_tiers(catalog: &Catalog, profile: &EnergyProfile, policy: &TierPolicy) -> Vec<Tier> {
    let required = Requirements::for_profile(profile, policy);

    let mut eligible: Vec<&Tier> = catalog
        .tiers()
        .iter()
        .filter(|tier| required.is_met_by(tier))
        .collect();
    eligible.sort_by(|a, b| capacity_of(a).total_cmp(&capacity_of(b)));

    if !eligible.is_empty() {
        return eligible.into_iter().cloned().collect();
    }

    debug!(
        capacity_wh = required.capacity_wh,
        inverter_w = required.inverter_w,
        "no tier satisfies requirements, falling back"
    );
    catalog
        .tier(&policy.default_tier_id)
        .or_else(|| largest_tier(catalog.tiers()))
        .cloned()
        .into_iter()
        .collect()
}

fn capacity_of(tier: &Tier) -> f64 {
    tier.capacity_wh_total.unwrap_or(0.0)
}

/// First tier with the greatest capacity; unrated capacity counts as zero.
fn largest_tier(tiers: &[Tier]) -> Option<&Tier> {
    tiers.iter().fold(None, |best: Option<&Tier>, tier| match best {
        Some(b) if capacity_of(b) >= capacity_of(tier) => Some(b),
        _ => Some(tier),
    })
}

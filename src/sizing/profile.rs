//! Composes load, solar and savings calculations into one [`EnergyProfile`].

use tracing::debug;

use super::load::compute_load_profile;
use super::savings::{SavingsParams, compute_savings_profile};
use super::solar::compute_solar_profile;
use super::types::{EnergyProfile, PackSelection};
use crate::catalog::Catalog;
use crate::error::SizingError;

/// The two historical ways of naming packs.
#[derive(Debug, Clone, PartialEq)]
pub enum PackInput {
    /// Plain keys; each is read as a single-phase AC pack at typical usage.
    Legacy(Vec<String>),
    Selections(Vec<PackSelection>),
}

impl Default for PackInput {
    fn default() -> Self {
        Self::Selections(Vec::new())
    }
}

impl PackInput {
    pub fn into_selections(self) -> Vec<PackSelection> {
        match self {
            Self::Legacy(keys) => keys.into_iter().map(PackSelection::typical_ac).collect(),
            Self::Selections(selections) => selections,
        }
    }
}

/// Everything needed to build a profile for one caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRequest {
    pub archetype_id: Option<String>,
    pub expert_mode: bool,
    pub packs: PackInput,
    pub city: Option<String>,
    /// Panel array size in watts-peak.
    pub solar_wp: Option<f64>,
}

/// Builds the composite profile for `request`.
///
/// Solar and savings are attached only when a city and a positive array size
/// are both given; savings use the typical daily consumption.
///
/// # Errors
///
/// Propagates [`SizingError`] from the load and solar steps, and reports
/// [`SizingError::Internal`] if any figure comes out non-finite.
pub fn calculate_energy_profile(
    catalog: &Catalog,
    request: ProfileRequest,
    savings_params: &SavingsParams,
) -> Result<EnergyProfile, SizingError> {
    let ProfileRequest {
        archetype_id,
        expert_mode,
        packs,
        city,
        solar_wp,
    } = request;
    let selections = packs.into_selections();

    let load = compute_load_profile(catalog, archetype_id.as_deref(), expert_mode, &selections)?;

    let solar_inputs = city
        .filter(|c| !c.is_empty())
        .zip(solar_wp.filter(|wp| *wp > 0.0));
    let (solar, savings) = match solar_inputs {
        Some((city, wp)) => {
            let solar = compute_solar_profile(catalog, &city, wp)?;
            let savings = compute_savings_profile(
                load.daily_kwh_band.typical,
                solar.avg_daily_kwh,
                savings_params,
            );
            (Some(solar), Some(savings))
        }
        None => (None, None),
    };

    let profile = EnergyProfile {
        archetype: archetype_id,
        expert_mode,
        daily_kwh_band: load.daily_kwh_band,
        peak_power_band_w: load.peak_power_band_w,
        selected_packs: selections.into_iter().map(|s| s.key).collect(),
        solar,
        savings,
    };

    if !profile.is_finite() {
        return Err(SizingError::Internal(
            "profile contains non-finite values".into(),
        ));
    }
    debug!(
        typical_kwh = profile.daily_kwh_band.typical,
        peak_max_w = profile.peak_power_band_w.max,
        "energy profile computed"
    );
    Ok(profile)
}

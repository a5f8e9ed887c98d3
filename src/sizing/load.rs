//! Aggregation of archetype baseline and appliance packs into load bands.

use tracing::debug;

use super::types::{LoadProfile, PackSelection};
use crate::band::{Band, UsageLevel};
use crate::catalog::{Archetype, Catalog, Pack};
use crate::error::SizingError;

/// Decimal places kept on the daily energy band.
pub const ENERGY_DECIMALS: i32 = 3;

/// Running totals while packs are folded in.
///
/// Energy slots are summed; peak slots keep the running maximum, since
/// appliances rarely hit their peak draw at the same moment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAccumulator {
    pub energy_kwh: Band<f64>,
    pub peak_w: Band<f64>,
}

impl LoadAccumulator {
    pub fn add_baseline(&mut self, archetype: &Archetype) {
        let load = archetype.base_load_kwh_day;
        self.energy_kwh.min += load.min;
        self.energy_kwh.typical += load.typical;
        self.energy_kwh.max += load.max;

        let peak = archetype.base_peak_w;
        self.peak_w.min = self.peak_w.min.max(peak.min);
        self.peak_w.typical = self.peak_w.typical.max(peak.typical);
        self.peak_w.max = self.peak_w.max.max(peak.max);
    }

    /// Counts `pack` at `usage` into the matching slot.
    ///
    /// A typical selection also widens the low and high slots by the pack's
    /// own extremes: actual usage may skew either way.
    pub fn add_pack(&mut self, pack: &Pack, usage: UsageLevel) {
        *self.energy_kwh.get_mut(usage) += pack.kwh_day.get(usage);
        let peak_slot = self.peak_w.get_mut(usage);
        *peak_slot = peak_slot.max(pack.peak_w.get(usage));

        if usage == UsageLevel::Typical {
            self.energy_kwh.min += pack.kwh_day.min;
            self.energy_kwh.max += pack.kwh_day.max;
            self.peak_w.min = self.peak_w.min.max(pack.peak_w.min);
            self.peak_w.max = self.peak_w.max.max(pack.peak_w.max);
        }
    }

    /// Normalizes both bands and rounds them for reporting.
    pub fn finish(self) -> LoadProfile {
        LoadProfile {
            daily_kwh_band: self.energy_kwh.normalized().rounded(ENERGY_DECIMALS),
            peak_power_band_w: self.peak_w.normalized().to_whole(),
        }
    }
}

/// Computes banded daily energy and peak power for a set of selections.
///
/// The archetype baseline is included only outside expert mode. Selections
/// whose key is not in the catalog are skipped without error.
///
/// # Errors
///
/// Returns [`SizingError::NotFound`] if the archetype is required and unknown.
pub fn compute_load_profile(
    catalog: &Catalog,
    archetype_id: Option<&str>,
    expert_mode: bool,
    selections: &[PackSelection],
) -> Result<LoadProfile, SizingError> {
    let mut acc = LoadAccumulator::default();

    if let Some(id) = archetype_id.filter(|id| !id.is_empty() && !expert_mode) {
        let archetype = catalog
            .archetype(id)
            .ok_or_else(|| SizingError::NotFound(format!("Archetype '{id}' not found.")))?;
        acc.add_baseline(archetype);
    }

    for selection in selections {
        let Some(pack) = catalog.pack(selection.group, &selection.key) else {
            debug!(
                group = %selection.group,
                key = %selection.key,
                "skipping unknown pack key"
            );
            continue;
        };
        acc.add_pack(pack, selection.usage);
    }

    Ok(acc.finish())
}

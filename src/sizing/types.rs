//! Request and result types for the sizing engine.

use std::fmt;

use serde::Serialize;

use crate::band::{Band, UsageLevel};
use crate::catalog::{PackGroup, Tier};

/// One pack chosen by the caller, in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct PackSelection {
    pub group: PackGroup,
    pub key: String,
    pub usage: UsageLevel,
}

impl PackSelection {
    /// Creates a selection, clamping `usage_index` into `0..=2`.
    pub fn new(group: PackGroup, key: impl Into<String>, usage_index: i64) -> Self {
        Self {
            group,
            key: key.into(),
            usage: UsageLevel::from_index(usage_index),
        }
    }

    /// A single-phase AC pack counted at typical usage.
    pub fn typical_ac(key: impl Into<String>) -> Self {
        Self {
            group: PackGroup::Ac1p,
            key: key.into(),
            usage: UsageLevel::Typical,
        }
    }
}

/// Output of the load aggregation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadProfile {
    /// kWh per day, rounded to 3 decimals.
    pub daily_kwh_band: Band<f64>,
    /// Watts, rounded to whole watts.
    pub peak_power_band_w: Band<i64>,
}

/// Estimated daily generation of a panel array in one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarProfile {
    pub city: String,
    /// Requested array size in watts-peak.
    pub wp: f64,
    pub kwp: f64,
    pub summer_daily_kwh: f64,
    pub winter_daily_kwh: f64,
    pub avg_daily_kwh: f64,
}

/// Financial and CO2 projection of self-consumed solar energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProfile {
    pub daily_offset_kwh: f64,
    pub year1_savings_tl: f64,
    pub multi_year_savings_tl: f64,
    pub yearly_co2_kg: f64,
    pub electricity_price_tl_per_kwh: f64,
    pub price_growth_rate: f64,
    pub horizon_years: u32,
    pub co2_kg_per_kwh: f64,
}

/// Composite result for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyProfile {
    pub archetype: Option<String>,
    pub expert_mode: bool,
    pub daily_kwh_band: Band<f64>,
    pub peak_power_band_w: Band<i64>,
    pub selected_packs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar: Option<SolarProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsProfile>,
}

impl EnergyProfile {
    /// `false` if any reported figure is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        let solar_ok = self.solar.as_ref().is_none_or(|s| {
            [s.kwp, s.summer_daily_kwh, s.winter_daily_kwh, s.avg_daily_kwh]
                .iter()
                .all(|v| v.is_finite())
        });
        let savings_ok = self.savings.as_ref().is_none_or(|s| {
            [
                s.daily_offset_kwh,
                s.year1_savings_tl,
                s.multi_year_savings_tl,
                s.yearly_co2_kg,
            ]
            .iter()
            .all(|v| v.is_finite())
        });
        self.daily_kwh_band.is_finite() && solar_ok && savings_ok
    }
}

impl fmt::Display for EnergyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Profile ---")?;
        writeln!(
            f,
            "Archetype:             {}{}",
            self.archetype.as_deref().unwrap_or("-"),
            if self.expert_mode { " (expert mode)" } else { "" }
        )?;
        writeln!(f, "Daily energy:          {} kWh", self.daily_kwh_band)?;
        writeln!(f, "Peak power:            {} W", self.peak_power_band_w)?;
        write!(f, "Selected packs:        ")?;
        if self.selected_packs.is_empty() {
            write!(f, "-")?;
        } else {
            write!(f, "{}", self.selected_packs.join(", "))?;
        }
        if let Some(solar) = &self.solar {
            writeln!(f)?;
            writeln!(f, "\n--- Solar ({}, {} Wp) ---", solar.city, solar.wp)?;
            writeln!(f, "Summer generation:     {:.3} kWh/day", solar.summer_daily_kwh)?;
            writeln!(f, "Winter generation:     {:.3} kWh/day", solar.winter_daily_kwh)?;
            write!(f, "Average generation:    {:.3} kWh/day", solar.avg_daily_kwh)?;
        }
        if let Some(savings) = &self.savings {
            writeln!(f)?;
            writeln!(f, "\n--- Savings ---")?;
            writeln!(f, "Daily offset:          {:.3} kWh", savings.daily_offset_kwh)?;
            writeln!(f, "Year 1 savings:        {:.2}", savings.year1_savings_tl)?;
            writeln!(
                f,
                "{}-year savings:        {:.2}",
                savings.horizon_years, savings.multi_year_savings_tl
            )?;
            write!(f, "Yearly CO2 offset:     {:.2} kg", savings.yearly_co2_kg)?;
        }
        Ok(())
    }
}

/// Profile plus the ranked tiers that satisfy it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    pub profile: EnergyProfile,
    pub recommendations: Vec<Tier>,
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.profile)?;
        writeln!(f, "\n--- Recommended Tiers ---")?;
        for (rank, tier) in self.recommendations.iter().enumerate() {
            let fmt_figure = |v: Option<f64>| v.map_or_else(|| "?".to_string(), |v| format!("{v}"));
            write!(
                f,
                "{}. {} ({}): {} Wh, {} W continuous",
                rank + 1,
                tier.id,
                tier.name().unwrap_or("-"),
                fmt_figure(tier.capacity_wh_total),
                fmt_figure(tier.inverter_w_continuous),
            )?;
            if rank + 1 < self.recommendations.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

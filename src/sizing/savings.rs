//! Financial and CO2 projection of the solar energy a site consumes itself.

use serde::{Deserialize, Serialize};

use super::types::SavingsProfile;
use crate::band::round_to;

const DAYS_PER_YEAR: f64 = 365.0;

/// Tariff and emission parameters for the savings projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SavingsParams {
    /// Grid electricity price in the first year (currency units per kWh).
    pub electricity_price_per_kwh: f64,
    /// Yearly price escalation (0.25 = +25 % per year).
    pub price_growth_rate: f64,
    /// Number of years summed in the multi-year figure.
    pub horizon_years: u32,
    /// Grid emission factor (kg CO2 per kWh).
    pub co2_kg_per_kwh: f64,
}

impl Default for SavingsParams {
    fn default() -> Self {
        Self {
            electricity_price_per_kwh: 3.1,
            price_growth_rate: 0.25,
            horizon_years: 5,
            co2_kg_per_kwh: 0.45,
        }
    }
}

/// Projects savings from the daily overlap of consumption and generation.
///
/// Only `min(consumption, generation)` is counted: surplus generation is
/// assumed not to offset anything.
pub fn compute_savings_profile(
    consumption_kwh: f64,
    solar_kwh: f64,
    params: &SavingsParams,
) -> SavingsProfile {
    let daily_offset_kwh = consumption_kwh.min(solar_kwh);
    let price = params.electricity_price_per_kwh;

    let year1 = daily_offset_kwh * price * DAYS_PER_YEAR;
    let multi_year: f64 = (0..params.horizon_years)
        .map(|year| {
            let escalated = price * (1.0 + params.price_growth_rate).powi(year as i32);
            daily_offset_kwh * escalated * DAYS_PER_YEAR
        })
        .sum();
    let yearly_co2 = daily_offset_kwh * params.co2_kg_per_kwh * DAYS_PER_YEAR;

    SavingsProfile {
        daily_offset_kwh: round_to(daily_offset_kwh, 3),
        year1_savings_tl: round_to(year1, 2),
        multi_year_savings_tl: round_to(multi_year, 2),
        yearly_co2_kg: round_to(yearly_co2, 2),
        electricity_price_tl_per_kwh: price,
        price_growth_rate: params.price_growth_rate,
        horizon_years: params.horizon_years,
        co2_kg_per_kwh: params.co2_kg_per_kwh,
    }
}

//! Daily solar generation from array size and city yield coefficients.

use super::types::SolarProfile;
use crate::band::round_to;
use crate::catalog::Catalog;
use crate::error::SizingError;

/// Share of the year weighted towards the summer coefficient.
pub const SUMMER_WEIGHT: f64 = 0.6;
pub const WINTER_WEIGHT: f64 = 0.4;

const DECIMALS: i32 = 3;

/// Estimates summer, winter and weighted average daily generation.
///
/// # Errors
///
/// * [`SizingError::Validation`] if `city` is empty or `wp` is negative or not finite.
/// * [`SizingError::NotFound`] if the city has no yield entry.
pub fn compute_solar_profile(catalog: &Catalog, city: &str, wp: f64) -> Result<SolarProfile, SizingError> {
    if city.is_empty() {
        return Err(SizingError::Validation(
            "City is required for solar calculation.".into(),
        ));
    }
    if !wp.is_finite() || wp < 0.0 {
        return Err(SizingError::Validation(
            "solar_wp must be a non-negative number.".into(),
        ));
    }
    let yield_ = catalog
        .solar_city(city)
        .ok_or_else(|| SizingError::NotFound(format!("City '{city}' not found in solar catalog.")))?;

    let kwp = wp / 1000.0;
    let summer = yield_.summer_kwh_per_kwp * kwp;
    let winter = yield_.winter_kwh_per_kwp * kwp;
    let average = SUMMER_WEIGHT * summer + WINTER_WEIGHT * winter;

    Ok(SolarProfile {
        city: city.to_string(),
        wp,
        kwp: round_to(kwp, DECIMALS),
        summer_daily_kwh: round_to(summer, DECIMALS),
        winter_daily_kwh: round_to(winter, DECIMALS),
        avg_daily_kwh: round_to(average, DECIMALS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SolarCityYield;

    fn catalog() -> Catalog {
        Catalog::new(
            [],
            [],
            [],
            [
                SolarCityYield::new("Istanbul", 5.2, 2.8),
                SolarCityYield::new("Nowhere", 0.0, 0.0),
            ],
        )
    }

    #[test]
    fn two_kilowatt_array_in_istanbul() {
        let solar = compute_solar_profile(&catalog(), "Istanbul", 2000.0).expect("solar");
        assert_eq!(solar.kwp, 2.0);
        assert_eq!(solar.summer_daily_kwh, 10.4);
        assert_eq!(solar.winter_daily_kwh, 5.6);
        assert_eq!(solar.avg_daily_kwh, 8.48);
        assert_eq!(solar.wp, 2000.0);
    }

    #[test]
    fn fractional_array_rounds_to_three_decimals() {
        let solar = compute_solar_profile(&catalog(), "Istanbul", 333.0).expect("solar");
        assert_eq!(solar.summer_daily_kwh, 1.732);
        assert_eq!(solar.winter_daily_kwh, 0.932);
    }

    #[test]
    fn zero_yield_city_generates_nothing() {
        let solar = compute_solar_profile(&catalog(), "Nowhere", 5000.0).expect("solar");
        assert_eq!(solar.avg_daily_kwh, 0.0);
    }

    #[test]
    fn empty_city_is_validation_error() {
        let err = compute_solar_profile(&catalog(), "", 2000.0).unwrap_err();
        assert!(matches!(err, SizingError::Validation(_)));
    }

    #[test]
    fn unknown_city_is_not_found() {
        let err = compute_solar_profile(&catalog(), "Atlantis", 2000.0).unwrap_err();
        assert_eq!(
            err,
            SizingError::NotFound("City 'Atlantis' not found in solar catalog.".into())
        );
    }

    #[test]
    fn city_lookup_is_exact() {
        assert!(compute_solar_profile(&catalog(), "istanbul", 2000.0).is_err());
    }

    #[test]
    fn rejects_non_finite_wattage() {
        let err = compute_solar_profile(&catalog(), "Istanbul", f64::NAN).unwrap_err();
        assert!(matches!(err, SizingError::Validation(_)));
    }
}

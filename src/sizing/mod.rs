//! Sizing engine: load aggregation, solar estimate, savings and tier ranking.
//!
//! Every calculation is a pure function of the immutable [`Catalog`] and the
//! caller's input, so a single [`Sizer`] can serve any number of callers
//! concurrently without locking.

pub mod load;
pub mod profile;
pub mod savings;
pub mod solar;
pub mod tiers;
pub mod types;

pub use profile::{PackInput, ProfileRequest};
pub use savings::SavingsParams;
pub use tiers::TierPolicy;
pub use types::{EnergyProfile, PackSelection, SavingsProfile, SizingReport, SolarProfile};

use crate::catalog::{Catalog, Tier};
use crate::config::AppConfig;
use crate::error::SizingError;

/// Catalog plus the tariff and recommendation settings, fixed at start-up.
#[derive(Debug, Clone, Default)]
pub struct Sizer {
    catalog: Catalog,
    savings: SavingsParams,
    policy: TierPolicy,
}

impl Sizer {
    /// A sizer with the default tariff and recommendation policy.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            savings: SavingsParams::default(),
            policy: TierPolicy::default(),
        }
    }

    /// A sizer using the `[savings]` and `[recommend]` sections of `config`.
    pub fn from_config(catalog: Catalog, config: &AppConfig) -> Self {
        Self {
            catalog,
            savings: config.savings.clone(),
            policy: config.recommend.clone(),
        }
    }

    pub fn with_savings(mut self, savings: SavingsParams) -> Self {
        self.savings = savings;
        self
    }

    pub fn with_policy(mut self, policy: TierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn savings_params(&self) -> &SavingsParams {
        &self.savings
    }

    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// See [`profile::calculate_energy_profile`].
    pub fn calculate_energy_profile(&self, request: ProfileRequest) -> Result<EnergyProfile, SizingError> {
        profile::calculate_energy_profile(&self.catalog, request, &self.savings)
    }

    /// See [`tiers::recommend_tiers`].
    pub fn recommend_tiers(&self, profile: &EnergyProfile) -> Vec<Tier> {
        tiers::recommend_tiers(&self.catalog, profile, &self.policy)
    }

    /// Builds the profile for `request` and ranks the tiers against it.
    pub fn size(&self, request: ProfileRequest) -> Result<SizingReport, SizingError> {
        let profile = self.calculate_energy_profile(request)?;
        let recommendations = self.recommend_tiers(&profile);
        Ok(SizingReport {
            profile,
            recommendations,
        })
    }
}

//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use station_sizer::catalog::Catalog;
use station_sizer::sizing::{PackInput, PackSelection, ProfileRequest, Sizer};

/// The catalog shipped in `datasets/`.
pub fn shipped_catalog() -> Catalog {
    Catalog::from_dir(&Path::new(env!("CARGO_MANIFEST_DIR")).join("datasets"))
        .expect("shipped catalog should load")
}

/// Sizer over the shipped catalog with default tariff and policy.
pub fn default_sizer() -> Sizer {
    Sizer::new(shipped_catalog())
}

/// Request for `archetype` with the given selections and no solar.
pub fn request(archetype: &str, selections: Vec<PackSelection>) -> ProfileRequest {
    ProfileRequest {
        archetype_id: Some(archetype.to_string()),
        packs: PackInput::Selections(selections),
        ..ProfileRequest::default()
    }
}

/// Tier ids in recommendation order.
pub fn tier_ids(tiers: &[station_sizer::catalog::Tier]) -> Vec<&str> {
    tiers.iter().map(|t| t.id.as_str()).collect()
}

//! Backup and off-grid power station sizing.
//!
//! Aggregates household load bands from a catalog of archetypes and appliance
//! packs, estimates solar yield and savings, and ranks station tiers.

/// REST API for serving catalog and sizing requests (requires `api` feature).
#[cfg(feature = "api")]
pub mod api;
pub mod band;
/// Read-only reference tables and their on-disk loader.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod request;
/// Load, solar, savings and tier calculations.
pub mod sizing;
pub mod telemetry;

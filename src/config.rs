//! TOML-based application configuration.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::sizing::{SavingsParams, TierPolicy};

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and falls back to the built-in defaults. Load
/// with [`AppConfig::from_toml_file`] or start from [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where the catalog tables live.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Tariff and emission factor for the savings projection.
    #[serde(default)]
    pub savings: SavingsParams,
    /// Tier recommendation policy.
    #[serde(default)]
    pub recommend: TierPolicy,
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Catalog location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory holding the catalog JSON files.
    pub dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("datasets"),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface address to bind.
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Resolves `bind` and `port` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind.parse().map_err(|_| ConfigError {
            field: "server.bind".into(),
            message: format!("\"{}\" is not an IP address", self.bind),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"savings.horizon_years"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl AppConfig {
    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.catalog.dir.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "catalog.dir".into(),
                message: "must not be empty".into(),
            });
        }

        let s = &self.savings;
        if !s.electricity_price_per_kwh.is_finite() || s.electricity_price_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "savings.electricity_price_per_kwh".into(),
                message: "must be a finite number >= 0".into(),
            });
        }
        if !s.price_growth_rate.is_finite() || s.price_growth_rate <= -1.0 {
            errors.push(ConfigError {
                field: "savings.price_growth_rate".into(),
                message: "must be a finite number > -1".into(),
            });
        }
        if s.horizon_years == 0 {
            errors.push(ConfigError {
                field: "savings.horizon_years".into(),
                message: "must be > 0".into(),
            });
        }
        if !s.co2_kg_per_kwh.is_finite() || s.co2_kg_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "savings.co2_kg_per_kwh".into(),
                message: "must be a finite number >= 0".into(),
            });
        }

        let r = &self.recommend;
        if r.default_tier_id.trim().is_empty() {
            errors.push(ConfigError {
                field: "recommend.default_tier_id".into(),
                message: "must not be empty".into(),
            });
        }
        if !r.inverter_safety_factor.is_finite() || r.inverter_safety_factor < 1.0 {
            errors.push(ConfigError {
                field: "recommend.inverter_safety_factor".into(),
                message: "must be a finite number >= 1.0".into(),
            });
        }

        if let Err(e) = self.server.socket_addr() {
            errors.push(e);
        }

        errors
    }
}

//! Marketplace service configuration.

use std::env;

use common::{AppResult, DatabaseConfig, JwtConfig};

/// Marketplace service configuration.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Phone number promoted to super-admin at startup when none exists yet
    pub super_admin_phone: Option<String>,
}

impl MarketplaceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env()?,
            super_admin_phone: env::var("SUPER_ADMIN_PHONE")
                .ok()
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
        })
    }
}

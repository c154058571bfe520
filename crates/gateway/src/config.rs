//! Gateway configuration.

use std::env;

use common::{AppResult, ServerConfig};
use marketplace_service_lib::config::MarketplaceConfig;

/// Gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub marketplace: MarketplaceConfig,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            marketplace: MarketplaceConfig::from_env()?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

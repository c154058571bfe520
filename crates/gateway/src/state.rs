//! Application state for dependency injection.

use std::sync::Arc;

use marketplace_service_lib::infra::Database;
use marketplace_service_lib::service::{ServiceContainer, Services};

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Absent when the state is built around stub services
    pub database: Option<Database>,
}

impl AppState {
    /// Wire the marketplace services on top of an open database.
    pub fn from_database(database: Database, config: &GatewayConfig) -> Self {
        let services = Services::from_connection(
            database.get_connection(),
            config.marketplace.jwt.clone(),
        );
        Self {
            services: Arc::new(services),
            database: Some(database),
        }
    }

    /// State around an arbitrary container, without a database.
    pub fn new(services: Arc<dyn ServiceContainer>) -> Self {
        Self {
            services,
            database: None,
        }
    }
}

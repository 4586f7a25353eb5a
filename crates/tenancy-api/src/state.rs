use std::sync::Arc;

use tenancy_core::repositories::StoreBackend;
use tenancy_core::services::Services;
use tenancy_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(backend: Arc<dyn StoreBackend>, config: AppConfig) -> Self {
        let services = Services::new(backend, &config.auth);
        Self {
            services: Arc::new(services),
            config,
        }
    }
}

pub mod catalog;
pub mod config;
pub mod models;
pub mod services;
pub mod cache;
pub mod seating;
pub mod checkout;

use std::sync::Arc;

// Shared state для всего приложения
pub struct AppState {
    pub api: services::ApiClient,
    pub cache: cache::SoldSeatCache,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let api = services::ApiClient::from_config(&config.api);
        let cache = cache::SoldSeatCache::new(&config.cache.dir)?;
        Ok(Arc::new(Self { api, cache, config }))
    }
}

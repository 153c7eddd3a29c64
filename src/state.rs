use std::sync::Arc;

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{AccountService, BoxService, SuggestionService};

/// Shared router state. Everything here is immutable or internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub store: Arc<dyn Store>,
    pub boxes: BoxService,
    pub suggestions: SuggestionService,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, JwtError> {
        let keys = Arc::new(JwtKeys::from_config(&config.security)?);
        Ok(Self {
            boxes: BoxService::new(store.clone()),
            suggestions: SuggestionService::new(store.clone()),
            accounts: AccountService::new(store.clone(), keys.clone()),
            config: Arc::new(config),
            keys,
            store,
        })
    }

    pub fn public_origin(&self) -> &str {
        &self.config.server.public_origin
    }
}

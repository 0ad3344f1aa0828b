use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend. Postgres in production, in-memory in tests.
    pub store: Arc<dyn Store>,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        AppState {
            store,
            tokens: TokenKeys::new(&config.jwt_secret, config.token_ttl_days),
        }
    }
}

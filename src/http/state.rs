//! Application state for the HTTP server.

use crate::db::repo_config::ShopSettings;
use crate::db::repository::FullRepository;
use std::sync::Arc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Shop tuning constants (slot step, default service minutes)
    pub shop: ShopSettings,
}

impl AppState {
    /// Create a new application state with the given repository and defaults.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            shop: ShopSettings::default(),
        }
    }

    /// Create a new application state with explicit shop settings.
    pub fn with_shop(repository: Arc<dyn FullRepository>, shop: ShopSettings) -> Self {
        Self { repository, shop }
    }
}

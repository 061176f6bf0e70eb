//! Application state for the server.

use std::sync::Arc;

use crate::config::Config;
use crate::storage::ArtifactStore;

/// Shared application state.
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Artifact directory and URL scheme.
    pub store: Arc<ArtifactStore>,
}

impl AppState {
    /// Create application state with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let store = ArtifactStore::new(
            config.storage.artifact_dir.clone(),
            config.storage.public_base_url.clone(),
        );
        Self {
            config,
            store: Arc::new(store),
        }
    }
}

use std::sync::Arc;

use catapult_llm::generation::ContentGenerator;
use catapult_llm::TextGenerator;
use catapult_store::{BlobStore, SharedStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Blob store holding templates, submissions and feedback.
    pub store: SharedStore,
    /// Raw model access (template prompt drafting).
    pub generator: Arc<dyn TextGenerator>,
    /// Per-template and combined content generation.
    pub content: ContentGenerator,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        store: SharedStore,
        generator: Arc<dyn TextGenerator>,
        config: ServerConfig,
    ) -> Self {
        Self {
            store,
            content: ContentGenerator::new(Arc::clone(&generator)),
            generator,
            config: Arc::new(config),
        }
    }

    /// Borrow the store as the trait object repositories expect.
    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }
}

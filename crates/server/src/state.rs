use std::sync::Arc;

use storefront_core::{Catalog, FilterExtractor, FilterSession, MessageGate, ProductFilterEngine};
use tokio::sync::Mutex;

/// Shared handler state. The server hosts a single demo conversation, so one
/// [`FilterSession`] sits behind a mutex.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub session: Arc<Mutex<FilterSession>>,
    pub extractor: FilterExtractor,
    pub engine: ProductFilterEngine,
}

impl AppState {
    pub fn new(catalog: Catalog, gate: MessageGate) -> Self {
        Self {
            catalog: Arc::new(catalog),
            session: Arc::new(Mutex::new(FilterSession::new(gate))),
            extractor: FilterExtractor::new(),
            engine: ProductFilterEngine::new(),
        }
    }
}

use std::sync::Arc;

use crate::analysis::dispatcher::Dispatcher;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup; concurrent requests share it without locking.
    pub dispatcher: Arc<Dispatcher>,
    pub config: Config,
}

//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::EventService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle for all Event reads and writes.
    pub event_service: Arc<EventService>,
}

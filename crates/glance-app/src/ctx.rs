use std::sync::Arc;

use glance_capture::CaptureBackend;
use glance_inference::InferenceClient;
use glance_types::AppEvent;
use kanal::AsyncSender;

use crate::state::AppState;

/// Bundles the shared dependencies the event handlers need.
pub struct EventContext {
    pub state: Arc<AppState>,
    pub event_tx: AsyncSender<AppEvent>,
    pub backend: Arc<dyn CaptureBackend>,
    pub client: Option<Arc<dyn InferenceClient>>,
}

impl EventContext {
    pub fn new(
        state: Arc<AppState>,
        event_tx: AsyncSender<AppEvent>,
        backend: Arc<dyn CaptureBackend>,
        client: Option<Arc<dyn InferenceClient>>,
    ) -> Self {
        Self {
            state,
            event_tx,
            backend,
            client,
        }
    }

    /// Clone the context for passing to spawned tasks. All members are
    /// reference-counted handles.
    pub fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            event_tx: self.event_tx.clone(),
            backend: self.backend.clone(),
            client: self.client.clone(),
        }
    }
}

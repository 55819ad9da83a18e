use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::{Arc, Mutex};

use glance_capture::CaptureSession;
use glance_config::Config;
use glance_types::{CommittedRegion, TranslationResult};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Single-flight guard: at most one inference request in flight.
    pub busy: AtomicBool,
    pub auto_running: AtomicBool,
    /// The one active capture session, if any.
    pub session: RwLock<Option<Arc<CaptureSession>>>,
    /// Monotonic generation counter; each new session gets the next value.
    pub session_seq: AtomicU64,
    pub crop_region: RwLock<Option<CommittedRegion>>,
    /// Only the latest result is retained.
    pub latest: RwLock<Option<TranslationResult>>,
    pub target_lang: RwLock<String>,
    /// Cancels the running auto-translate timer, if any.
    pub auto_cancel: Mutex<Option<CancellationToken>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let target_lang = config.ui.target_lang.clone();
        Self {
            config: Arc::new(RwLock::new(config)),
            busy: AtomicBool::new(false),
            auto_running: AtomicBool::new(false),
            session: RwLock::new(None),
            session_seq: AtomicU64::new(0),
            crop_region: RwLock::new(None),
            latest: RwLock::new(None),
            target_lang: RwLock::new(target_lang),
            auto_cancel: Mutex::new(None),
        }
    }
}

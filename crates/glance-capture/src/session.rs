use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::backend::{CaptureBackend, CaptureError, CaptureStream, RawFrame, SourceId};

/// The lifetime of one live capture stream, from acquisition to release.
///
/// At most one session is active per UI surface. The generation tag is
/// assigned by the owner and lets late inference results be matched against
/// the session they were issued under.
pub struct CaptureSession {
    id: Uuid,
    generation: u64,
    stream: Box<dyn CaptureStream>,
    active: AtomicBool,
}

impl CaptureSession {
    pub fn open(
        backend: &dyn CaptureBackend,
        source: Option<SourceId>,
        generation: u64,
    ) -> Result<Self, CaptureError> {
        let stream = backend.open(source)?;
        Ok(Self::from_stream(stream, generation))
    }

    pub fn from_stream(stream: Box<dyn CaptureStream>, generation: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation,
            stream,
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Marks the session stopped. Idempotent; the underlying handle is
    /// released when the session is dropped.
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::debug!(session = %self.id, "capture session stopped");
        }
    }

    pub fn intrinsic_size(&self) -> (u32, u32) {
        self.stream.intrinsic_size()
    }

    pub fn grab(&self) -> Result<RawFrame, CaptureError> {
        if !self.is_active() {
            return Err(CaptureError::SourceEnded);
        }
        self.stream.grab()
    }
}

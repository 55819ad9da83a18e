mod backend;
mod hotkey;
mod sampler;
mod session;

pub use backend::{
    CaptureBackend, CaptureError, CaptureStream, RawFrame, SourceId, SourceInfo, XcapBackend,
};
pub use hotkey::HotkeyManager;
pub use sampler::{ImagePayload, Sampled, sample};
pub use session::CaptureSession;

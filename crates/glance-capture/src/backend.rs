use xcap::{Monitor, Window};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture refused: {0}")]
    Denied(String),

    #[error("no capture source available")]
    NoSource,

    #[error("capture source ended")]
    SourceEnded,

    #[error("capture backend error: {0}")]
    Backend(String),

    #[error("frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceId {
    Monitor(u32),
    Window(u32),
}

#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub id: SourceId,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// One RGBA frame grabbed from a live source.
pub struct RawFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Platform capability for acquiring live display sources.
///
/// Injected so tests can substitute a fake; the production implementation is
/// [`XcapBackend`].
pub trait CaptureBackend: Send + Sync {
    /// Enumerate capturable sources (monitors and titled windows).
    fn sources(&self) -> Result<Vec<SourceInfo>, CaptureError>;

    /// Open a live stream over a source. `None` picks the primary monitor.
    fn open(&self, source: Option<SourceId>) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// An open, live display source.
pub trait CaptureStream: Send + Sync {
    /// Intrinsic pixel size of the source at open time.
    fn intrinsic_size(&self) -> (u32, u32);

    /// Grab the current frame. Fails with [`CaptureError::SourceEnded`] when
    /// the underlying source has gone away (window closed, monitor detached).
    fn grab(&self) -> Result<RawFrame, CaptureError>;
}

pub struct XcapBackend;

impl XcapBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XcapBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for XcapBackend {
    fn sources(&self) -> Result<Vec<SourceInfo>, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        let mut sources: Vec<SourceInfo> = monitors
            .iter()
            .map(|m| SourceInfo {
                id: SourceId::Monitor(m.id()),
                title: m.name().to_string(),
                width: m.width(),
                height: m.height(),
            })
            .collect();

        let windows = Window::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        sources.extend(
            windows
                .into_iter()
                .filter(|w| !w.title().is_empty() && !w.is_minimized())
                .map(|w| SourceInfo {
                    id: SourceId::Window(w.id()),
                    title: w.title().to_string(),
                    width: w.width(),
                    height: w.height(),
                }),
        );

        Ok(sources)
    }

    fn open(&self, source: Option<SourceId>) -> Result<Box<dyn CaptureStream>, CaptureError> {
        match source {
            None => {
                let monitors =
                    Monitor::all().map_err(|e| CaptureError::Denied(e.to_string()))?;
                let monitor = monitors.into_iter().next().ok_or(CaptureError::NoSource)?;
                Ok(Box::new(MonitorStream { monitor }))
            }
            Some(SourceId::Monitor(id)) => {
                let monitors =
                    Monitor::all().map_err(|e| CaptureError::Denied(e.to_string()))?;
                let monitor = monitors
                    .into_iter()
                    .find(|m| m.id() == id)
                    .ok_or(CaptureError::NoSource)?;
                Ok(Box::new(MonitorStream { monitor }))
            }
            Some(SourceId::Window(id)) => {
                let windows = Window::all().map_err(|e| CaptureError::Denied(e.to_string()))?;
                let window = windows
                    .into_iter()
                    .find(|w| w.id() == id)
                    .ok_or(CaptureError::NoSource)?;
                Ok(Box::new(WindowStream { window }))
            }
        }
    }
}

struct MonitorStream {
    monitor: Monitor,
}

impl CaptureStream for MonitorStream {
    fn intrinsic_size(&self) -> (u32, u32) {
        (self.monitor.width(), self.monitor.height())
    }

    fn grab(&self) -> Result<RawFrame, CaptureError> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|_| CaptureError::SourceEnded)?;
        Ok(RawFrame {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
        })
    }
}

struct WindowStream {
    window: Window,
}

impl CaptureStream for WindowStream {
    fn intrinsic_size(&self) -> (u32, u32) {
        (self.window.width(), self.window.height())
    }

    fn grab(&self) -> Result<RawFrame, CaptureError> {
        let image = self
            .window
            .capture_image()
            .map_err(|_| CaptureError::SourceEnded)?;
        Ok(RawFrame {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
        })
    }
}

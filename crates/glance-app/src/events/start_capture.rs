use std::sync::Arc;
use std::sync::atomic::Ordering;

use glance_capture::CaptureSession;
use glance_types::AppEvent;

use crate::ctx::EventContext;

pub async fn handle_start_capture(ctx: &EventContext) -> anyhow::Result<()> {
    // at most one active session per surface
    if ctx.state.session.read().await.is_some() {
        return Ok(());
    }

    let generation = ctx.state.session_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let backend = ctx.backend.clone();
    let opened =
        tokio::task::spawn_blocking(move || CaptureSession::open(backend.as_ref(), None, generation))
            .await?;

    let session = match opened {
        Ok(session) => Arc::new(session),
        Err(e) => {
            // refusal is recoverable, not fatal
            tracing::warn!("screen capture refused: {e}");
            let _ = ctx
                .event_tx
                .send(AppEvent::StatusUpdate {
                    status: format!("Could not start sharing: {e}"),
                    capturing: false,
                })
                .await;
            return Ok(());
        }
    };

    let (width, height) = session.intrinsic_size();
    tracing::info!(session = %session.id(), width, height, "capture session started");

    // a fresh session always starts with no crop region
    *ctx.state.crop_region.write().await = None;
    *ctx.state.session.write().await = Some(session.clone());

    let _ = ctx
        .event_tx
        .send(AppEvent::CaptureStarted { width, height })
        .await;

    // seed the preview with one frame
    let quality = { ctx.state.config.read().await.capture.jpeg_quality };
    let preview_session = session.clone();
    if let Ok(Ok(sampled)) =
        tokio::task::spawn_blocking(move || glance_capture::sample(&preview_session, None, quality))
            .await
    {
        let _ = ctx
            .event_tx
            .send(AppEvent::PreviewFrame(sampled.preview))
            .await;
    }

    Ok(())
}

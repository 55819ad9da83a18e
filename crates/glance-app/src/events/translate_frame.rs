use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::SystemTime;

use glance_capture::{CaptureError, CaptureSession};
use glance_inference::{InferenceClient, InlineImage};
use glance_types::{AppEvent, TranslationResult, language_name};

use crate::ctx::EventContext;

use super::stop_capture::handle_stop_capture;

/// The sample-then-request pipeline behind both the timer tick and the manual
/// trigger. A trigger arriving while a request is in flight is dropped, not
/// queued.
pub async fn handle_frame_translate(ctx: &EventContext, manual: bool) -> anyhow::Result<()> {
    // manual and automatic modes are mutually exclusive
    if manual && ctx.state.auto_running.load(Ordering::SeqCst) {
        return Ok(());
    }

    let session = match ctx.state.session.read().await.clone() {
        Some(session) if session.is_active() => session,
        _ => {
            if manual {
                let _ = ctx
                    .event_tx
                    .send(AppEvent::StatusUpdate {
                        status: "No active capture".to_string(),
                        capturing: false,
                    })
                    .await;
            }
            return Ok(());
        }
    };

    let Some(client) = ctx.client.clone() else {
        let _ = ctx
            .event_tx
            .send(AppEvent::StatusUpdate {
                status: "Set GEMINI_API_KEY to enable translation".to_string(),
                capturing: true,
            })
            .await;
        return Ok(());
    };

    if ctx
        .state
        .busy
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    let outcome = run_pipeline(ctx, &session, client).await;
    ctx.state.busy.store(false, Ordering::SeqCst);

    if let Err(e) = outcome {
        tracing::warn!("frame translation failed: {e}");
        let _ = ctx
            .event_tx
            .send(AppEvent::StatusUpdate {
                status: format!("Translation failed: {e}"),
                capturing: session.is_active(),
            })
            .await;
    }

    Ok(())
}

async fn run_pipeline(
    ctx: &EventContext,
    session: &Arc<CaptureSession>,
    client: Arc<dyn InferenceClient>,
) -> anyhow::Result<()> {
    let generation = session.generation();
    let region = *ctx.state.crop_region.read().await;
    let quality = { ctx.state.config.read().await.capture.jpeg_quality };

    let sample_session = session.clone();
    let sampled = tokio::task::spawn_blocking(move || {
        glance_capture::sample(&sample_session, region.as_ref(), quality)
    })
    .await?;

    let sampled = match sampled {
        Ok(sampled) => sampled,
        Err(CaptureError::SourceEnded) => {
            // the platform ended the stream under us
            handle_stop_capture(ctx, "Sharing ended").await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let _ = ctx
        .event_tx
        .send(AppEvent::PreviewFrame(sampled.preview))
        .await;

    let target = ctx.state.target_lang.read().await.clone();
    let image = InlineImage {
        mime_type: sampled.payload.mime_type.to_string(),
        data: sampled.payload.bytes,
    };
    let text = client
        .translate_screen_frame(&image, language_name(&target))
        .await;

    // A response for a session that was stopped or replaced while the request
    // was in flight must not overwrite current state.
    let fresh = ctx
        .state
        .session
        .read()
        .await
        .as_ref()
        .map(|current| current.generation() == generation && current.is_active())
        .unwrap_or(false);
    if !fresh {
        tracing::debug!(generation, "discarding stale translation result");
        return Ok(());
    }

    let result = TranslationResult {
        text,
        produced_at: SystemTime::now(),
    };
    *ctx.state.latest.write().await = Some(result.clone());
    let _ = ctx.event_tx.send(AppEvent::ShowTranslation(result)).await;

    Ok(())
}

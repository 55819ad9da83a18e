use std::sync::Arc;

use glance_capture::CaptureBackend;
use glance_inference::InferenceClient;
use glance_types::AppEvent;
use kanal::{AsyncReceiver, AsyncSender};

use crate::ctx::EventContext;
use crate::state::AppState;

pub mod analyze_image;
pub mod auto_loop;
pub mod edit_image;
pub mod start_capture;
pub mod stop_capture;
pub mod translate_frame;
pub mod translate_text;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    backend: Arc<dyn CaptureBackend>,
    client: Option<Arc<dyn InferenceClient>>,
) -> anyhow::Result<()> {
    let ctx = EventContext::new(state, app_to_ui_tx, backend, client);

    tracing::info!("event loop started, waiting for events");
    loop {
        let event = ui_to_app_rx.recv().await?;
        handle_events(&ctx, event).await?;
    }
}

async fn handle_events(ctx: &EventContext, event: AppEvent) -> anyhow::Result<()> {
    match event {
        AppEvent::ConfigChanged => {}
        AppEvent::StartCapture => {
            start_capture::handle_start_capture(ctx).await?;
        }
        AppEvent::StopCapture => {
            stop_capture::handle_stop_capture(ctx, "Sharing stopped").await?;
        }
        AppEvent::ToggleAuto => {
            auto_loop::handle_toggle_auto(ctx).await?;
        }
        AppEvent::ManualTranslate => {
            translate_frame::handle_frame_translate(ctx, true).await?;
        }
        AppEvent::SetTargetLanguage(code) => {
            *ctx.state.target_lang.write().await = code;
        }
        AppEvent::RegionUpdate { region } => {
            *ctx.state.crop_region.write().await = region;
        }
        AppEvent::TranslateText {
            text,
            source,
            target,
        } => {
            translate_text::handle_text_translate(ctx, text, source, target).await?;
        }
        AppEvent::EditImage { path, instruction } => {
            edit_image::handle_image_edit(ctx, path, instruction).await?;
        }
        AppEvent::AnalyzeImage { path, question } => {
            analyze_image::handle_image_analysis(ctx, path, question).await?;
        }
        AppEvent::CopyText(text) => {
            if let Err(e) = glance_io::clipboard::copy_text(&text) {
                tracing::warn!("clipboard copy failed: {e}");
            }
        }
        // UI-only events, ignored in the backend
        AppEvent::CaptureStarted { .. }
        | AppEvent::StatusUpdate { .. }
        | AppEvent::AutoState { .. }
        | AppEvent::ShowTranslation(_)
        | AppEvent::PreviewFrame(_)
        | AppEvent::ShowTextTranslation { .. }
        | AppEvent::ShowEditedImage { .. }
        | AppEvent::ShowAnalysis { .. }
        | AppEvent::BackendReady => {}
    }

    Ok(())
}

use std::path::PathBuf;

use glance_inference::{InlineImage, mime};
use glance_types::AppEvent;

use crate::ctx::EventContext;

pub async fn handle_image_analysis(
    ctx: &EventContext,
    path: PathBuf,
    question: Option<String>,
) -> anyhow::Result<()> {
    let Some(client) = ctx.client.clone() else {
        let _ = ctx
            .event_tx
            .send(AppEvent::ShowAnalysis {
                text: "Set GEMINI_API_KEY to enable image analysis".to_string(),
            })
            .await;
        return Ok(());
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = ctx
                .event_tx
                .send(AppEvent::ShowAnalysis {
                    text: format!("Could not read {}: {e}", path.display()),
                })
                .await;
            return Ok(());
        }
    };

    let image = InlineImage {
        mime_type: mime::sniff(&bytes).to_string(),
        data: bytes,
    };

    let text = match client.analyze_image(&image, question.as_deref()).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!("image analysis failed: {e}");
            format!("Analysis failed: {e}")
        }
    };

    let _ = ctx.event_tx.send(AppEvent::ShowAnalysis { text }).await;

    Ok(())
}

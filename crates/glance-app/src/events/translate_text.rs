use glance_core::preprocess::{DefaultPreprocessor, Preprocessor};
use glance_types::{AppEvent, language_name};

use crate::ctx::EventContext;

pub async fn handle_text_translate(
    ctx: &EventContext,
    text: String,
    source: String,
    target: String,
) -> anyhow::Result<()> {
    let text = DefaultPreprocessor.process(&text);
    if text.is_empty() {
        return Ok(());
    }

    let Some(client) = ctx.client.clone() else {
        let _ = ctx
            .event_tx
            .send(AppEvent::ShowTextTranslation {
                text: "Set GEMINI_API_KEY to enable translation".to_string(),
            })
            .await;
        return Ok(());
    };

    let source_name = language_name(&source);
    let target_name = language_name(&target);

    match client.translate_text(&text, source_name, target_name).await {
        Ok(translated) => {
            let _ = ctx
                .event_tx
                .send(AppEvent::ShowTextTranslation { text: translated })
                .await;
        }
        Err(e) => {
            tracing::warn!("text translation failed: {e}");
            let _ = ctx
                .event_tx
                .send(AppEvent::ShowTextTranslation {
                    text: "An error occurred while translating. Please try again.".to_string(),
                })
                .await;
        }
    }

    Ok(())
}

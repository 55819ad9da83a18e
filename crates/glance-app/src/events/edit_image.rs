use std::path::{Path, PathBuf};

use glance_inference::{InferenceError, InlineImage, mime};
use glance_types::AppEvent;

use crate::ctx::EventContext;

pub async fn handle_image_edit(
    ctx: &EventContext,
    path: PathBuf,
    instruction: String,
) -> anyhow::Result<()> {
    let capturing = ctx.state.session.read().await.is_some();

    let Some(client) = ctx.client.clone() else {
        let _ = ctx
            .event_tx
            .send(AppEvent::StatusUpdate {
                status: "Set GEMINI_API_KEY to enable image editing".to_string(),
                capturing,
            })
            .await;
        return Ok(());
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = ctx
                .event_tx
                .send(AppEvent::StatusUpdate {
                    status: format!("Could not read {}: {e}", path.display()),
                    capturing,
                })
                .await;
            return Ok(());
        }
    };

    let image = InlineImage {
        mime_type: mime::sniff(&bytes).to_string(),
        data: bytes,
    };

    match client.edit_image(&image, &instruction).await {
        Ok(edited) => {
            let out_path = edited_output_path(&path, &edited.mime_type);
            tokio::fs::write(&out_path, &edited.data).await?;
            let _ = ctx
                .event_tx
                .send(AppEvent::ShowEditedImage { path: out_path })
                .await;
        }
        Err(InferenceError::MissingImagePart) => {
            let _ = ctx
                .event_tx
                .send(AppEvent::StatusUpdate {
                    status: "The service returned no image for this edit".to_string(),
                    capturing,
                })
                .await;
        }
        Err(e) => {
            tracing::warn!("image edit failed: {e}");
            let _ = ctx
                .event_tx
                .send(AppEvent::StatusUpdate {
                    status: format!("Image edit failed: {e}"),
                    capturing,
                })
                .await;
        }
    }

    Ok(())
}

fn edited_output_path(input: &Path, mime_type: &str) -> PathBuf {
    let ext = match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    };
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    input.with_file_name(format!("{stem}-edited.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_keeps_directory_and_adds_suffix() {
        let out = edited_output_path(Path::new("/tmp/photos/cat.jpeg"), "image/png");
        assert_eq!(out, PathBuf::from("/tmp/photos/cat-edited.png"));
    }

    #[test]
    fn output_extension_follows_returned_mime() {
        let out = edited_output_path(Path::new("shot.png"), "image/jpeg");
        assert_eq!(out, PathBuf::from("shot-edited.jpg"));
    }
}

use std::sync::Arc;
use std::time::Duration;

use glance_capture::HotkeyManager;
use glance_types::AppEvent;
use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Polls the global manual-translate hotkey and forwards presses as events.
pub async fn watcher_io(
    state: Arc<AppState>,
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let hotkey_enabled = {
        let config = state.config.read().await;
        config.capture.hotkey_enabled
    };

    if !hotkey_enabled {
        cancel.cancelled().await;
        return Ok(());
    }

    tokio::task::spawn_blocking(move || {
        let manager = match HotkeyManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                tracing::warn!("manual-translate hotkey unavailable: {e}");
                return;
            }
        };

        tracing::info!("manual-translate hotkey registered (Ctrl+Shift+G)");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            if manager.poll() {
                tracing::debug!("manual-translate hotkey pressed");
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tx.send(AppEvent::ManualTranslate).await {
                        tracing::error!("failed to forward hotkey event: {e}");
                    }
                });
            }

            // avoid a busy loop
            std::thread::sleep(Duration::from_millis(50));
        }

        tracing::info!("hotkey listener stopping");
    })
    .await?;

    Ok(())
}

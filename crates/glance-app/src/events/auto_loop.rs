use std::sync::atomic::Ordering;
use std::time::Duration;

use glance_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::ctx::EventContext;

use super::translate_frame::handle_frame_translate;

pub async fn handle_toggle_auto(ctx: &EventContext) -> anyhow::Result<()> {
    if ctx.state.auto_running.load(Ordering::SeqCst) {
        ctx.state.auto_running.store(false, Ordering::SeqCst);
        if let Some(cancel) = ctx.state.auto_cancel.lock().unwrap().take() {
            cancel.cancel();
        }
        let _ = ctx
            .event_tx
            .send(AppEvent::AutoState { running: false })
            .await;
        return Ok(());
    }

    if ctx.state.session.read().await.is_none() {
        let _ = ctx
            .event_tx
            .send(AppEvent::StatusUpdate {
                status: "Start sharing before auto-translate".to_string(),
                capturing: false,
            })
            .await;
        return Ok(());
    }

    start_auto_loop(ctx);
    let _ = ctx
        .event_tx
        .send(AppEvent::AutoState { running: true })
        .await;

    Ok(())
}

/// Spawns the fixed-period timer task. Ticks that land while a request is in
/// flight are dropped by the pipeline's busy guard.
pub fn start_auto_loop(ctx: &EventContext) {
    let state = &ctx.state;

    // don't start a second timer if one is already running
    if state.auto_running.swap(true, Ordering::SeqCst) {
        return;
    }

    let cancel = CancellationToken::new();
    *state.auto_cancel.lock().unwrap() = Some(cancel.clone());

    let ctx = ctx.clone();

    tokio::spawn(async move {
        loop {
            let interval_ms = { ctx.state.config.read().await.capture.auto_interval_ms };

            if !ctx.state.auto_running.load(Ordering::SeqCst) {
                break;
            }
            if ctx.state.session.read().await.is_none() {
                ctx.state.auto_running.store(false, Ordering::SeqCst);
                let _ = ctx
                    .event_tx
                    .send(AppEvent::AutoState { running: false })
                    .await;
                break;
            }

            let _ = handle_frame_translate(&ctx, false).await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_millis(interval_ms)) => {}
            }
        }
        tracing::debug!("auto-translate timer stopped");
    });
}

use std::sync::atomic::Ordering;

use glance_types::AppEvent;

use crate::ctx::EventContext;

/// Tears the capture session down: leaves auto mode, cancels its timer and
/// releases the stream. Safe to call when nothing is running.
pub async fn handle_stop_capture(ctx: &EventContext, status: &str) -> anyhow::Result<()> {
    // leave auto mode first so no tick lands on a dead session
    ctx.state.auto_running.store(false, Ordering::SeqCst);
    if let Some(cancel) = ctx.state.auto_cancel.lock().unwrap().take() {
        cancel.cancel();
    }

    if let Some(session) = ctx.state.session.write().await.take() {
        session.stop();
    }

    let _ = ctx
        .event_tx
        .send(AppEvent::AutoState { running: false })
        .await;
    let _ = ctx
        .event_tx
        .send(AppEvent::StatusUpdate {
            status: status.to_string(),
            capturing: false,
        })
        .await;

    Ok(())
}

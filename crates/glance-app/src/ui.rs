use std::sync::Arc;

use glance_config::Config;
use glance_types::AppEvent;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::RwLock;

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    glance_ui::ui_loop(app_to_ui_rx, ui_to_app_tx, config).await
}

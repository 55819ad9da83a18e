use std::sync::Arc;

use clap::Parser;
use glance_capture::{CaptureBackend, XcapBackend};
use glance_config::Config;
use glance_inference::gemini::ModelSet;
use glance_inference::{GeminiClient, InferenceClient};

mod controller;
mod ctx;
mod events;
mod io;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(
    name = "glance",
    about = "Screen, text and image translator backed by a hosted multimodal model"
)]
struct Args {
    /// Auto-translate period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Default target language code (e.g. "vi", "ja")
    #[arg(long)]
    target_lang: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let mut config = Config::new();
    if let Some(interval) = args.interval_ms {
        config.capture.auto_interval_ms = interval;
    }
    if let Some(lang) = args.target_lang {
        config.ui.target_lang = lang;
    }

    let client: Option<Arc<dyn InferenceClient>> =
        if config.inference.enabled && !config.inference.api_key.is_empty() {
            let models = ModelSet {
                text: config.inference.text_model.clone(),
                image_edit: config.inference.image_model.clone(),
                analysis: config.inference.analysis_model.clone(),
                frame: config.inference.frame_model.clone(),
            };
            Some(Arc::new(
                GeminiClient::new(
                    config.inference.api_key.clone(),
                    config.inference.api_url.clone(),
                )
                .with_models(models),
            ))
        } else {
            tracing::warn!("GEMINI_API_KEY not set, inference disabled");
            None
        };

    let backend: Arc<dyn CaptureBackend> = Arc::new(XcapBackend::new());
    let state = Arc::new(AppState::new(config));

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(backend, client);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::warn!("task exited"),
                Some(Ok(Err(e))) => tracing::error!("task failed: {e}"),
                Some(Err(e)) => tracing::error!("task panicked: {e}"),
                None => {}
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if atty::is(atty::Stream::Stdout) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    }
}

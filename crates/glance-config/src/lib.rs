use std::env;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::inference::InferenceConfig;
use self::ui::UiConfig;

pub mod capture;
pub mod inference;
pub mod ui;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub inference: InferenceConfig,
    pub capture: CaptureConfig,
    pub ui: UiConfig,
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();

        if let Ok(key) = env::var("GEMINI_API_KEY") {
            config.inference.api_key = key;
        }

        if let Some(interval) = env::var("GLANCE_AUTO_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.capture.auto_interval_ms = interval;
        }

        if let Ok(lang) = env::var("GLANCE_TARGET_LANG") {
            config.ui.target_lang = lang;
        }

        config
    }
}

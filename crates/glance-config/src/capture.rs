use serde::{Deserialize, Serialize};

fn default_auto_interval_ms() -> u64 {
    3000
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_min_region() -> f32 {
    10.0
}

fn default_hotkey_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Period of the auto-translate timer.
    #[serde(default = "default_auto_interval_ms")]
    pub auto_interval_ms: u64,
    /// Quality factor for the lossy frame encoding.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Selections narrower or shorter than this are discarded, not committed.
    #[serde(default = "default_min_region")]
    pub min_region: f32,
    /// Global hotkey firing one manual translation.
    #[serde(default = "default_hotkey_enabled")]
    pub hotkey_enabled: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            auto_interval_ms: default_auto_interval_ms(),
            jpeg_quality: default_jpeg_quality(),
            min_region: default_min_region(),
            hotkey_enabled: default_hotkey_enabled(),
        }
    }
}

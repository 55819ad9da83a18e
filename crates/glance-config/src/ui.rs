use serde::{Deserialize, Serialize};

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "vi".to_string()
}

fn default_detached_width() -> u32 {
    420
}

fn default_detached_height() -> u32 {
    320
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Preferred size of the detached result window.
    #[serde(default = "default_detached_width")]
    pub detached_width: u32,
    #[serde(default = "default_detached_height")]
    pub detached_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            detached_width: default_detached_width(),
            detached_height: default_detached_height(),
        }
    }
}

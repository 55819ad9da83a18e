use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_analysis_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_frame_model() -> String {
    "gemini-3-flash-preview".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct InferenceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Model for plain text translation.
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model for image editing (returns an image part).
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Model for image analysis.
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,
    /// Model for the screen-frame translation loop.
    #[serde(default = "default_frame_model")]
    pub frame_model: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: String::new(),
            api_url: default_api_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            analysis_model: default_analysis_model(),
            frame_model: default_frame_model(),
        }
    }
}

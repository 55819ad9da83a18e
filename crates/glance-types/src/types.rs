use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigChanged,
    StartCapture,
    StopCapture,
    ToggleAuto,
    ManualTranslate,
    SetTargetLanguage(String),
    RegionUpdate {
        region: Option<CommittedRegion>,
    },
    CaptureStarted {
        width: u32,
        height: u32,
    },
    StatusUpdate {
        status: String,
        capturing: bool,
    },
    AutoState {
        running: bool,
    },
    ShowTranslation(TranslationResult),
    PreviewFrame(FramePreview),
    TranslateText {
        text: String,
        source: String,
        target: String,
    },
    ShowTextTranslation {
        text: String,
    },
    EditImage {
        path: PathBuf,
        instruction: String,
    },
    ShowEditedImage {
        path: PathBuf,
    },
    AnalyzeImage {
        path: PathBuf,
        question: Option<String>,
    },
    ShowAnalysis {
        text: String,
    },
    CopyText(String),
    BackendReady,
}

/// Rectangular sub-area of the capture preview, in preview pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A committed crop region paired with the preview size it was selected at.
///
/// The preview size is what the region coordinates are relative to; the frame
/// sampler needs both to map into intrinsic source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommittedRegion {
    pub region: CropRegion,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

#[derive(Debug, Clone)]
pub struct TranslationResult {
    pub text: String,
    pub produced_at: SystemTime,
}

#[derive(Debug, Clone)]
pub struct FramePreview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

/// Fixed language catalog, immutable for the process lifetime.
pub const SUPPORTED_LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "vi", name: "Vietnamese" },
    LanguageOption { code: "en", name: "English" },
    LanguageOption { code: "ja", name: "Japanese" },
    LanguageOption { code: "ko", name: "Korean" },
    LanguageOption { code: "zh", name: "Chinese" },
    LanguageOption { code: "fr", name: "French" },
    LanguageOption { code: "es", name: "Spanish" },
    LanguageOption { code: "de", name: "German" },
];

/// Display name for a language code, falling back to the code itself.
pub fn language_name(code: &str) -> &str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name)
        .unwrap_or(code)
}

pub mod gemini;
pub mod mime;

pub use gemini::GeminiClient;

/// Exact reply the service is instructed to give for a frame with no text.
pub const NO_TEXT_SENTINEL: &str = "No text found";

/// Shown when text translation comes back empty.
pub const TEXT_FALLBACK: &str = "Unable to translate this content.";

/// Shown when image analysis comes back empty.
pub const ANALYSIS_FALLBACK: &str = "Unable to analyze this image.";

/// Returned by the frame-translation call on transport or service failure,
/// so the polling loop keeps running instead of surfacing an error.
pub const FRAME_ERROR_FALLBACK: &str =
    "Screen translation failed (rate limit or network error).";

/// An image inlined into a request or located in a response.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("missing API key")]
    MissingApiKey,

    #[error("no image part in response")]
    MissingImagePart,

    #[error("malformed image data in response: {0}")]
    MalformedImage(String),
}

/// The four request/response operations delegated to the hosted model.
///
/// One network round trip each, no retries, no streaming.
#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync {
    /// Translate plain text between two named languages. Empty payloads map
    /// to [`TEXT_FALLBACK`] rather than an error.
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, InferenceError>;

    /// Apply an edit instruction to an image. Fails with
    /// [`InferenceError::MissingImagePart`] when the response carries no
    /// image; callers must not assume one is always returned.
    async fn edit_image(
        &self,
        image: &InlineImage,
        instruction: &str,
    ) -> Result<InlineImage, InferenceError>;

    /// Ask a question about an image. A missing question falls back to a
    /// generic description instruction.
    async fn analyze_image(
        &self,
        image: &InlineImage,
        question: Option<&str>,
    ) -> Result<String, InferenceError>;

    /// Translate on-screen text in a captured frame. Best-effort: transport
    /// and service failures come back as [`FRAME_ERROR_FALLBACK`], never as
    /// an error, because this sits inside the polling loop.
    async fn translate_screen_frame(&self, image: &InlineImage, target_lang: &str) -> String;
}

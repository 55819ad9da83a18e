use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::{
    ANALYSIS_FALLBACK, FRAME_ERROR_FALLBACK, InferenceError, InlineImage, NO_TEXT_SENTINEL,
    TEXT_FALLBACK,
};

const DEFAULT_ANALYSIS_QUESTION: &str = "Describe in detail what you see in this image.";

/// Model identifiers, one per operation.
#[derive(Debug, Clone)]
pub struct ModelSet {
    pub text: String,
    pub image_edit: String,
    pub analysis: String,
    pub frame: String,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self {
            text: "gemini-3-flash-preview".to_string(),
            image_edit: "gemini-2.5-flash-image".to_string(),
            analysis: "gemini-3-pro-preview".to_string(),
            frame: "gemini-3-flash-preview".to_string(),
        }
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    models: ModelSet,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            models: ModelSet::default(),
        }
    }

    pub fn with_models(mut self, models: ModelSet) -> Self {
        self.models = models;
        self
    }

    async fn generate(
        &self,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<GenerateResponse, InferenceError> {
        if self.api_key.is_empty() {
            return Err(InferenceError::MissingApiKey);
        }

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    fn translate_text_prompt(source_lang: &str, target_lang: &str, text: &str) -> String {
        format!(
            "You are a professional translator. Translate the following text strictly \
             from {source_lang} to {target_lang}. Do not add any explanations, just \
             provide the translation.\n\nText:\n{text}"
        )
    }

    fn frame_prompt(target_lang: &str) -> String {
        format!(
            "Analyze this screen capture. Identify any text present in the image and \
             translate it directly into {target_lang}.\n\n\
             Rules:\n\
             1. If no text is found, reply exactly \"{NO_TEXT_SENTINEL}\".\n\
             2. Format the output nicely using Markdown.\n\
             3. Be concise and focus on the translation."
        )
    }

    async fn translate_screen_frame_inner(
        &self,
        image: &InlineImage,
        target_lang: &str,
    ) -> Result<String, InferenceError> {
        let response = self
            .generate(
                &self.models.frame,
                vec![
                    Part::inline(image),
                    Part::text(Self::frame_prompt(target_lang)),
                ],
            )
            .await?;

        // An empty payload passes through as-is; the sentinel rule is the
        // service's obligation, not ours to synthesize.
        Ok(response.text().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl crate::InferenceClient for GeminiClient {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, InferenceError> {
        let prompt = Self::translate_text_prompt(source_lang, target_lang, text);
        let response = self.generate(&self.models.text, vec![Part::text(prompt)]).await?;

        match response.text() {
            Some(translated) => Ok(translated),
            None => Ok(TEXT_FALLBACK.to_string()),
        }
    }

    async fn edit_image(
        &self,
        image: &InlineImage,
        instruction: &str,
    ) -> Result<InlineImage, InferenceError> {
        let response = self
            .generate(
                &self.models.image_edit,
                vec![Part::inline(image), Part::text(instruction.to_string())],
            )
            .await?;

        let part = response.image().ok_or(InferenceError::MissingImagePart)?;
        let data = BASE64
            .decode(part.data.as_bytes())
            .map_err(|e| InferenceError::MalformedImage(e.to_string()))?;

        Ok(InlineImage {
            mime_type: if part.mime_type.is_empty() {
                "image/png".to_string()
            } else {
                part.mime_type.clone()
            },
            data,
        })
    }

    async fn analyze_image(
        &self,
        image: &InlineImage,
        question: Option<&str>,
    ) -> Result<String, InferenceError> {
        let question = match question {
            Some(q) if !q.trim().is_empty() => q.to_string(),
            _ => DEFAULT_ANALYSIS_QUESTION.to_string(),
        };

        let response = self
            .generate(
                &self.models.analysis,
                vec![Part::inline(image), Part::text(question)],
            )
            .await?;

        match response.text() {
            Some(analysis) => Ok(analysis),
            None => Ok(ANALYSIS_FALLBACK.to_string()),
        }
    }

    async fn translate_screen_frame(&self, image: &InlineImage, target_lang: &str) -> String {
        match self.translate_screen_frame_inner(image, target_lang).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("screen frame translation failed: {e}");
                FRAME_ERROR_FALLBACK.to_string()
            }
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        rename = "inline_data",
        alias = "inlineData",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline(image: &InlineImage) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: BASE64.encode(&image.data),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
struct InlineData {
    #[serde(rename = "mime_type", alias = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, None when empty.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// First inline image part of the first candidate.
    fn image(&self) -> Option<&InlineData> {
        let content = self.candidates.first()?.content.as_ref()?;
        content.parts.iter().find_map(|p| p.inline_data.as_ref())
    }
}

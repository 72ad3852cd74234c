use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::common::entities::app_errors::CoreError;
use crate::domain::common::LlmConfig;
use crate::domain::profile::entities::SkinProfile;
use crate::domain::recommendation::ports::LlmClient;
use crate::domain::recommendation::value_objects::{AnalysisHints, ImagePayload};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Keeps replies below the per-request quota of small OpenRouter plans.
const MAX_COMPLETION_TOKENS: u32 = 512;

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_key: String,
    model_name: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model_name: String) -> Self {
        Self {
            api_key,
            model_name,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.api_key.clone(), config.model.clone())
    }

    async fn call_chat_api(&self, messages: Vec<Message>) -> Result<String, CoreError> {
        let request = ChatRequest {
            model: &self.model_name,
            messages,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenRouter request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenRouter response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

impl LlmClient for OpenRouterClient {
    async fn generate_ingredient_advice(&self, profile: SkinProfile) -> Result<String, CoreError> {
        let prompt = format!(
            "Suggest 5 to 10 skincare ingredients as a raw JSON array (no markdown, no code \
             block, no explanation). Only return: [\"ingredient1\", \"ingredient2\", ...]. This \
             is for skin type: {}, concerns: {}.",
            profile.skin_type,
            profile.concerns.join(", ")
        );

        self.call_chat_api(vec![Message {
            role: "user",
            content: MessageContent::Text(prompt),
        }])
        .await
    }

    async fn analyze_image(
        &self,
        image: ImagePayload,
        hints: AnalysisHints,
    ) -> Result<String, CoreError> {
        let mut prompt = format!(
            "Analyze this face photo for skincare planning. Return a raw JSON object (no \
             markdown) with keys: suggestedSkinType (string), detectedConcerns (string array), \
             observations (string array), confidence (0 to 1), concernScores (object with acne, \
             pigmentation, redness, texture, dehydration, oiliness, each 0 to 100, higher is \
             worse) and overallSkinScore (0 to 100, higher is healthier). The user reports skin \
             type: {}, concerns: {}.",
            hints.skin_type,
            hints.concerns.join(", ")
        );
        if let Some(notes) = &hints.photo_notes {
            prompt.push_str(&format!(" Photo notes: {}.", notes));
        }

        let encoded = general_purpose::STANDARD.encode(&image.data);
        let data_url = format!("data:{};base64,{}", image.mime_type, encoded);

        self.call_chat_api(vec![Message {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: prompt },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ]),
        }])
        .await
    }
}

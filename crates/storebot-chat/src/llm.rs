//! Optional text generation for friendlier fallback replies.
//!
//! Nothing here is required to answer a question: every caller has a
//! template reply to fall back on when generation fails or is not configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::classifier::Language;
use crate::error::LlmError;

/// Sampling settings for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    /// Suggesting alternatives when no page matched.
    pub const ALTERNATIVES: Self = Self {
        temperature: 0.8,
        max_output_tokens: 200,
    };

    /// Open-ended chit-chat.
    pub const CHIT_CHAT: Self = Self {
        temperature: 0.9,
        max_output_tokens: 150,
    };
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply for `prompt`. The returned text is trimmed and free
    /// of `*` markup.
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
        })
    }

    /// Builds a client when `GEMINI_API_KEY` is configured.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_app_config(config: &storebot_core::AppConfig) -> Result<Option<Self>, LlmError> {
        config
            .gemini_api_key
            .as_deref()
            .map(|key| {
                Self::new(
                    &config.llm_base_url,
                    &config.llm_model,
                    key,
                    config.llm_timeout_secs,
                )
            })
            .transpose()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed: GenerateResponse =
            serde_json::from_slice(&body).map_err(LlmError::Deserialize)?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| strip_markup(&p.text))
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Trims and removes `**`/`*` emphasis markers.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    text.trim().replace("**", "").replace('*', "")
}

fn reply_language(language: Language) -> &'static str {
    match language {
        Language::Urdu => "Roman Urdu",
        Language::English => "English",
    }
}

/// Prompt asking for alternatives after a query found no good match.
/// `products` are `(title, excerpt)` pairs; excerpts are cut to 100 chars.
#[must_use]
pub fn alternatives_prompt(
    store_name: &str,
    query: &str,
    language: Language,
    products: &[(String, String)],
) -> String {
    let product_list = products
        .iter()
        .map(|(title, excerpt)| {
            let short: String = excerpt.chars().take(100).collect();
            format!("- {title}: {short}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful sales assistant for {store_name}.\n\n\
         User searched for: {query}\n\
         But exact match not found.\n\n\
         Available Products:\n\
         {product_list}\n\n\
         RULES:\n\
         - Reply in {lang}\n\
         - Keep it VERY SHORT (2-3 lines only)\n\
         - Suggest 2-3 RELEVANT alternatives from above list\n\
         - Be friendly and helpful\n\
         - End with a question\n\n\
         Reply:",
        lang = reply_language(language),
    )
}

/// Prompt for open-ended chat; `site_content` is the cached site summary.
#[must_use]
pub fn chit_chat_prompt(
    store_name: &str,
    query: &str,
    language: Language,
    site_content: &str,
) -> String {
    format!(
        "You are a friendly sales assistant for {store_name} (Pakistani clothing store).\n\n\
         Store content:\n\
         {site_content}\n\n\
         User said: \"{query}\"\n\n\
         RULES:\n\
         - Reply in {lang}\n\
         - Keep it SHORT (1-2 lines only)\n\
         - Be warm and conversational\n\
         - If greeting: respond warmly\n\
         - If thanks: acknowledge politely\n\
         - Guide them to explore products\n\n\
         Reply:",
        lang = reply_language(language),
    )
}

#[cfg(test)]
#[path = "llm_test.rs"]
mod tests;

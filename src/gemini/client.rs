use super::wire::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use super::Generator;
use crate::{
    config::GeminiConfig,
    error::{Result, VisionError},
    logger,
    models::GenerationRequest,
};
use async_trait::async_trait;

const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

/// Gemini client. Built once at start-up and shared; the key is not checked
/// until the first call.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/models/{}{}", self.base_url, self.model, action)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| VisionError::Auth("GOOGLE_API_KEY is not set".into()))
    }

    async fn health_check_impl(&self) -> Result<()> {
        let api_key = self.api_key()?;
        let response = self
            .client
            .get(self.endpoint(""))
            .header("x-goog-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(parse_error(status.as_u16(), &text, None))
        }
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.api_key()?;
        let parts = request.parts();
        log::info!("Invoking model: {} ({} parts)", self.model, parts.len());
        if parts.is_empty() {
            log::warn!("Submitting a request with neither prompt nor image");
        }

        let body = GenerateContentRequest::from_parts(parts);
        let _timer = logger::timer("gemini generateContent");

        let response = self
            .client
            .post(self.endpoint(":generateContent"))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {}: {}", status, text);
            return Err(parse_error(status.as_u16(), &text, retry_after));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.generate_impl(request).await
    }

    async fn health_check(&self) -> Result<()> {
        self.health_check_impl().await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

pub(crate) fn extract_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(VisionError::ContentBlocked(format!(
            "prompt blocked: {reason}"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| VisionError::EmptyResponse("no candidates".into()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKING_FINISH_REASONS.contains(&reason) {
            return Err(VisionError::ContentBlocked(format!(
                "response blocked: {reason}"
            )));
        }
    }

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        return Err(VisionError::EmptyResponse(
            candidate
                .finish_reason
                .unwrap_or_else(|| "candidate has no text".into()),
        ));
    }

    Ok(texts.concat())
}

pub(crate) fn parse_error(status: u16, body: &str, retry_after: Option<u64>) -> VisionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 | 403 => VisionError::Auth(message),
        429 => VisionError::RateLimited {
            retry_after: retry_after.map(std::time::Duration::from_secs),
        },
        // Gemini reports a bad key as 400 INVALID_ARGUMENT.
        400 if message.contains("API key not valid") => VisionError::Auth(message),
        _ => VisionError::Api { status, message },
    }
}

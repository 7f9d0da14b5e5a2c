use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::AnalysisError;
use crate::config::Settings;
use crate::model::EncodedImage;

/// A hosted text-and-image generation endpoint.
pub trait GenerativeClient: Send + Sync {
    fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image: &EncodedImage,
    ) -> Result<String, AnalysisError>;
}

/// Client for the Gemini `generateContent` REST API. A fresh blocking
/// HTTP client is built for every request.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.endpoint, &settings.model, settings.timeout_secs)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn request_body<'a>(prompt: &'a str, image: &'a EncodedImage) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type,
                        data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
                    },
                },
            ],
        }],
    }
}

/// Text parts of the first candidate, concatenated as-is.
fn response_text(response: GenerateContentResponse) -> Result<String, AnalysisError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AnalysisError::ExternalService(String::from(
            "the model returned no text",
        )));
    }
    Ok(text)
}

impl GenerativeClient for GeminiClient {
    fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image: &EncodedImage,
    ) -> Result<String, AnalysisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::ExternalService(format!("HTTP client error: {e}")))?;

        let response = client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request_body(prompt, image))
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AnalysisError::ExternalService(format!("could not reach {}", self.endpoint))
                } else if e.is_timeout() {
                    AnalysisError::ExternalService(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    AnalysisError::ExternalService(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnalysisError::ExternalService(format!(
                "endpoint returned status {}: {body}",
                status.as_u16()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| AnalysisError::ExternalService(format!("unreadable response: {e}")))?;

        response_text(parsed)
    }
}

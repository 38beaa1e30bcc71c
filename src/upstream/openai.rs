//! Image generation provider.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::upstream::client::send_json;
use crate::upstream::UpstreamError;

const PROVIDER: &str = "openai_images";

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u8,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}

/// Prompt asking for a logo that spells out `title` verbatim.
pub fn logo_prompt(title: &str) -> String {
    format!("Create an image of a logo for {title} use the text exactly like: \"{title}\"")
}

#[derive(Clone)]
pub struct ImageGenerationClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ImageGenerationClient {
    pub fn new(http: Client, config: &OpenAiConfig) -> Self {
        Self {
            http,
            endpoint: format!("{}/v1/images/generations", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.image_model.clone(),
        }
    }

    /// Generate a single logo for `title` and return it base64-encoded.
    pub async fn generate_logo(&self, title: &str) -> Result<String, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("OPENAI_API_KEY"));
        }

        let body = GenerationRequest {
            model: &self.model,
            prompt: logo_prompt(title),
            n: 1,
            response_format: "b64_json",
        };
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);

        let value = send_json(PROVIDER, request).await?;
        let response: GenerationResponse =
            serde_json::from_value(value).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or(UpstreamError::MissingField("data[0].b64_json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_prompt_contains_title_twice() {
        let prompt = logo_prompt("Acme");
        assert_eq!(
            prompt,
            "Create an image of a logo for Acme use the text exactly like: \"Acme\""
        );
        assert_eq!(prompt.matches("Acme").count(), 2);
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerationRequest {
            model: "dall-e-3",
            prompt: logo_prompt("Trip"),
            n: 1,
            response_format: "b64_json",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "dall-e-3");
        assert_eq!(json["n"], 1);
        assert_eq!(json["response_format"], "b64_json");
    }
}

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

/// Single-shot completion capability: one prompt in, raw text out. No
/// session state is carried across calls.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY").unwrap_or_else(|_| "dummy_key".to_string()); // In production, make this required
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "http://localhost:11434/api/generate".to_string()); // Using Ollama as default
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama2".to_string());

        Ok(LlmClient {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut request_builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": 0.2
                }
            }));

        // Add authorization header if API key is provided and not dummy
        if self.api_key != "dummy_key" {
            request_builder =
                request_builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            anyhow::bail!("completion endpoint returned {}: {}", status, body);
        }

        // Ollama wraps the completion text in {"response": "..."}; other
        // endpoints may return the text directly.
        let text = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("response")
                    .and_then(|r| r.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        Ok(text)
    }
}

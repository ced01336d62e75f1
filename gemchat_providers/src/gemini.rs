//! Google Gemini streaming provider.
//!
//! Talks to the `streamGenerateContent` endpoint with `alt=sse` and turns
//! the server-sent event stream into a [`FragmentStream`]. No retry or
//! backoff here: a failed call surfaces to the caller as-is.

use async_stream::stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use gemchat_core::{
    CompletionProvider, FragmentStream, GenerationOptions, PromptMessage, PromptRole,
    ResponseFormat,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Request body for `models/{model}:streamGenerateContent`.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating GeminiProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn build_request(messages: &[PromptMessage], options: &GenerationOptions) -> GeminiRequest {
        let contents = messages
            .iter()
            .map(|msg| Content {
                role: match msg.role {
                    PromptRole::Human => "user",
                    PromptRole::Assistant => "model",
                },
                parts: vec![Part {
                    text: msg.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            generation_config: GenerationConfig {
                response_mime_type: match options.response_format {
                    ResponseFormat::PlainText => "text/plain",
                },
            },
        }
    }

    /// Extract the text delta from one SSE data payload.
    ///
    /// Chunks without candidate text (e.g. the trailing usage-only chunk)
    /// yield `None`; anything unparseable is an error.
    fn fragment_from_chunk(data: &str) -> anyhow::Result<Option<String>> {
        let chunk: Value = serde_json::from_str(data)
            .map_err(|e| anyhow::anyhow!("malformed stream chunk: {e}"))?;

        let Some(parts) = chunk["candidates"][0]["content"]["parts"].as_array() else {
            return Ok(None);
        };

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        Ok(Some(text))
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn stream_completion(
        &self,
        messages: &[PromptMessage],
        options: &GenerationOptions,
    ) -> anyhow::Result<FragmentStream> {
        let request = Self::build_request(messages, options);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, options.model
        );

        info!(
            "Opening streaming completion: model={}, messages={}",
            options.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let events = response.bytes_stream().eventsource();

        let fragments = stream! {
            tokio::pin!(events);

            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => match Self::fragment_from_chunk(&event.data) {
                        Ok(Some(text)) => yield Ok(text),
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                            break;
                        }
                    },
                    Err(e) => {
                        yield Err(anyhow::anyhow!("event stream error: {e}"));
                        break;
                    }
                }
            }
            debug!("Completion stream closed");
        };

        Ok(Box::pin(fragments))
    }

    fn default_model(&self) -> &str {
        "gemini-flash-latest"
    }
}

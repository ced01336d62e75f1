#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One finalized exchange unit. Content never changes after the turn
/// has been appended to a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Role tags in the shape completion providers consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    Human,
    Assistant,
}

/// A role-tagged message sent to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl From<&Turn> for PromptMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: match turn.role {
                Role::User => PromptRole::Human,
                Role::Assistant => PromptRole::Assistant,
            },
            content: turn.content.clone(),
        }
    }
}

/// Output shape requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    PlainText,
}

/// Fixed generation settings sent with every completion request.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub response_format: ResponseFormat,
}

impl GenerationOptions {
    /// Plain-text generation with the given model.
    #[must_use]
    pub const fn plain_text(model: String) -> Self {
        Self {
            model,
            response_format: ResponseFormat::PlainText,
        }
    }
}

/// A lazy, finite, non-restartable sequence of reply fragments.
///
/// Fragments arrive in emission order and may be empty. A provider failure
/// mid-stream surfaces as an `Err` item; nothing follows it.
pub type FragmentStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Open one streaming completion over the given ordered messages.
    async fn stream_completion(
        &self,
        messages: &[PromptMessage],
        options: &GenerationOptions,
    ) -> anyhow::Result<FragmentStream>;

    fn default_model(&self) -> &str;
}

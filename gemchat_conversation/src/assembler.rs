//! Streaming response assembly over a bounded history window.
//!
//! The `ResponseAssembler` is the entry point for one conversation turn:
//! it appends the user turn, sends the last N turns to the completion
//! provider, forwards fragments to the caller as they arrive, and appends
//! the materialized reply once the stream ends cleanly.

use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, info};

use gemchat_core::{CompletionProvider, GenerationOptions, PromptMessage, Role};

use crate::transcript::{Transcript, TranscriptError};

/// Configuration for response assembly.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Model to use for completions
    pub model: String,
    /// Number of transcript turns sent with each request
    pub history_window: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            model: "gemini-flash-latest".to_string(),
            history_window: 10,
        }
    }
}

impl AssemblerConfig {
    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Set the history window size.
    #[must_use]
    pub const fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }
}

/// Errors surfaced to the presentation layer by `submit`.
///
/// None of these are fatal: the session stays usable after any of them.
#[derive(Debug, Error)]
pub enum ChatError {
    /// User submitted empty text; the transcript was not touched.
    #[error("empty input")]
    EmptyInput,

    /// The stream ended cleanly but produced no reply text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// The completion provider failed before the stream completed.
    #[error("completion provider error: {0}")]
    Provider(#[from] anyhow::Error),
}

/// Assembles streamed replies for a single session.
///
/// The assembler owns the session transcript for its whole lifetime and is
/// the only writer to it. `&mut self` on [`Self::submit`] serializes turns;
/// there is no internal locking.
pub struct ResponseAssembler<P> {
    provider: P,
    config: AssemblerConfig,
    transcript: Transcript,
}

impl<P> ResponseAssembler<P>
where
    P: CompletionProvider,
{
    /// Create an assembler with a fresh, empty transcript.
    pub fn new(provider: P, config: AssemblerConfig) -> Self {
        info!(
            "Creating response assembler: model={}, history_window={}",
            config.model, config.history_window
        );
        Self {
            provider,
            config,
            transcript: Transcript::new(),
        }
    }

    /// Process one user submission into a finalized assistant turn.
    ///
    /// Every fragment is handed to `on_fragment` in arrival order before it
    /// is folded into the reply buffer. On success the concatenation of all
    /// fragments equals both the returned text and the appended turn.
    ///
    /// If the provider fails mid-stream, the partial buffer is discarded:
    /// the user turn stays in the transcript, no assistant turn is added,
    /// and the next window naturally re-includes the unanswered question.
    pub async fn submit<F>(&mut self, user_text: &str, mut on_fragment: F) -> Result<String, ChatError>
    where
        F: FnMut(&str),
    {
        if user_text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        self.transcript.append(Role::User, user_text.to_string())?;

        let turn_number = self.transcript.len() / 2 + 1;
        info!("Processing turn {turn_number} for session: {}", self.transcript.id);

        // The window includes the user turn appended above, as the most
        // recent entry.
        let messages: Vec<PromptMessage> = self
            .transcript
            .window(self.config.history_window)?
            .iter()
            .map(PromptMessage::from)
            .collect();

        let options = GenerationOptions::plain_text(self.config.model.clone());

        let mut fragments = self
            .provider
            .stream_completion(&messages, &options)
            .await
            .map_err(ChatError::Provider)?;

        let mut reply = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(ChatError::Provider)?;
            on_fragment(&fragment);
            reply.push_str(&fragment);
        }

        if reply.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        self.transcript.append(Role::Assistant, reply.clone())?;
        debug!("Turn {turn_number} completed: {} reply chars", reply.len());

        Ok(reply)
    }

    /// Read access for the presentation layer.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &AssemblerConfig {
        &self.config
    }
}

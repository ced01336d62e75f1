//! Append-only transcript for a single conversation session.
//!
//! The transcript is the complete ordered record of one session's turns.
//! It lives exactly as long as the session and is never persisted.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use gemchat_core::{Role, Turn};

/// Errors from transcript operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// Turn construction was rejected; nothing was stored.
    #[error("invalid turn: content must be non-empty")]
    InvalidTurn,

    /// Window size must be at least 1.
    #[error("invalid window size: {0}")]
    InvalidArgument(usize),
}

/// The ordered record of one session's turns.
///
/// Turns are append-only: once in, a turn is never edited, reordered, or
/// removed. Insertion order is the conversation order.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Session identifier
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last append timestamp
    pub updated_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create a new empty transcript for a fresh session.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            turns: Vec::new(),
        }
    }

    /// Append one finalized turn at the end.
    pub fn append(&mut self, role: Role, content: String) -> Result<(), TranscriptError> {
        if content.is_empty() {
            return Err(TranscriptError::InvalidTurn);
        }
        self.turns.push(Turn { role, content });
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The last `min(k, len)` turns, oldest first.
    ///
    /// This is a derived view, recomputed on every call; it is the only
    /// input the assembler sends to the completion provider.
    pub fn window(&self, k: usize) -> Result<&[Turn], TranscriptError> {
        if k == 0 {
            return Err(TranscriptError::InvalidArgument(k));
        }
        let start = self.turns.len().saturating_sub(k);
        Ok(&self.turns[start..])
    }

    /// All turns in conversation order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turn count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.turns.len()
    }

    /// True until the first submission completes its user append.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_transcript(count: usize) -> Transcript {
        let mut transcript = Transcript::new();
        for i in 0..count {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            transcript
                .append(role, format!("Message {i}"))
                .expect("append failed");
        }
        transcript
    }

    #[test]
    fn test_append_and_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript
            .append(Role::User, "Hello".to_string())
            .expect("append failed");
        transcript
            .append(Role::Assistant, "Hi there!".to_string())
            .expect("append failed");

        assert_eq!(transcript.len(), 2);
        assert!(!transcript.is_empty());
        assert_eq!(transcript.turns()[0].role, Role::User);
        assert_eq!(transcript.turns()[0].content, "Hello");
        assert_eq!(transcript.turns()[1].role, Role::Assistant);
        assert_eq!(transcript.turns()[1].content, "Hi there!");
    }

    #[test]
    fn test_append_rejects_empty_content() {
        let mut transcript = Transcript::new();
        let err = transcript
            .append(Role::User, String::new())
            .expect_err("empty content should be rejected");

        assert_eq!(err, TranscriptError::InvalidTurn);
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_window_is_contiguous_suffix() {
        let transcript = filled_transcript(12);

        let window = transcript.window(5).expect("window failed");
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].content, "Message 7");
        assert_eq!(window[4].content, "Message 11");
    }

    #[test]
    fn test_window_caps_at_length() {
        let transcript = filled_transcript(3);

        assert_eq!(transcript.window(10).expect("window failed").len(), 3);
        assert_eq!(transcript.window(3).expect("window failed").len(), 3);
        assert_eq!(transcript.window(1).expect("window failed").len(), 1);
    }

    #[test]
    fn test_window_rejects_zero() {
        let transcript = filled_transcript(4);
        let err = transcript.window(0).expect_err("zero window should be rejected");

        assert_eq!(err, TranscriptError::InvalidArgument(0));
    }

    #[test]
    fn test_window_on_empty_transcript() {
        let transcript = Transcript::new();
        assert!(transcript.window(10).expect("window failed").is_empty());
    }
}

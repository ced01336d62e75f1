//! End-to-end session flow through the public API only.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use gemchat_conversation::{AssemblerConfig, ChatError, ResponseAssembler};
use gemchat_core::{
    CompletionProvider, FragmentStream, GenerationOptions, PromptMessage, Role,
};

/// Serves one pre-scripted stream per call, in order.
struct QueuedProvider {
    streams: Mutex<VecDeque<Vec<anyhow::Result<String>>>>,
}

impl QueuedProvider {
    fn new(streams: Vec<Vec<anyhow::Result<String>>>) -> Self {
        Self {
            streams: Mutex::new(streams.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for QueuedProvider {
    async fn stream_completion(
        &self,
        _messages: &[PromptMessage],
        _options: &GenerationOptions,
    ) -> anyhow::Result<FragmentStream> {
        let items = self
            .streams
            .lock()
            .expect("streams lock poisoned")
            .pop_front()
            .expect("more calls than scripted streams");

        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn default_model(&self) -> &str {
        "queued"
    }
}

fn ok(fragments: &[&str]) -> Vec<anyhow::Result<String>> {
    fragments.iter().map(|f| Ok((*f).to_string())).collect()
}

#[tokio::test]
async fn test_conversation_survives_provider_failure() {
    let provider = QueuedProvider::new(vec![
        ok(&["Hi", " there", "!"]),
        vec![
            Ok("Partial".to_string()),
            Err(anyhow::anyhow!("connection reset by peer")),
        ],
        ok(&["All good now."]),
    ]);

    let mut assembler = ResponseAssembler::new(provider, AssemblerConfig::default());
    assert!(assembler.transcript().is_empty());

    // First exchange succeeds.
    let mut seen = Vec::new();
    let reply = assembler
        .submit("Hello", |f| seen.push(f.to_string()))
        .await
        .expect("first submit failed");
    assert_eq!(reply, "Hi there!");
    assert_eq!(seen, vec!["Hi", " there", "!"]);
    assert_eq!(assembler.transcript().len(), 2);

    // Second exchange dies mid-stream: user turn stays, partial is dropped.
    let err = assembler
        .submit("And then?", |_| {})
        .await
        .expect_err("scripted failure");
    assert!(matches!(err, ChatError::Provider(_)));
    assert_eq!(assembler.transcript().len(), 3);
    assert!(
        !assembler
            .transcript()
            .turns()
            .iter()
            .any(|t| t.content.contains("Partial"))
    );

    // Session is still usable afterwards.
    let reply = assembler
        .submit("Retry please", |_| {})
        .await
        .expect("third submit failed");
    assert_eq!(reply, "All good now.");

    let turns = assembler.transcript().turns();
    assert_eq!(turns.len(), 5);
    assert_eq!(turns[2].content, "And then?");
    assert_eq!(turns[3].role, Role::User);
    assert_eq!(turns[4].role, Role::Assistant);
    assert_eq!(turns[4].content, "All good now.");
}

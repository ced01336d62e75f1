//! Chat command: single in-memory session, replies streamed to the terminal.
//!
//! The session lives exactly as long as this command. Nothing is persisted;
//! ending the process discards the transcript.

use std::io::Write;

use gemchat_config::Config;
use gemchat_conversation::{AssemblerConfig, ResponseAssembler};
use gemchat_providers::GeminiProvider;
use tracing::info;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Optional history window override
    pub window: Option<usize>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let api_key = config.gemini_api_key()?;
        let provider = GeminiProvider::new(api_key);

        let assembler_config = AssemblerConfig::default()
            .with_model(input.model.unwrap_or_else(|| config.chat.model.clone()))
            .with_history_window(input.window.unwrap_or(config.chat.history_window));

        info!(
            "Starting chat session: model={}, window={}",
            assembler_config.model, assembler_config.history_window
        );

        let mut assembler = ResponseAssembler::new(provider, assembler_config);

        if let Some(message) = input.message {
            assembler.submit(&message, print_fragment).await?;
            println!();
        } else {
            run_interactive(&mut assembler).await?;
        }

        Ok(())
    }
}

fn print_fragment(fragment: &str) {
    print!("{fragment}");
    let _ = std::io::stdout().flush();
}

/// Read lines from stdin until the user quits, streaming each reply.
async fn run_interactive(
    assembler: &mut ResponseAssembler<GeminiProvider>,
) -> anyhow::Result<()> {
    if assembler.transcript().is_empty() {
        println!("Hello there!");
    }
    println!("Type 'exit', 'quit', or Ctrl+C to end the session.\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if matches!(input, "exit" | "quit" | "q") {
            println!(
                "\nSession ended. Total turns: {}",
                assembler.transcript().len() / 2
            );
            break;
        }

        if input.is_empty() {
            continue;
        }

        match assembler.submit(input, print_fragment).await {
            Ok(_) => println!("\n"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}

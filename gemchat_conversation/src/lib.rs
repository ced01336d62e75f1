#![warn(
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

//! Single-session conversation core.
//!
//! This crate holds the in-memory transcript for one chat session and the
//! assembler that turns a user submission into a streamed assistant reply.
//!
//! # Key Features
//! - Append-only transcript with a bounded history window
//! - Incremental reply assembly over a provider fragment stream
//! - Failed streams never leave partial assistant turns behind

mod assembler;
mod transcript;

pub use assembler::{AssemblerConfig, ChatError, ResponseAssembler};
pub use transcript::{Transcript, TranscriptError};

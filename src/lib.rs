//! arkchat is an interactive terminal client for multi-turn conversations
//! with a Volcengine Ark chat completions endpoint.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation transcript, session resolution, the
//!   streaming response consumer and the per-turn controller.
//! - [`ui`] holds the shared console and the "thinking" indicator that runs
//!   while a request is waiting for its first token.
//! - [`api`] defines the chat request and stream chunk payloads.
//! - [`cli`] parses arguments and runs the read loop.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;

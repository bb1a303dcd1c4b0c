//! One user turn: validate input, run the request, reconcile the transcript.

use tracing::{debug, warn};

use crate::core::chat_error::ChatError;
use crate::core::chat_stream::stream_chat;
use crate::core::message::Message;
use crate::core::session::ChatSession;
use crate::core::transcript::Transcript;
use crate::ui::console::Console;
use crate::ui::thinking::{IndicatorConfig, ThinkingIndicator};
use crate::utils::input::sanitize_line;
use crate::utils::logging::TranscriptLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingInput,
    Validating,
    Requesting,
    Reconciling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Quit,
    Clear,
    Empty,
    Message(String),
}

impl InputCommand {
    pub fn parse(line: &str) -> Self {
        let text = sanitize_line(line);
        match text.as_str() {
            "q" | "quit" => InputCommand::Quit,
            "clear" => InputCommand::Clear,
            "" => InputCommand::Empty,
            _ => InputCommand::Message(text),
        }
    }
}

#[derive(Debug)]
pub enum TurnOutcome {
    /// The user asked to leave.
    Exit,
    Cleared,
    /// Nothing was typed; nothing happened.
    Empty,
    Answered(String),
    Failed(ChatError),
}

/// Owns the conversation and drives it one line of input at a time.
pub struct TurnController {
    session: ChatSession,
    transcript: Transcript,
    console: Console,
    indicator: IndicatorConfig,
    log: TranscriptLog,
    phase: TurnPhase,
}

impl TurnController {
    pub fn new(
        session: ChatSession,
        console: Console,
        indicator: IndicatorConfig,
        log: TranscriptLog,
    ) -> Self {
        Self {
            session,
            transcript: Transcript::new(),
            console,
            indicator,
            log,
            phase: TurnPhase::Idle,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Mark that the front end is now waiting on the user.
    pub fn await_input(&mut self) {
        self.phase = TurnPhase::AwaitingInput;
    }

    pub async fn handle_input(&mut self, line: &str) -> TurnOutcome {
        self.phase = TurnPhase::Validating;

        let outcome = match InputCommand::parse(line) {
            InputCommand::Quit => {
                self.say(&format!("\n{}Thanks for chatting, goodbye!", self.label()));
                TurnOutcome::Exit
            }
            InputCommand::Clear => {
                self.transcript.clear();
                if let Err(err) = self.log.log_marker("Conversation cleared") {
                    warn!("failed to write transcript log: {err}");
                }
                self.say(&format!("{}Conversation context cleared.", self.label()));
                TurnOutcome::Cleared
            }
            InputCommand::Empty => {
                self.say(&format!(
                    "{}The question cannot be empty, please try again.",
                    self.label()
                ));
                TurnOutcome::Empty
            }
            InputCommand::Message(text) => self.run_turn(text).await,
        };

        self.phase = TurnPhase::Idle;
        outcome
    }

    async fn run_turn(&mut self, text: String) -> TurnOutcome {
        self.transcript.append(Message::user(text.clone()));
        self.phase = TurnPhase::Requesting;
        debug!(history = self.transcript.len(), "starting turn");

        let mut indicator = ThinkingIndicator::start(self.console.clone(), self.indicator.clone());
        let result = stream_chat(
            &self.session,
            &self.transcript,
            &mut indicator,
            &self.console,
        )
        .await;
        // Must complete before anything else is printed, whatever the result.
        indicator.shutdown().await;

        self.phase = TurnPhase::Reconciling;
        match result {
            Ok(reply) => {
                self.transcript.append(Message::assistant(reply.clone()));
                if let Err(err) = self.log.log_exchange(&text, self.label(), &reply) {
                    warn!("failed to write transcript log: {err}");
                }
                self.print("\n\n");
                TurnOutcome::Answered(reply)
            }
            Err(err) => {
                warn!(error = %err, "chat turn failed");
                self.print(&format!("[error] {err}\n\n"));
                self.transcript.rollback_last();
                TurnOutcome::Failed(err)
            }
        }
    }

    fn label(&self) -> &str {
        &self.indicator.label
    }

    fn say(&self, line: &str) {
        self.print(&format!("{line}\n"));
    }

    fn print(&self, text: &str) {
        if let Err(err) = self.console.print(text) {
            warn!("failed to write to terminal: {err}");
        }
    }
}

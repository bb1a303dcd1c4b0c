//! Streaming chat completion consumer.
//!
//! Sends the whole transcript, reads the server-sent-event body line by line
//! and prints each text delta as soon as it arrives. The thinking indicator is
//! stopped, and its acknowledgement awaited, right before the first visible
//! character is written.

use std::error::Error;
use std::pin::pin;

use futures_util::{Stream, StreamExt};
use memchr::memchr;
use tracing::{debug, trace};

use crate::api::{ChatRequest, ChatStreamChunk};
use crate::core::chat_error::ChatError;
use crate::core::session::ChatSession;
use crate::core::transcript::Transcript;
use crate::ui::console::Console;
use crate::ui::thinking::StopSignal;

const DONE_SENTINEL: &str = "[DONE]";
const MAX_ERROR_DETAIL_CHARS: usize = 200;

#[derive(Debug)]
enum Frame {
    Ignored,
    Done,
    Chunk(ChatStreamChunk),
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Done,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn parse_frame(line: &str) -> Frame {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() || line.starts_with(':') {
        return Frame::Ignored;
    }

    let Some(payload) = extract_data_payload(line) else {
        trace!(line, "ignoring non-data stream field");
        return Frame::Ignored;
    };

    let payload = payload.trim_end();
    if payload == DONE_SENTINEL {
        return Frame::Done;
    }

    match serde_json::from_str::<ChatStreamChunk>(payload) {
        Ok(chunk) => Frame::Chunk(chunk),
        Err(err) => {
            trace!(%err, payload, "skipping unparsable stream frame");
            Frame::Ignored
        }
    }
}

/// Collects the reply and owns the one-time indicator stop.
struct ReplyAccumulator<'a> {
    reply: String,
    indicator: &'a mut dyn StopSignal,
    indicator_stopped: bool,
    console: &'a Console,
}

impl<'a> ReplyAccumulator<'a> {
    fn new(indicator: &'a mut dyn StopSignal, console: &'a Console) -> Self {
        Self {
            reply: String::new(),
            indicator,
            indicator_stopped: false,
            console,
        }
    }

    async fn process_line(&mut self, line: &str) -> Result<Flow, ChatError> {
        match parse_frame(line) {
            Frame::Ignored => Ok(Flow::Continue),
            Frame::Done => Ok(Flow::Done),
            Frame::Chunk(chunk) => {
                self.apply_chunk(chunk).await?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn apply_chunk(&mut self, chunk: ChatStreamChunk) -> Result<(), ChatError> {
        if let Some(error) = &chunk.error {
            return Err(ChatError::Api {
                code: error.code.clone(),
                message: error.message.clone(),
            });
        }

        if let Some(reason) = chunk.first_finish_reason() {
            debug!(reason, "stream reported finish reason");
        }

        let Some(delta) = chunk.first_delta().filter(|delta| !delta.is_empty()) else {
            return Ok(());
        };

        if !self.indicator_stopped {
            self.indicator.stop().await;
            self.indicator_stopped = true;
        }

        self.console.print(delta).map_err(ChatError::Output)?;
        self.reply.push_str(delta);
        Ok(())
    }

    fn finish(self) -> Result<String, ChatError> {
        if self.reply.is_empty() {
            Err(ChatError::EmptyAnswer)
        } else {
            Ok(self.reply)
        }
    }
}

/// Drive a newline-delimited SSE body to completion.
pub async fn consume_stream<S, B, E>(
    stream: S,
    indicator: &mut dyn StopSignal,
    console: &Console,
) -> Result<String, ChatError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    let mut stream = pin!(stream);
    let mut accumulator = ReplyAccumulator::new(indicator, console);
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| ChatError::Read(err.into()))?;
        buffer.extend_from_slice(bytes.as_ref());

        while let Some(newline_pos) = memchr(b'\n', &buffer) {
            let flow = match std::str::from_utf8(&buffer[..newline_pos]) {
                Ok(line) => accumulator.process_line(line).await?,
                Err(err) => {
                    trace!(%err, "skipping stream line with invalid UTF-8");
                    Flow::Continue
                }
            };
            buffer.drain(..=newline_pos);
            if flow == Flow::Done {
                return accumulator.finish();
            }
        }
    }

    // A final frame may arrive without its trailing newline.
    if !buffer.is_empty() {
        if let Ok(line) = std::str::from_utf8(&buffer) {
            accumulator.process_line(line).await?;
        }
    }

    accumulator.finish()
}

pub fn build_request(session: &ChatSession, transcript: &Transcript) -> ChatRequest {
    ChatRequest {
        model: session.model.clone(),
        messages: transcript.api_messages(),
        max_tokens: session.max_tokens,
        temperature: session.temperature,
        stream: true,
    }
}

/// Send the transcript and stream the reply to `console`.
pub async fn stream_chat(
    session: &ChatSession,
    transcript: &Transcript,
    indicator: &mut dyn StopSignal,
    console: &Console,
) -> Result<String, ChatError> {
    let request = build_request(session, transcript);
    debug!(
        url = %session.chat_url,
        messages = request.messages.len(),
        "sending streaming chat request"
    );

    let response = session
        .client
        .post(&session.chat_url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", session.api_key))
        .json(&request)
        .send()
        .await
        .map_err(|err| ChatError::from_send_error(err, session.timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "chat request rejected");
        return Err(ChatError::Status {
            status: status.as_u16(),
            detail: summarize_error_body(&body),
        });
    }

    consume_stream(response.bytes_stream(), indicator, console)
        .await
        .map_err(|err| match err {
            ChatError::Read(source) => ChatError::from_read_error(source, session.timeout_secs),
            other => other,
        })
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// One-line description of an error response body, if it has anything to say.
fn summarize_error_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let summary = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => extract_error_summary(&value).unwrap_or_else(|| value.to_string()),
        Err(_) => trimmed.lines().next().unwrap_or_default().to_string(),
    };

    if summary.chars().count() > MAX_ERROR_DETAIL_CHARS {
        let truncated: String = summary.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
        Some(format!("{truncated}…"))
    } else if summary.is_empty() {
        None
    } else {
        Some(summary)
    }
}

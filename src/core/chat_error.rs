use std::error::Error;
use std::fmt;
use std::io;

/// Why a single chat turn failed. Every variant is turn-scoped: the caller
/// reports it and keeps the conversation going.
#[derive(Debug)]
pub enum ChatError {
    /// The request could not be sent or no response arrived.
    Request(reqwest::Error),
    /// The configured timeout elapsed, before the response arrived or while
    /// its body was still streaming.
    Timeout {
        source: reqwest::Error,
        timeout_secs: u64,
    },
    /// The server answered with a non-success status.
    Status { status: u16, detail: Option<String> },
    /// The response body broke off mid-stream.
    Read(Box<dyn Error + Send + Sync>),
    /// The stream carried an error object instead of content.
    Api {
        code: Option<String>,
        message: String,
    },
    /// The stream completed without any reply text.
    EmptyAnswer,
    /// Writing the reply to the terminal failed.
    Output(io::Error),
}

impl ChatError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ChatError::Timeout { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_send_error(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ChatError::Timeout {
                source: err,
                timeout_secs,
            }
        } else {
            ChatError::Request(err)
        }
    }

    /// Classify a failure while reading the response body.
    pub(crate) fn from_read_error(err: Box<dyn Error + Send + Sync>, timeout_secs: u64) -> Self {
        match err.downcast::<reqwest::Error>() {
            Ok(err) if err.is_timeout() => ChatError::Timeout {
                source: *err,
                timeout_secs,
            },
            Ok(err) => ChatError::Read(err),
            Err(err) => ChatError::Read(err),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Request(err) => write!(f, "Failed to send request: {err}"),
            ChatError::Timeout {
                source,
                timeout_secs,
            } => write!(
                f,
                "Request timed out: {source}\n\
                 Hint: the API did not finish responding within {timeout_secs}s. Try:\n  \
                 1. a longer timeout (--timeout 180)\n  \
                 2. checking your network connection\n  \
                 3. again in a little while"
            ),
            ChatError::Status { status, detail } => match detail {
                Some(detail) => write!(f, "Request failed with status {status}: {detail}"),
                None => write!(f, "Request failed with status {status}"),
            },
            ChatError::Read(err) => write!(f, "Failed to read streaming response: {err}"),
            ChatError::Api { code, message } => match code {
                Some(code) => write!(f, "API error ({code}): {message}"),
                None => write!(f, "API error: {message}"),
            },
            ChatError::EmptyAnswer => write!(f, "No answer received"),
            ChatError::Output(err) => write!(f, "Failed to write reply: {err}"),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::Request(err) => Some(err),
            ChatError::Timeout { source, .. } => Some(source),
            ChatError::Read(err) => Some(err.as_ref()),
            ChatError::Output(err) => Some(err),
            _ => None,
        }
    }
}

//! Ordered conversation history sent as context with every request.

use crate::api::ChatMessage;
use crate::core::message::Message;

/// Linear list of completed turns.
///
/// Between turns the transcript is either empty or ends with a
/// `(user, assistant)` pair. The only unpaired state is the provisional user
/// message that exists while a request is in flight.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Drop the most recent entry, returning it.
    pub fn rollback_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn api_messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_api).collect()
    }

    /// True when the history is empty or ends on a completed exchange.
    pub fn is_settled(&self) -> bool {
        match self.messages.as_slice() {
            [] => true,
            [.., user, assistant] => user.is_user() && assistant.is_assistant(),
            [_] => false,
        }
    }
}

//! Client-side conversational context.
//!
//! The remote API is stateless, so the conversation a session is having with
//! the model is kept here: every send replays all prior turns.

use parley_types::llm::{GatewayError, Message};

use super::box_gateway::BoxModelGateway;

/// The turns the model has seen in the active session.
///
/// A failed send leaves the context untouched, so the next send replays
/// exactly the turns that were successfully answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    turns: Vec<Message>,
}

impl ConversationContext {
    /// Seed a context with prior turns (empty for a fresh session).
    pub fn new(prior: &[Message]) -> Self {
        Self {
            turns: prior.to_vec(),
        }
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    /// Forget every turn.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Send `text` as the next user turn and record the exchange on success.
    ///
    /// Trailing whitespace is stripped from the reply before it is recorded
    /// and returned. A reply with no text left is
    /// [`GatewayError::EmptyResponse`] and records nothing.
    pub async fn send(
        &mut self,
        gateway: &BoxModelGateway,
        text: &str,
    ) -> Result<String, GatewayError> {
        let user = Message::user(text);
        let raw = gateway.generate(&self.with_turn(user.clone())).await?;
        let reply = raw.trim_end();
        if reply.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        self.turns.push(user);
        self.turns.push(Message::model(reply));
        Ok(reply.to_string())
    }

    /// Ask the model about the conversation without recording the exchange.
    pub async fn preview(
        &self,
        gateway: &BoxModelGateway,
        text: &str,
    ) -> Result<String, GatewayError> {
        gateway.generate(&self.with_turn(Message::user(text))).await
    }

    fn with_turn(&self, turn: Message) -> Vec<Message> {
        let mut contents = Vec::with_capacity(self.turns.len() + 1);
        contents.extend(self.turns.iter().cloned());
        contents.push(turn);
        contents
    }
}

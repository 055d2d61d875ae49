//! Conversational retrieval
//!
//! Owns the session transcript and the first-turn grounding injection.
//! The session is an explicit append-only message log seeded with one
//! fixed system instruction; a new session starts a new log.

use crate::error::Result;
use crate::llm::{ChatClient, ChatMessage};
use crate::search::{normalize, SearchResponse};

/// Fixed system instruction seeding every session
pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are an AI assistant. Your answers should stay \
     short and concise. Explain your answer. No formalities. Do not use any information outside \
     of the content I provide";

/// Number of hit bodies injected as grounding context on the first turn
const GROUNDING_HITS: usize = 3;

/// Append-only conversation transcript for one session
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Start a fresh session seeded with the system instruction
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::system(CHAT_SYSTEM_INSTRUCTION)],
        }
    }

    /// Full transcript, system message included
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether no user turn has been submitted yet
    pub fn is_first_turn(&self) -> bool {
        self.messages.len() == 1
    }
}

/// Top retrieved bodies used to ground the first turn
pub fn grounding_bodies(response: &SearchResponse) -> Vec<String> {
    response
        .capped_hits()
        .iter()
        .take(GROUNDING_HITS)
        .map(|hit| normalize(hit).body)
        .collect()
}

/// Run one chat turn.
///
/// On the session's first turn the retrieved content is injected as a
/// synthetic user message ahead of the literal question; later turns
/// append only the question and rely on the accumulated history.
pub async fn chat_turn(
    session: &mut ChatSession,
    client: &dyn ChatClient,
    question: &str,
    grounding: &[String],
) -> Result<String> {
    if session.is_first_turn() {
        session.messages.push(ChatMessage::user(format!(
            "find the answer using this content only: {}",
            grounding.join("\n\n")
        )));
    }
    session.messages.push(ChatMessage::user(question));

    let reply = client.chat_completion(session.messages.clone()).await?;

    session.messages.push(ChatMessage::assistant(reply.clone()));

    Ok(reply)
}

//! Integration tests for chat-session grounding injection

use async_trait::async_trait;
use ragsearch_core::{chat_turn, ChatClient, ChatMessage, ChatSession, GenerationError};
use std::sync::Mutex;

/// Records the full message list of every outgoing completion request
#[derive(Default)]
struct RecordingClient {
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl ChatClient for RecordingClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(messages);
        Ok("assistant reply".to_string())
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

fn grounding_count(messages: &[ChatMessage]) -> usize {
    messages
        .iter()
        .filter(|m| m.content.starts_with("find the answer using this content only:"))
        .count()
}

#[tokio::test]
async fn first_turn_injects_grounding_before_the_question() {
    let client = RecordingClient::default();
    let mut session = ChatSession::new();
    let grounding = vec!["body one".to_string(), "body two".to_string()];

    let reply = chat_turn(&mut session, &client, "what is new?", &grounding)
        .await
        .unwrap();
    assert_eq!(reply, "assistant reply");

    let requests = client.requests.lock().unwrap();
    let outgoing = &requests[0];

    // system, synthetic grounding message, literal question
    assert_eq!(outgoing.len(), 3);
    assert_eq!(outgoing[0].role, "system");
    assert_eq!(outgoing[1].role, "user");
    assert!(outgoing[1].content.contains("body one"));
    assert!(outgoing[1].content.contains("body two"));
    assert_eq!(outgoing[2].content, "what is new?");
    assert_eq!(grounding_count(outgoing), 1);
}

#[tokio::test]
async fn second_turn_appends_only_the_question() {
    let client = RecordingClient::default();
    let mut session = ChatSession::new();

    chat_turn(
        &mut session,
        &client,
        "first question",
        &["grounding body".to_string()],
    )
    .await
    .unwrap();

    chat_turn(&mut session, &client, "second question", &[])
        .await
        .unwrap();

    let requests = client.requests.lock().unwrap();
    let second = &requests[1];

    // No new grounding message on the second turn
    assert_eq!(grounding_count(second), 1);

    // Transcript order: system, grounding, q1, assistant, q2
    assert_eq!(second.len(), 5);
    assert_eq!(second[3].role, "assistant");
    assert_eq!(second[4].content, "second question");
}

#[tokio::test]
async fn assistant_reply_is_appended_to_the_session() {
    let client = RecordingClient::default();
    let mut session = ChatSession::new();

    chat_turn(&mut session, &client, "hello", &[]).await.unwrap();

    let last = session.messages().last().unwrap();
    assert_eq!(last.role, "assistant");
    assert_eq!(last.content, "assistant reply");
    assert!(!session.is_first_turn());
}

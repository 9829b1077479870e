//! Chat transcript assembly.
//!
//! The transcript is the ordered message list a chat session displays.
//! Entries are addressed by a display id (the task id for agent turns), and
//! streamed turns are assembled from chunk events buffered by index.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Placeholder body shown while a task is pending.
pub const THINKING_PLACEHOLDER: &str = "\u{1f914} Thinking...";

// === Types ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Display name once resolved; a streaming turn shows a transient
    /// "thinking" header until the final chunk arrives.
    pub agent_name: Option<String>,
    pub pending: bool,
    pub timestamp: DateTime<Utc>,
}

/// Buffers streamed chunks keyed by `chunk_index` and yields the in-order
/// concatenation, so out-of-order delivery cannot corrupt the display.
#[derive(Debug, Clone, Default)]
pub struct ChunkBuffer {
    parts: BTreeMap<u32, String>,
    finished: bool,
}

impl ChunkBuffer {
    pub fn push(&mut self, chunk_index: u32, chunk: impl Into<String>, is_final: bool) {
        self.parts.insert(chunk_index, chunk.into());
        if is_final {
            self.finished = true;
        }
    }

    /// Concatenation of buffered chunks in index order.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts.values().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Ordered message list with in-place updates by display id.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    streams: BTreeMap<String, ChunkBuffer>,
}

// === Transcript ===

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append the user's message; the id is a locally minted uuid.
    pub fn push_user(&mut self, content: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.messages.push(Message {
            id: id.clone(),
            role: Role::User,
            content: content.into(),
            agent_name: None,
            pending: false,
            timestamp: Utc::now(),
        });
        id
    }

    /// Append the pending placeholder for a submitted task. The task id is
    /// the entry's display id, so poll updates land on this entry.
    pub fn push_placeholder(&mut self, task_id: impl Into<String>) {
        self.messages.push(Message {
            id: task_id.into(),
            role: Role::Agent,
            content: THINKING_PLACEHOLDER.to_string(),
            agent_name: None,
            pending: true,
            timestamp: Utc::now(),
        });
    }

    /// Resolve the entry matching `id` with final content. Exactly one entry
    /// is touched; ids that match nothing are ignored.
    pub fn resolve(&mut self, id: &str, content: impl Into<String>) {
        if let Some(message) = self.messages.iter_mut().find(|message| message.id == id) {
            message.content = content.into();
            message.pending = false;
        }
    }

    /// Resolve the entry matching `id` and record the responding agent.
    pub fn resolve_with_agent(&mut self, id: &str, content: impl Into<String>, agent: &str) {
        self.resolve(id, content);
        if let Some(message) = self.messages.iter_mut().find(|message| message.id == id) {
            message.agent_name = Some(agent.to_string());
        }
    }

    /// Apply one streamed chunk to the turn identified by `id`, creating the
    /// streaming entry on first contact. Returns the assembled text so far.
    pub fn apply_chunk(
        &mut self,
        id: &str,
        chunk: &str,
        chunk_index: u32,
        is_final: bool,
    ) -> String {
        if !self.messages.iter().any(|message| message.id == id) {
            self.push_placeholder(id.to_string());
        }
        let buffer = self.streams.entry(id.to_string()).or_default();
        buffer.push(chunk_index, chunk, is_final);
        let text = buffer.text();
        let finished = buffer.is_finished();

        if let Some(message) = self.messages.iter_mut().find(|message| message.id == id) {
            message.content = text.clone();
            message.pending = !finished;
        }
        if finished {
            self.streams.remove(id);
        }
        text
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chunks_assemble_in_index_order_regardless_of_arrival() {
        let mut transcript = Transcript::new();
        transcript.apply_chunk("t1", " world", 1, false);
        transcript.apply_chunk("t1", "Hello", 0, false);
        let text = transcript.apply_chunk("t1", "!", 2, true);
        assert_eq!(text, "Hello world!");
        let message = transcript.get("t1").expect("entry");
        assert_eq!(message.content, "Hello world!");
        assert!(!message.pending);
    }

    #[test]
    fn streaming_entry_stays_pending_until_final_chunk() {
        let mut transcript = Transcript::new();
        transcript.apply_chunk("t1", "partial", 0, false);
        assert!(transcript.get("t1").expect("entry").pending);
        transcript.apply_chunk("t1", " done", 1, true);
        assert!(!transcript.get("t1").expect("entry").pending);
    }

    #[test]
    fn resolve_touches_exactly_one_entry() {
        let mut transcript = Transcript::new();
        transcript.push_user("List my agents");
        transcript.push_placeholder("t1");
        transcript.push_placeholder("t2");

        transcript.resolve("t1", "You have 3 agents.");

        let resolved = transcript.get("t1").expect("entry");
        assert_eq!(resolved.content, "You have 3 agents.");
        assert!(!resolved.pending);
        let untouched = transcript.get("t2").expect("entry");
        assert_eq!(untouched.content, THINKING_PLACEHOLDER);
        assert!(untouched.pending);
    }

    #[test]
    fn resolve_with_unknown_id_is_a_no_op() {
        let mut transcript = Transcript::new();
        transcript.push_placeholder("t1");
        transcript.resolve("t9", "lost");
        assert_eq!(transcript.get("t1").expect("entry").content, THINKING_PLACEHOLDER);
        assert!(transcript.get("t9").is_none());
    }

    #[test]
    fn resolve_with_agent_records_name() {
        let mut transcript = Transcript::new();
        transcript.push_placeholder("t1");
        transcript.resolve_with_agent("t1", "done", "researcher");
        assert_eq!(
            transcript.get("t1").expect("entry").agent_name.as_deref(),
            Some("researcher")
        );
    }
}

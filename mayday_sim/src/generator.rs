//! Scripted text generator: canned replies and fault injection.

use async_trait::async_trait;
use mayday_env::{ChatMessage, GeneratorError, TextGenerator};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Default reply when the reply queue runs dry.
pub const DEFAULT_REPLY: &str = "Stakeholders view the response with caution.";

/// A TextGenerator that replays a scripted reply queue.
///
/// Replies are consumed front to back; once the queue is empty every call
/// returns [`DEFAULT_REPLY`]. Flipping `set_offline(true)` makes every call
/// fail with a transport error, which is how exercises drive the engine's
/// degraded paths.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    offline: AtomicBool,
    calls: AtomicU64,
}

impl ScriptedGenerator {
    /// Creates a generator with an empty queue (default replies only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        replies.push_back(reply.into());
    }

    /// Switches the simulated transport on or off.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of generation calls made so far, successful or not.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(GeneratorError::transport("scripted outage"));
        }
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(replies
            .pop_front()
            .unwrap_or_else(|| DEFAULT_REPLY.to_string()))
    }
}

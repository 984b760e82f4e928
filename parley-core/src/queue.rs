//! Reply queues — the producer/consumer bridge between network workers and
//! the tick loop.
//!
//! Three independent channels: config-request replies, connectivity-status
//! replies, and generated-dialogue replies. Each sits behind its own mutex
//! and is touched only to push or to drain, so congestion in one reply type
//! never blocks another. Drains copy items out and release the lock before
//! the caller performs any host-side effect.
//!
//! Within one queue, items come out in arrival order. There is no ordering
//! relationship across queues.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::types::{EntityId, LocationKey, SessionId};

/// Reply to a `GET_CONFIG` request: the tick loop sends the current config
/// back to this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigReply {
    /// The session that asked.
    pub requester: SessionId,
}

/// Result of a background reachability probe against the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReply {
    /// The session that asked.
    pub requester: SessionId,
    /// Whether the health endpoint answered in time.
    pub reachable: bool,
}

/// A completed generation, waiting to be spoken in-world.
///
/// Carries identifiers only; the entity is re-resolved at drain time and the
/// item discarded if it no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueReply {
    /// The NPC the request was about.
    pub entity: EntityId,
    /// Where that NPC lived at dispatch time.
    pub location: LocationKey,
    /// The trimmed generated text.
    pub text: String,
}

/// The three reply queues, bundled.
#[derive(Debug, Default)]
pub struct ReplyQueues {
    config: Mutex<VecDeque<ConfigReply>>,
    status: Mutex<VecDeque<StatusReply>>,
    dialogue: Mutex<VecDeque<DialogueReply>>,
}

impl ReplyQueues {
    /// Create empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a config-delivery request.
    pub fn push_config(&self, reply: ConfigReply) {
        self.config.lock().push_back(reply);
    }

    /// Enqueue a reachability result.
    pub fn push_status(&self, reply: StatusReply) {
        self.status.lock().push_back(reply);
    }

    /// Enqueue a completed generation.
    pub fn push_dialogue(&self, reply: DialogueReply) {
        self.dialogue.lock().push_back(reply);
    }

    /// Remove and return all queued config requests, in arrival order.
    #[must_use]
    pub fn drain_config(&self) -> Vec<ConfigReply> {
        self.config.lock().drain(..).collect()
    }

    /// Remove and return all queued status results, in arrival order.
    #[must_use]
    pub fn drain_status(&self) -> Vec<StatusReply> {
        self.status.lock().drain(..).collect()
    }

    /// Remove and return up to `cap` dialogue replies, in arrival order.
    ///
    /// The cap bounds per-tick work: with more replies queued than `cap`,
    /// the remainder waits for the next tick.
    #[must_use]
    pub fn drain_dialogue(&self, cap: usize) -> Vec<DialogueReply> {
        let mut queue = self.dialogue.lock();
        let take = cap.min(queue.len());
        queue.drain(..take).collect()
    }

    /// Number of dialogue replies currently waiting.
    #[must_use]
    pub fn dialogue_depth(&self) -> usize {
        self.dialogue.lock().len()
    }

    /// Whether all three queues are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.config.lock().is_empty()
            && self.status.lock().is_empty()
            && self.dialogue.lock().is_empty()
    }
}

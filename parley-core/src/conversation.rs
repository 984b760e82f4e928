//! Per-entity conversation history with single-active-conversation
//! semantics.
//!
//! The player is "in dialogue with" at most one entity at a time. Switching
//! targets evicts the old target's entire history; there is no multi-party
//! bookkeeping. Background workers append completed turns after the fact,
//! keyed by the entity identity captured at dispatch time — a reply that
//! arrives after the player has moved on still lands on the entity the
//! request was about, and must never disturb the current target.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::EntityId;

/// Default per-entity history cap, in bytes.
///
/// The source behavior grows history without bound; a long-lived
/// conversation would eventually dominate the heap and blow the prompt past
/// any context window. Oldest turns are dropped once an entity's buffer
/// exceeds this.
pub const DEFAULT_HISTORY_LIMIT: usize = 8 * 1024;

/// Marker that opens every appended turn; trimming cuts at these boundaries
/// so a truncated history still starts at a well-formed turn.
const TURN_MARKER: &str = "\nPlayer: ";

#[derive(Debug, Default)]
struct Inner {
    histories: HashMap<EntityId, String>,
    target: Option<EntityId>,
}

/// Thread-safe conversation state: one tick-thread mutator, arbitrarily many
/// worker-thread appenders.
#[derive(Debug)]
pub struct ConversationState {
    inner: Mutex<Inner>,
    history_limit: usize,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Create conversation state with the default history cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create conversation state with a custom per-entity history cap.
    #[must_use]
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            history_limit,
        }
    }

    /// Engage `entity` as the conversation target.
    ///
    /// If a different entity was engaged, its entire history is evicted.
    /// Re-targeting the current target is a no-op and keeps its history.
    pub fn set_target(&self, entity: EntityId) {
        let mut inner = self.inner.lock();
        if inner.target != Some(entity) {
            if let Some(prev) = inner.target.take() {
                inner.histories.remove(&prev);
            }
            inner.target = Some(entity);
        }
    }

    /// Disengage: evict the current target's history and clear the target.
    pub fn clear_target(&self) {
        let mut inner = self.inner.lock();
        if let Some(prev) = inner.target.take() {
            inner.histories.remove(&prev);
        }
    }

    /// The currently engaged entity, if any.
    #[must_use]
    pub fn current_target(&self) -> Option<EntityId> {
        self.inner.lock().target
    }

    /// Append a completed turn to `entity`'s history, creating the buffer if
    /// absent.
    ///
    /// Callable for an entity that is no longer the current target — a stale
    /// reply still records against the entity it was about — and never
    /// changes the target.
    pub fn append_turn(&self, entity: EntityId, text: &str) {
        let mut inner = self.inner.lock();
        let history = inner.histories.entry(entity).or_default();
        history.push_str(text);
        trim_history(history, self.history_limit);
    }

    /// The accumulated history for `entity`, or empty if none.
    #[must_use]
    pub fn history(&self, entity: EntityId) -> String {
        self.inner
            .lock()
            .histories
            .get(&entity)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of entities currently holding a history buffer.
    #[must_use]
    pub fn tracked_entities(&self) -> usize {
        self.inner.lock().histories.len()
    }
}

/// Drop whole turns from the front until `history` fits in `limit` bytes.
///
/// Falls back to a raw front cut (at a char boundary) when a single turn
/// exceeds the limit on its own.
fn trim_history(history: &mut String, limit: usize) {
    while history.len() > limit {
        match history.get(1..).and_then(|tail| tail.find(TURN_MARKER)) {
            Some(pos) => {
                history.drain(..=pos);
            }
            None => {
                let mut cut = history.len() - limit;
                while !history.is_char_boundary(cut) {
                    cut += 1;
                }
                history.drain(..cut);
                break;
            }
        }
    }
}

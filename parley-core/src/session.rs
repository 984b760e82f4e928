//! The explicitly-owned session context.
//!
//! The source behavior kept its config record, history map, and queues as
//! module-level globals. Here they are one owned object, constructed once at
//! process start and handed by `Arc` to the dispatcher's workers and by
//! reference to the tick loop. Lifecycle equals process lifetime; there are
//! no implicit singletons.

use crate::config::ConfigStore;
use crate::conversation::ConversationState;
use crate::queue::ReplyQueues;

/// Everything the tick thread and the worker pool share.
#[derive(Debug, Default)]
pub struct SessionContext {
    /// Live generation configuration.
    pub config: ConfigStore,
    /// Per-entity dialogue histories and the current target.
    pub conversations: ConversationState,
    /// The three worker→tick reply queues.
    pub replies: ReplyQueues,
}

impl SessionContext {
    /// Create a context with default configuration and empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom per-entity history cap.
    #[must_use]
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            config: ConfigStore::new(),
            conversations: ConversationState::with_history_limit(history_limit),
            replies: ReplyQueues::new(),
        }
    }
}

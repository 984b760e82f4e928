//! The host collaborator traits — parley's entire view of the simulation.
//!
//! Live host objects never cross into parley-owned state; these traits are
//! borrowed for the duration of a single hook call on the simulation thread
//! and then released. Resolution returning `None` is an expected race
//! (entity despawned, session closed), not an error.

use std::time::Duration;

use parley_core::types::{EntityId, LocationKey, SessionId};

/// Chat message kinds the host can report.
///
/// Only [`ChatKind::Say`] engages the conversation flow; control tokens are
/// intercepted regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Local spoken chat — the conversation trigger.
    Say,
    /// Zone-wide shout.
    Yell,
    /// Direct whisper to another player.
    Whisper,
    /// Emote text.
    Emote,
}

/// The NPC a player has selected while speaking, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcTarget {
    /// Stable identity of the NPC.
    pub entity: EntityId,
    /// Where the NPC currently lives.
    pub location: LocationKey,
    /// Display name, used for character-card lookup and turn formatting.
    pub name: String,
}

/// Nonverbal cue accompanying a scheduled speech act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonverbalCue {
    /// Generic talking animation.
    Talk,
    /// Emphatic exclamation animation.
    Exclaim,
    /// Questioning animation.
    Question,
}

/// A visible speak-plus-cue effect, handed to the host's event scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAct {
    /// What the NPC says.
    pub text: String,
    /// The accompanying animation.
    pub cue: NonverbalCue,
}

/// A live NPC, borrowed on the simulation thread at drain time.
pub trait NpcHandle {
    /// Display name.
    fn name(&self) -> &str;

    /// Whether the NPC is currently alive; dead NPCs do not speak.
    fn is_alive(&self) -> bool;

    /// Hand a one-shot speech act to the host's own event-timing subsystem,
    /// to fire after `delay`.
    fn schedule_speech(&mut self, act: SpeechAct, delay: Duration);
}

/// A live player session, addressee of config and status replies.
pub trait PlayerSession {
    /// Deliver a single system-message line to this player.
    fn send_system_message(&mut self, text: &str);
}

/// Resolution of opaque identifiers back to live host objects.
pub trait WorldHost {
    /// Resolve an entity within its captured location; `None` when either
    /// the location or the entity is gone.
    fn npc(&mut self, location: LocationKey, entity: EntityId) -> Option<&mut dyn NpcHandle>;

    /// Resolve a player session; `None` when the player logged off.
    fn session(&mut self, id: SessionId) -> Option<&mut dyn PlayerSession>;
}

//! Delayed speech delivery.
//!
//! The visible effect is not applied inline: it is handed to the host's own
//! event-timing subsystem with a short fixed delay, so the speak action and
//! its animation compose with whatever else the host has scheduled for the
//! same entity. The callback fires later on the same simulation thread.

use std::time::Duration;

use crate::hook::{NonverbalCue, NpcHandle, SpeechAct};

/// Fixed delay between a reply being drained and the NPC visibly speaking.
pub const SPEECH_DELAY: Duration = Duration::from_millis(50);

/// Schedule `text` to be spoken by `npc`, with a talk cue, after
/// [`SPEECH_DELAY`]. Dead NPCs stay silent.
pub fn deliver(npc: &mut dyn NpcHandle, text: String) {
    if !npc.is_alive() {
        return;
    }
    npc.schedule_speech(
        SpeechAct {
            text,
            cue: NonverbalCue::Talk,
        },
        SPEECH_DELAY,
    );
}

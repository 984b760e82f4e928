//! Request building — pure transformation from config snapshot plus
//! conversation state to the generation payload.
//!
//! No network, no shared mutable state: the caller hands in a config
//! snapshot and the target's accumulated history, and gets back the wire
//! payload plus the turn text that will be appended to history if the
//! request succeeds.

use serde::{Deserialize, Serialize};

use parley_core::config::AiConfig;

/// Delimiter between tokens in the stop-sequence template.
pub const STOP_DELIMITER: &str = "||$||";

/// Escaped-newline marker inside a stop-sequence token.
const NEWLINE_ESCAPE: &str = "\\n";

/// The generation request payload, serialized as-is onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Full prompt: system prompt, character card, history, current turn.
    pub prompt: String,
    /// Maximum prompt context length, in tokens.
    pub max_context_length: u32,
    /// Maximum completion length, in tokens.
    pub max_length: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Repetition penalty — `rep_pen` on the wire.
    pub rep_pen: f32,
    /// Sequences at which the service should stop generating.
    pub stop_sequence: Vec<String>,
}

/// Derive the stop-sequence list from a config template.
///
/// The template is split on [`STOP_DELIMITER`]; each token has literal
/// `\n` markers unescaped into real newlines; the trailing remainder is
/// itself a stop token.
#[must_use]
pub fn stop_sequences(template: &str) -> Vec<String> {
    template
        .split(STOP_DELIMITER)
        .map(|token| token.replace(NEWLINE_ESCAPE, "\n"))
        .collect()
}

/// Build the generation payload for one player utterance.
///
/// Returns the payload and the formatted turn text
/// (`"\nPlayer: <utterance>\n<npc_name>:"`). The character card is looked
/// up by exact display-name match and omitted when absent.
#[must_use]
pub fn build_request(
    config: &AiConfig,
    npc_name: &str,
    history: &str,
    utterance: &str,
) -> (GenerateRequest, String) {
    let card = config
        .character_cards
        .get(npc_name)
        .map(String::as_str)
        .unwrap_or_default();

    let turn = format!("\nPlayer: {utterance}\n{npc_name}:");
    let prompt = format!("{}\n{card}{history}{turn}", config.system_prompt);

    let request = GenerateRequest {
        prompt,
        max_context_length: config.max_context_length,
        max_length: config.max_length,
        temperature: config.temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        rep_pen: config.repetition_penalty,
        stop_sequence: stop_sequences(&config.stop_sequence),
    };

    (request, turn)
}

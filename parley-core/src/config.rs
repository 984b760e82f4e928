//! Live generation configuration — defaults, persistence, remote updates.
//!
//! The record is mutated in place from the tick thread (file load at startup,
//! remote `SAVE_CONFIG` commands) and consumed by background workers. Workers
//! never read individual fields: they take a whole-record [`snapshot`]
//! copied under the store's single mutex, so a request built mid-update can
//! never observe a record torn between fields.
//!
//! [`snapshot`]: ConfigStore::snapshot

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::ConfigError;

/// Default stop-sequence template: `||$||`-delimited tokens with `\n`
/// escaped as a literal backslash-n.
pub const DEFAULT_STOP_SEQUENCE: &str = "\\n||$||Player:||$||[INST]||$||</s>";

/// Default system prompt prepended to every generation request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant roleplaying as a character in a fantasy world.\nFollow these rules strictly:\n1. Always stay in character.\n2. Do not use newline characters in your response.\n3. Keep your responses to a single, concise paragraph.\n4. Never speak for the player.";

/// The mutable generation configuration record.
///
/// `address` is derived, never set directly: it is recomputed as
/// `host:port` after every mutation that can touch either part.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Generation service hostname or IP.
    pub host: String,
    /// Generation service port.
    pub port: u16,
    /// Derived `host:port` display string.
    pub address: String,

    /// Maximum prompt context length, in tokens.
    pub max_context_length: u32,
    /// Maximum completion length, in tokens.
    pub max_length: u32,
    /// Sampling temperature. Conventionally in `[0, 2]`; not enforced.
    pub temperature: f32,
    /// Repetition penalty.
    pub repetition_penalty: f32,
    /// Nucleus sampling threshold. Conventionally in `[0, 1]`; not enforced.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,

    /// Stop-sequence template; split and unescaped per request.
    pub stop_sequence: String,
    /// System prompt prepended to every request.
    pub system_prompt: String,
    /// Character display name → character-specific prompt fragment.
    pub character_cards: HashMap<String, String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            address: "127.0.0.1:5001".to_string(),
            max_context_length: 8192,
            max_length: 128,
            temperature: 0.8,
            repetition_penalty: 1.1,
            top_p: 0.9,
            top_k: 40,
            stop_sequence: DEFAULT_STOP_SEQUENCE.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            character_cards: HashMap::new(),
        }
    }
}

impl AiConfig {
    /// Apply a single `key=value` update to this record.
    ///
    /// Unknown keys are ignored (forward compatibility with newer persisted
    /// files). A numeric field that fails to parse is rejected with
    /// [`ConfigError::Parse`] and the prior value is retained.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` naming the field on malformed numeric
    /// text.
    pub fn apply_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "host" => self.host = value.to_string(),
            "port" => self.port = parse_field("port", value)?,
            "max_context_length" => {
                self.max_context_length = parse_field("max_context_length", value)?;
            }
            "max_length" => self.max_length = parse_field("max_length", value)?,
            "temperature" => self.temperature = parse_field("temperature", value)?,
            "repetition_penalty" => {
                self.repetition_penalty = parse_field("repetition_penalty", value)?;
            }
            "top_p" => self.top_p = parse_field("top_p", value)?,
            "top_k" => self.top_k = parse_field("top_k", value)?,
            _ => return Ok(()),
        }
        self.address = format!("{}:{}", self.host, self.port);
        Ok(())
    }

    /// Serialize the eight persisted keys, one `key=value` per line, in a
    /// fixed order.
    #[must_use]
    pub fn to_persisted_lines(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "host={}", self.host);
        let _ = writeln!(out, "port={}", self.port);
        let _ = writeln!(out, "max_context_length={}", self.max_context_length);
        let _ = writeln!(out, "max_length={}", self.max_length);
        let _ = writeln!(out, "temperature={}", self.temperature);
        let _ = writeln!(out, "repetition_penalty={}", self.repetition_penalty);
        let _ = writeln!(out, "top_p={}", self.top_p);
        let _ = writeln!(out, "top_k={}", self.top_k);
        out
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Parse {
        field,
        value: value.to_string(),
    })
}

/// Thread-safe owner of the live [`AiConfig`] record.
///
/// One mutex guards the whole record. The tick thread mutates through
/// [`apply_update`] / [`apply_pairs`] / [`load`]; workers read only through
/// [`snapshot`].
///
/// [`apply_update`]: ConfigStore::apply_update
/// [`apply_pairs`]: ConfigStore::apply_pairs
/// [`load`]: ConfigStore::load
/// [`snapshot`]: ConfigStore::snapshot
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: Mutex<AiConfig>,
}

impl ConfigStore {
    /// Create a store holding the hard-coded defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a specific starting record.
    #[must_use]
    pub fn with_config(config: AiConfig) -> Self {
        Self {
            inner: Mutex::new(config),
        }
    }

    /// Copy the entire record under the lock.
    ///
    /// This is the only view background workers ever get: a worker observes
    /// either the record before an update or after it, never a mix.
    #[must_use]
    pub fn snapshot(&self) -> AiConfig {
        self.inner.lock().clone()
    }

    /// Apply a single `key=value` update.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed numeric text; the field
    /// keeps its prior value.
    pub fn apply_update(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.inner.lock().apply_field(key, value)
    }

    /// Apply a batch of `key=value` pairs, as received from a remote
    /// `SAVE_CONFIG` command.
    ///
    /// Each pair is applied independently: a rejected field does not stop
    /// the remaining pairs from applying. Rejections are logged and returned
    /// so the caller can surface them.
    pub fn apply_pairs<'a, I>(&self, pairs: I) -> Vec<ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cfg = self.inner.lock();
        let mut rejected = Vec::new();
        for (key, value) in pairs {
            if let Err(err) = cfg.apply_field(key, value) {
                warn!(%err, "rejected remote config update");
                rejected.push(err);
            }
        }
        rejected
    }

    /// Register (or replace) a character-specific prompt fragment.
    pub fn set_character_card(&self, name: impl Into<String>, card: impl Into<String>) {
        self.inner.lock().character_cards.insert(name.into(), card.into());
    }

    /// Populate the record from a persisted `key=value` file.
    ///
    /// Unknown keys are ignored and absent keys keep their defaults. If the
    /// file does not exist it is created with the current (default) values,
    /// so the first run leaves a file an operator can edit.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file exists but cannot be read, or
    /// the save-on-first-load fallback cannot write.
    pub fn load(&self, path: &Path) -> Result<(), ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, creating with defaults");
                self.save(path)?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        {
            let mut cfg = self.inner.lock();
            for line in text.lines() {
                let Some((key, value)) = line.split_once('=') else {
                    continue;
                };
                if let Err(err) = cfg.apply_field(key.trim(), value.trim()) {
                    warn!(%err, "ignoring malformed config line");
                }
            }
            cfg.address = format!("{}:{}", cfg.host, cfg.port);
        }

        info!(path = %path.display(), "configuration loaded");
        Ok(())
    }

    /// Write the eight persisted keys to `path`, one per line.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let lines = self.inner.lock().to_persisted_lines();
        fs::write(path, lines)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_shipped_values() {
        let cfg = AiConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.address, "127.0.0.1:5001");
        assert_eq!(cfg.max_context_length, 8192);
        assert_eq!(cfg.max_length, 128);
        assert!((cfg.temperature - 0.8).abs() < f32::EPSILON);
        assert!((cfg.repetition_penalty - 1.1).abs() < f32::EPSILON);
        assert!((cfg.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(cfg.top_k, 40);
        assert!(cfg.character_cards.is_empty());
    }

    #[test]
    fn apply_field_recomputes_address() {
        let store = ConfigStore::new();
        store.apply_update("host", "10.0.0.2").expect("host is freeform");
        store.apply_update("port", "8080").expect("valid port");
        assert_eq!(store.snapshot().address, "10.0.0.2:8080");
    }

    #[test]
    fn malformed_numeric_rejected_and_prior_value_kept() {
        let store = ConfigStore::new();
        let err = store.apply_update("port", "notanumber").expect_err("must reject");
        assert!(matches!(
            err,
            ConfigError::Parse { field: "port", .. }
        ));

        let snap = store.snapshot();
        assert_eq!(snap.port, 5001);
        assert_eq!(snap.address, "127.0.0.1:5001");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let store = ConfigStore::new();
        store
            .apply_update("some_future_knob", "whatever")
            .expect("unknown keys ignored");
        assert_eq!(store.snapshot().port, 5001);
    }

    #[test]
    fn apply_pairs_continues_past_bad_field() {
        let store = ConfigStore::new();
        let rejected = store.apply_pairs(vec![
            ("temperature", "0.5"),
            ("top_k", "not_numeric"),
            ("max_length", "256"),
        ]);

        assert_eq!(rejected.len(), 1);
        let snap = store.snapshot();
        assert!((snap.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(snap.top_k, 40, "bad field keeps prior value");
        assert_eq!(snap.max_length, 256, "fields after the bad one still apply");
    }

    #[test]
    fn persisted_lines_are_deterministic() {
        let cfg = AiConfig::default();
        let first = cfg.to_persisted_lines();
        let second = cfg.to_persisted_lines();
        assert_eq!(first, second);
        assert_eq!(first.lines().count(), 8);
        assert!(first.starts_with("host=127.0.0.1\n"));
    }

    #[test]
    fn character_cards_settable() {
        let store = ConfigStore::new();
        store.set_character_card("Aldric", "Aldric is a grizzled town guard.");
        let snap = store.snapshot();
        assert_eq!(
            snap.character_cards.get("Aldric").map(String::as_str),
            Some("Aldric is a grizzled town guard.")
        );
    }
}

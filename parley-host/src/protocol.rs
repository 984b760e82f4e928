//! In-band remote-control protocol.
//!
//! A companion addon drives the bridge through ordinary chat messages
//! carrying control tokens, and reads replies sent back as system-message
//! lines. The wire format is fixed: `[AIMgr_CONFIG]` followed by
//! `key=value;` pairs for config replies, `[AIMgr_STATUS]status=...` for
//! reachability replies.

use parley_core::config::AiConfig;

/// Tag that marks a chat message as addressed to the bridge.
pub const CONTROL_TAG: &str = "AIMGR";

/// Control token requesting the current config.
pub const GET_CONFIG: &str = "GET_CONFIG";

/// Control token carrying a batch of config updates.
pub const SAVE_CONFIG: &str = "SAVE_CONFIG";

/// Prefix of a config reply line.
pub const CONFIG_PREFIX: &str = "[AIMgr_CONFIG]";

/// Prefix of a status reply line.
pub const STATUS_PREFIX: &str = "[AIMgr_STATUS]";

/// A classified incoming chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand<'a> {
    /// `GET_CONFIG` — the sender wants the current config.
    GetConfig,
    /// `SAVE_CONFIG` — the tail holds `key=value;` pairs to apply.
    SaveConfig(&'a str),
    /// An ordinary chat message.
    NotControl,
}

/// Scan a chat message for control tokens.
///
/// `GET_CONFIG` wins when both tokens appear. The `SAVE_CONFIG` tail starts
/// one character past the keyword, skipping the separator.
#[must_use]
pub fn classify(msg: &str) -> ControlCommand<'_> {
    if !msg.contains(CONTROL_TAG) {
        return ControlCommand::NotControl;
    }
    if msg.contains(GET_CONFIG) {
        return ControlCommand::GetConfig;
    }
    if let Some(pos) = msg.find(SAVE_CONFIG) {
        let after = &msg[pos + SAVE_CONFIG.len()..];
        let mut chars = after.chars();
        chars.next();
        return ControlCommand::SaveConfig(chars.as_str());
    }
    ControlCommand::NotControl
}

/// Parse a `key=value;key=value;...` tail into pairs.
///
/// Parsing stops at the first remainder missing either separator; a pair
/// without its trailing `;` is dropped.
#[must_use]
pub fn parse_pairs(tail: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = tail;
    loop {
        let Some(eq) = rest.find('=') else { break };
        let Some(semi) = rest[eq + 1..].find(';') else {
            break;
        };
        let key = rest[..eq].trim().to_string();
        let value = rest[eq + 1..eq + 1 + semi].to_string();
        pairs.push((key, value));
        rest = &rest[eq + 1 + semi + 1..];
    }
    pairs
}

/// Format the full-config reply line: the eight persisted keys with floats
/// at two decimal places.
#[must_use]
pub fn format_config_reply(config: &AiConfig) -> String {
    format!(
        "{CONFIG_PREFIX}host={};port={};max_context_length={};max_length={};temperature={:.2};repetition_penalty={:.2};top_p={:.2};top_k={};",
        config.host,
        config.port,
        config.max_context_length,
        config.max_length,
        config.temperature,
        config.repetition_penalty,
        config.top_p,
        config.top_k,
    )
}

/// Format the reachability reply line.
#[must_use]
pub fn format_status_reply(reachable: bool) -> String {
    format!("{STATUS_PREFIX}status={reachable}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_get_config() {
        assert_eq!(classify("AIMGR GET_CONFIG"), ControlCommand::GetConfig);
    }

    #[test]
    fn classify_save_config_extracts_tail() {
        let cmd = classify("AIMGR SAVE_CONFIG port=5002;top_k=64;");
        assert_eq!(cmd, ControlCommand::SaveConfig("port=5002;top_k=64;"));
    }

    #[test]
    fn classify_requires_control_tag() {
        assert_eq!(classify("please GET_CONFIG for me"), ControlCommand::NotControl);
        assert_eq!(classify("hello there"), ControlCommand::NotControl);
    }

    #[test]
    fn classify_save_config_with_empty_tail() {
        assert_eq!(classify("AIMGR SAVE_CONFIG"), ControlCommand::SaveConfig(""));
    }

    #[test]
    fn parse_pairs_splits_on_separators() {
        let pairs = parse_pairs("host=10.0.0.1;port=5002;");
        assert_eq!(
            pairs,
            vec![
                ("host".to_string(), "10.0.0.1".to_string()),
                ("port".to_string(), "5002".to_string()),
            ]
        );
    }

    #[test]
    fn parse_pairs_drops_unterminated_trailer() {
        let pairs = parse_pairs("port=5002;top_k=64");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "port");
    }

    #[test]
    fn parse_pairs_empty_tail() {
        assert!(parse_pairs("").is_empty());
    }

    #[test]
    fn config_reply_format_is_exact() {
        let config = AiConfig::default();
        assert_eq!(
            format_config_reply(&config),
            "[AIMgr_CONFIG]host=127.0.0.1;port=5001;max_context_length=8192;max_length=128;temperature=0.80;repetition_penalty=1.10;top_p=0.90;top_k=40;"
        );
    }

    #[test]
    fn status_reply_format() {
        assert_eq!(format_status_reply(true), "[AIMgr_STATUS]status=true");
        assert_eq!(format_status_reply(false), "[AIMgr_STATUS]status=false");
    }
}

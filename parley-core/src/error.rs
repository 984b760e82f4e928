//! Error types for the parley core state layer.

use thiserror::Error;

/// Errors raised by configuration load, save, and remote updates.
///
/// Malformed numeric text arriving over the remote-control channel must be
/// rejected rather than silently corrupting a live field, so parse failures
/// name the offending field and leave the prior value in place.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric field received text that does not parse as its type.
    #[error("invalid value '{value}' for config field '{field}'")]
    Parse {
        /// The field the value was destined for.
        field: &'static str,
        /// The rejected text.
        value: String,
    },

    /// Reading or writing the persistence file failed.
    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

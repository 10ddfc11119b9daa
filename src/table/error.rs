//! Route table error definitions.

use thiserror::Error;

/// Errors raised while parsing input for the route table.
///
/// Both kinds are detected before any traversal; once input parses, table
/// operations cannot fail. "Not found" is reported through `Option`/`bool`
/// results, never through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Prefix text is not IPv4 CIDR.
    #[error("Invalid prefix '{input}': {reason}")]
    InvalidPrefix { input: String, reason: &'static str },

    /// Address text is not a dotted IPv4 address.
    #[error("Invalid IP address '{input}': {reason}")]
    InvalidAddress { input: String, reason: &'static str },
}

impl TableError {
    pub(crate) fn prefix(input: &str, reason: &'static str) -> Self {
        Self::InvalidPrefix {
            input: input.to_string(),
            reason,
        }
    }

    pub(crate) fn address(input: &str, reason: &'static str) -> Self {
        Self::InvalidAddress {
            input: input.to_string(),
            reason,
        }
    }
}

//! Engine error types.
//!
//! Errors never escape the engine: the dispatcher folds each one into the
//! ledger's invalidation latch and keeps going.

use stockledger_core::{NumberError, ReturnError, StockError};
use thiserror::Error;

use crate::CommandKind;

/// A log line that could not be turned into a [`crate::Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command name is not recognised.
    #[error("unknown command: {0:?}")]
    Unknown(String),
    /// Wrong number of fields after the command name.
    #[error("{kind} expects {expected} field(s), got {got}")]
    Arity {
        /// The command.
        kind: CommandKind,
        /// Fields required.
        expected: usize,
        /// Fields present.
        got: usize,
    },
    /// A numeric field did not parse.
    #[error("{kind} {field}: {source}")]
    Number {
        /// The command.
        kind: CommandKind,
        /// Name of the offending field.
        field: &'static str,
        /// Parse failure.
        #[source]
        source: NumberError,
    },
    /// A numeric field parsed but is out of range.
    #[error("{kind} {field} out of range: {value}")]
    Value {
        /// The command.
        kind: CommandKind,
        /// Name of the offending field.
        field: &'static str,
        /// The field text.
        value: String,
    },
}

/// Any reason a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The line itself was malformed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// A sale or write-off asked for more than is in stock.
    #[error("{item}: {source}")]
    Stock {
        /// The item.
        item: String,
        /// Shortfall details.
        #[source]
        source: StockError,
    },
    /// A return did not match open sales.
    #[error("{item}: {source}")]
    Return {
        /// The item.
        item: String,
        /// Matching failure.
        #[source]
        source: ReturnError,
    },
    /// A price or profit figure does not fit in a decimal.
    #[error("{item}: arithmetic overflow")]
    Overflow {
        /// The item.
        item: String,
    },
}

//! Command engine for stockledger.
//!
//! This crate turns lines of an inventory log into mutations of a
//! [`stockledger_core::Ledger`]:
//!
//! - [`Command`] - A typed, validated log line
//! - [`Engine`] - Dispatches commands against one ledger and collects output
//! - [`handlers`] - One handler per command kind
//!
//! Any rejected command latches the ledger invalid. From then on the engine
//! keeps consuming lines, but only `PROFIT` produces output
//! (`Profit/Loss: NA`).
//!
//! # Example
//!
//! ```
//! use stockledger_engine::Engine;
//!
//! let mut engine = Engine::new();
//! let output = engine.run_lines([
//!     "STOCK apple 10 5.00",
//!     "ORDER apple 4 8.00",
//!     "CHECK",
//!     "PROFIT",
//! ]);
//!
//! assert_eq!(output, ["apple: 6", "Profit/Loss: $12.00"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod engine;
mod error;
pub mod handlers;

pub use command::{tokenize, Command, CommandKind};
pub use engine::{Engine, NO_RESULT};
pub use error::{CommandError, EngineError};

//! Stockledger CLI.
//!
//! This crate provides the `stockledger` command-line tool, which replays
//! inventory operation logs and prints stock levels and profit/loss:
//!
//! - [`inputs`]: Resolve which files to process
//! - [`report`]: Run one file through a fresh ledger and render the result
//! - [`cmd`]: Argument parsing and the main loop
//!
//! # Example Usage
//!
//! ```bash
//! stockledger day1.txt day2.txt
//! stockledger --list batches.txt --format json
//! stockledger            # reads paths from input_files.txt
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod inputs;
pub mod report;

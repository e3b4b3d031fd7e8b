//! Replay inventory logs and report stock levels and profit/loss.

use std::process::ExitCode;

fn main() -> ExitCode {
    stockledger::cmd::run::main()
}

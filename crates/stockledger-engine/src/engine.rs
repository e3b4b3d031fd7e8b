//! Command dispatch for one ledger.

use stockledger_core::Ledger;
use tracing::{debug, trace};

use crate::{handlers, tokenize, Command, CommandKind, EngineError};

/// What `PROFIT` prints once the ledger has been invalidated.
pub const NO_RESULT: &str = "Profit/Loss: NA";

/// Applies log commands, in order, to a single ledger.
///
/// Rejected commands never surface as errors: the first one latches the
/// ledger invalid. After that every command is consumed without effect,
/// `CHECK` prints nothing and `PROFIT` prints [`NO_RESULT`].
#[derive(Debug, Default)]
pub struct Engine {
    ledger: Ledger,
    commands: usize,
}

impl Engine {
    /// Create an engine with a fresh ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The ledger being built.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Finish and hand back the ledger.
    #[must_use]
    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Apply one tokenized line and return the output lines it produced.
    pub fn execute(&mut self, tokens: &[&str]) -> Vec<String> {
        self.commands += 1;

        if self.ledger.is_invalid() {
            // Once latched, PROFIT is recognised regardless of case
            return match tokens.first() {
                Some(name) if name.eq_ignore_ascii_case(CommandKind::Profit.name()) => {
                    vec![NO_RESULT.to_string()]
                }
                _ => Vec::new(),
            };
        }

        match self.dispatch(tokens) {
            Ok(output) => output,
            Err(err) => {
                debug!(command = self.commands, %err, "ledger invalidated");
                self.ledger
                    .invalidate(format!("command {}: {err}", self.commands));
                Vec::new()
            }
        }
    }

    /// Apply one raw line. Surrounding whitespace is trimmed and blank lines
    /// are skipped.
    pub fn execute_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim_matches(|c: char| c <= ' ');
        if line.is_empty() {
            return Vec::new();
        }
        self.execute(&tokenize(line))
    }

    /// Apply every line in order and collect all output.
    pub fn run_lines<I, S>(&mut self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .flat_map(|line| self.execute_line(line.as_ref()))
            .collect()
    }

    fn dispatch(&mut self, tokens: &[&str]) -> Result<Vec<String>, EngineError> {
        let command = Command::parse(tokens)?;
        trace!(?command, "dispatch");

        let ledger = &mut self.ledger;
        match command {
            Command::Stock {
                item,
                quantity,
                unit_cost,
            } => handlers::stock(ledger, item, quantity, unit_cost)?,
            Command::Order {
                item,
                quantity,
                price,
            } => handlers::order(ledger, item, quantity, price)?,
            Command::Expire { item, quantity } => handlers::expire(ledger, item, quantity)?,
            Command::Return {
                item,
                quantity,
                price,
            } => handlers::return_sale(ledger, item, quantity, price)?,
            Command::Discount { item, percent } => handlers::discount(ledger, item, percent),
            Command::DiscountEnd { item } => handlers::discount_end(ledger, item),
            Command::Check => return Ok(handlers::check(ledger)),
            Command::Profit => return Ok(vec![handlers::profit(ledger)]),
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_latches() {
        let mut engine = Engine::new();
        assert!(engine.execute_line("RESTOCK a 1 1").is_empty());
        assert!(engine.ledger().is_invalid());
        assert_eq!(
            engine.ledger().invalidation(),
            Some("command 1: unknown command: \"RESTOCK\"")
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut engine = Engine::new();
        let output = engine.run_lines(["", "   ", "\tPROFIT  "]);
        assert_eq!(output, ["Profit/Loss: $0.00"]);
    }

    #[test]
    fn test_latched_profit_is_case_insensitive() {
        let mut engine = Engine::new();
        let output = engine.run_lines(["BOGUS", "profit", "Profit x", "CHECK"]);
        assert_eq!(output, [NO_RESULT, NO_RESULT]);
    }

    #[test]
    fn test_lowercase_profit_latches_valid_ledger() {
        let mut engine = Engine::new();
        let output = engine.run_lines(["profit", "PROFIT"]);
        assert_eq!(output, [NO_RESULT]);
    }

    #[test]
    fn test_latched_ledger_ignores_mutations() {
        let mut engine = Engine::new();
        engine.run_lines(["STOCK a 1 1.00", "EXPIRE a 2", "STOCK a 5 1.00"]);
        let ledger = engine.into_ledger();
        assert_eq!(ledger.item("a").unwrap().quantity(), 1);
    }
}

//! Log line parsing.
//!
//! A line is split on single spaces; the first token names the command and
//! the rest are its fields. Parsing checks the field count and every
//! numeric field before anything touches the ledger.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use stockledger_core::{parse_decimal, parse_integer, parse_quantity};

use crate::CommandError;

/// The command names understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Receive a purchase lot.
    Stock,
    /// Sell units.
    Order,
    /// Write off units.
    Expire,
    /// Reverse earlier sales.
    Return,
    /// Activate a discount.
    Discount,
    /// End the most recent discount.
    DiscountEnd,
    /// Report stock levels.
    Check,
    /// Report profit/loss.
    Profit,
}

impl CommandKind {
    /// The command name as written in the log.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stock => "STOCK",
            Self::Order => "ORDER",
            Self::Expire => "EXPIRE",
            Self::Return => "RETURN",
            Self::Discount => "DISCOUNT",
            Self::DiscountEnd => "DISCOUNT_END",
            Self::Check => "CHECK",
            Self::Profit => "PROFIT",
        }
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    /// Command names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOCK" => Ok(Self::Stock),
            "ORDER" => Ok(Self::Order),
            "EXPIRE" => Ok(Self::Expire),
            "RETURN" => Ok(Self::Return),
            "DISCOUNT" => Ok(Self::Discount),
            "DISCOUNT_END" => Ok(Self::DiscountEnd),
            "CHECK" => Ok(Self::Check),
            "PROFIT" => Ok(Self::Profit),
            _ => Err(CommandError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated log line. Item names borrow from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `STOCK item qty cost`
    Stock {
        /// Item name.
        item: &'a str,
        /// Units received.
        quantity: u32,
        /// Cost per unit, strictly positive.
        unit_cost: Decimal,
    },
    /// `ORDER item qty sell`
    Order {
        /// Item name.
        item: &'a str,
        /// Units sold.
        quantity: u32,
        /// Nominal sell price, not negative.
        price: Decimal,
    },
    /// `EXPIRE item qty`
    Expire {
        /// Item name.
        item: &'a str,
        /// Units written off.
        quantity: u32,
    },
    /// `RETURN item qty sell`
    Return {
        /// Item name.
        item: &'a str,
        /// Units returned.
        quantity: u32,
        /// Nominal price of the sale being reversed.
        price: Decimal,
    },
    /// `DISCOUNT item percent`
    Discount {
        /// Item name.
        item: &'a str,
        /// Percentage off, not range-checked.
        percent: i32,
    },
    /// `DISCOUNT_END item`
    DiscountEnd {
        /// Item name.
        item: &'a str,
    },
    /// `CHECK`
    Check,
    /// `PROFIT`
    Profit,
}

impl<'a> Command<'a> {
    /// Parse a tokenized line.
    ///
    /// ```
    /// use stockledger_engine::{Command, CommandError, tokenize};
    /// use rust_decimal_macros::dec;
    ///
    /// let cmd = Command::parse(&tokenize("STOCK apple 10 5.00")).unwrap();
    /// assert_eq!(cmd, Command::Stock { item: "apple", quantity: 10, unit_cost: dec!(5.00) });
    ///
    /// assert!(matches!(
    ///     Command::parse(&tokenize("STOCK apple 10 0")),
    ///     Err(CommandError::Value { .. })
    /// ));
    /// ```
    pub fn parse(tokens: &[&'a str]) -> Result<Self, CommandError> {
        let (name, fields) = tokens
            .split_first()
            .ok_or_else(|| CommandError::Unknown(String::new()))?;
        let kind: CommandKind = name.parse()?;

        match kind {
            CommandKind::Stock => {
                let [item, quantity, cost] = expect_fields(kind, fields)?;
                let quantity = quantity_field(kind, quantity)?;
                let unit_cost = decimal_field(kind, "cost", cost)?;
                if unit_cost <= Decimal::ZERO {
                    return Err(value_error(kind, "cost", cost));
                }
                Ok(Self::Stock {
                    item,
                    quantity,
                    unit_cost,
                })
            }
            CommandKind::Order => {
                let [item, quantity, sell] = expect_fields(kind, fields)?;
                let quantity = quantity_field(kind, quantity)?;
                let price = decimal_field(kind, "price", sell)?;
                if price < Decimal::ZERO {
                    return Err(value_error(kind, "price", sell));
                }
                Ok(Self::Order {
                    item,
                    quantity,
                    price,
                })
            }
            CommandKind::Expire => {
                let [item, quantity] = expect_fields(kind, fields)?;
                Ok(Self::Expire {
                    item,
                    quantity: quantity_field(kind, quantity)?,
                })
            }
            CommandKind::Return => {
                let [item, quantity, sell] = expect_fields(kind, fields)?;
                let quantity = quantity_field(kind, quantity)?;
                let price = decimal_field(kind, "price", sell)?;
                Ok(Self::Return {
                    item,
                    quantity,
                    price,
                })
            }
            CommandKind::Discount => {
                let [item, percent] = expect_fields(kind, fields)?;
                let percent = parse_integer(percent).map_err(|source| CommandError::Number {
                    kind,
                    field: "percent",
                    source,
                })?;
                Ok(Self::Discount { item, percent })
            }
            CommandKind::DiscountEnd => {
                let [item] = expect_fields(kind, fields)?;
                Ok(Self::DiscountEnd { item })
            }
            // Report commands ignore any trailing fields
            CommandKind::Check => Ok(Self::Check),
            CommandKind::Profit => Ok(Self::Profit),
        }
    }

    /// The kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Stock { .. } => CommandKind::Stock,
            Self::Order { .. } => CommandKind::Order,
            Self::Expire { .. } => CommandKind::Expire,
            Self::Return { .. } => CommandKind::Return,
            Self::Discount { .. } => CommandKind::Discount,
            Self::DiscountEnd { .. } => CommandKind::DiscountEnd,
            Self::Check => CommandKind::Check,
            Self::Profit => CommandKind::Profit,
        }
    }
}

/// Split a trimmed line into tokens on single spaces.
///
/// Consecutive spaces produce empty tokens, which then fail the field
/// count check.
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

fn expect_fields<'a, const N: usize>(
    kind: CommandKind,
    fields: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(fields).map_err(|_| CommandError::Arity {
        kind,
        expected: N,
        got: fields.len(),
    })
}

fn quantity_field(kind: CommandKind, text: &str) -> Result<u32, CommandError> {
    parse_quantity(text).map_err(|source| CommandError::Number {
        kind,
        field: "quantity",
        source,
    })
}

fn decimal_field(kind: CommandKind, field: &'static str, text: &str) -> Result<Decimal, CommandError> {
    parse_decimal(text).map_err(|source| CommandError::Number {
        kind,
        field,
        source,
    })
}

fn value_error(kind: CommandKind, field: &'static str, text: &str) -> CommandError {
    CommandError::Value {
        kind,
        field,
        value: text.to_string(),
    }
}

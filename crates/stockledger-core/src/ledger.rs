//! The ledger of one processed file.
//!
//! A [`Ledger`] owns every item referenced by the file, the running
//! profit/loss and the invalidation latch. It is created fresh for each
//! file and dropped afterwards; nothing carries over between files.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::ItemState;

/// Items, running profit and the invalidation latch for one file.
///
/// Items keep the order in which they were first referenced, which is the
/// order stock reports list them in.
///
/// # Examples
///
/// ```
/// use stockledger_core::Ledger;
///
/// let mut ledger = Ledger::new();
/// ledger.item_mut("pear");
/// ledger.item_mut("apple");
///
/// let names: Vec<&str> = ledger.items().map(|(name, _)| name).collect();
/// assert_eq!(names, ["pear", "apple"]);
///
/// ledger.invalidate("insufficient stock");
/// ledger.invalidate("ignored, the first reason wins");
/// assert_eq!(ledger.invalidation(), Some("insufficient stock"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<(String, ItemState)>,
    index: HashMap<String, usize>,
    profit: Decimal,
    invalidation: Option<String>,
}

impl Ledger {
    /// Create an empty, valid ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an item without creating it.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemState> {
        self.index.get(name).map(|&i| &self.items[i].1)
    }

    /// Get an item, creating it on first reference.
    pub fn item_mut(&mut self, name: &str) -> &mut ItemState {
        self.item_with_profit(name).0
    }

    /// Get an item (created on first reference) together with the running
    /// profit, so both can be updated by one operation.
    pub fn item_with_profit(&mut self, name: &str) -> (&mut ItemState, &mut Decimal) {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.items.len();
                self.items.push((name.to_string(), ItemState::new()));
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        (&mut self.items[idx].1, &mut self.profit)
    }

    /// Items in first-reference order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &ItemState)> {
        self.items.iter().map(|(name, item)| (name.as_str(), item))
    }

    /// Number of items referenced so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether no item has been referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cumulative profit (negative for a loss).
    ///
    /// A total that is exactly zero is reported unsigned.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        if self.profit.is_zero() {
            Decimal::ZERO
        } else {
            self.profit
        }
    }

    /// Check whether the latch has been set.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.invalidation.is_some()
    }

    /// Why the ledger was invalidated, if it was.
    #[must_use]
    pub fn invalidation(&self) -> Option<&str> {
        self.invalidation.as_deref()
    }

    /// Set the latch. It never clears; only the first reason is kept.
    pub fn invalidate(&mut self, reason: impl ToString) {
        if self.invalidation.is_none() {
            self.invalidation = Some(reason.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_item_created_lazily_once() {
        let mut ledger = Ledger::new();
        assert!(ledger.item("a").is_none());

        ledger.item_mut("a").stock.push(3, dec!(1.00));
        ledger.item_mut("a").stock.push(2, dec!(1.00));

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.item("a").map(ItemState::quantity), Some(5));
    }

    #[test]
    fn test_item_with_profit_updates_both() {
        let mut ledger = Ledger::new();
        let (item, profit) = ledger.item_with_profit("a");
        item.discounts.begin(10);
        *profit += dec!(2.50);

        assert_eq!(ledger.profit(), dec!(2.50));
        assert_eq!(ledger.item("a").unwrap().discounts.active(), 10);
    }

    #[test]
    fn test_zero_profit_is_unsigned() {
        let mut ledger = Ledger::new();
        let (_, profit) = ledger.item_with_profit("a");
        profit.set_sign_negative(true);

        assert!(!ledger.profit().is_sign_negative());

        let (_, profit) = ledger.item_with_profit("a");
        *profit = dec!(-0.001);
        assert!(ledger.profit().is_sign_negative());
    }

    #[test]
    fn test_latch_is_one_way() {
        let mut ledger = Ledger::new();
        assert!(!ledger.is_invalid());

        ledger.invalidate("first");
        ledger.invalidate("second");

        assert!(ledger.is_invalid());
        assert_eq!(ledger.invalidation(), Some("first"));
    }
}

//! Per-item state.

use serde::{Deserialize, Serialize};

use crate::{SaleBook, StockQueue};

/// Discount percentages in force for an item, most recent on top.
///
/// Only the top entry applies. Ending a discount pops it and reinstates the
/// one below; ending with nothing active is silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountStack {
    percents: Vec<i32>,
}

impl DiscountStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a discount on top of any existing ones.
    pub fn begin(&mut self, percent: i32) {
        self.percents.push(percent);
    }

    /// End the most recent discount, returning it if there was one.
    pub fn end(&mut self) -> Option<i32> {
        self.percents.pop()
    }

    /// The percentage currently in force, `0` when none is active.
    #[must_use]
    pub fn active(&self) -> i32 {
        self.percents.last().copied().unwrap_or(0)
    }

    /// Number of stacked discounts.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.percents.len()
    }
}

/// Everything tracked for one catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    /// Saleable stock, oldest cost layer first.
    pub stock: StockQueue,
    /// Active discounts.
    pub discounts: DiscountStack,
    /// Completed sales that can still be returned.
    pub sales: SaleBook,
}

impl ItemState {
    /// Create an item with no stock, discounts or sales.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units currently in stock.
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.stock.total()
    }
}

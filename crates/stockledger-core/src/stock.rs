//! Stock cost layers for a single item.
//!
//! A [`StockQueue`] holds every purchase lot still on the shelf, oldest
//! first. Sales and write-offs always consume from the head, so profit is
//! attributed against the oldest cost that is still in stock.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::SaleSegment;

/// One purchase lot: a quantity bought at a single unit cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBatch {
    /// Units left in this lot.
    pub quantity: u32,
    /// Cost paid per unit.
    pub unit_cost: Decimal,
}

/// Error raised when stock cannot cover a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// More units were requested than are on hand.
    #[error("insufficient stock: requested {requested}, available {available}")]
    Insufficient {
        /// Units requested.
        requested: u32,
        /// Units available.
        available: u64,
    },
}

/// FIFO queue of purchase lots with a running unit total.
///
/// The total always equals the sum of the lot quantities, and a lot is
/// removed as soon as it is fully consumed.
///
/// # Examples
///
/// ```
/// use stockledger_core::StockQueue;
/// use rust_decimal_macros::dec;
///
/// let mut stock = StockQueue::new();
/// stock.push(3, dec!(1.00));
/// stock.push(5, dec!(2.00));
///
/// let layers = stock.consume(4).unwrap();
/// assert_eq!(layers.len(), 2);
/// assert_eq!(layers[0].quantity, 3);
/// assert_eq!(layers[1].unit_cost, dec!(2.00));
/// assert_eq!(stock.total(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQueue {
    batches: VecDeque<StockBatch>,
    total: u64,
}

impl StockQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units currently on hand.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Lots on hand, oldest first.
    pub fn batches(&self) -> impl Iterator<Item = &StockBatch> {
        self.batches.iter()
    }

    /// Check whether nothing is on hand.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Append a new lot at the tail. A zero quantity adds nothing.
    pub fn push(&mut self, quantity: u32, unit_cost: Decimal) {
        if quantity == 0 {
            return;
        }
        self.batches.push_back(StockBatch {
            quantity,
            unit_cost,
        });
        self.total += u64::from(quantity);
    }

    /// Describe which cost layers would cover `quantity` units, without
    /// consuming anything.
    pub fn layers_for(&self, quantity: u32) -> Result<Vec<SaleSegment>, StockError> {
        self.ensure_available(quantity)?;

        let mut layers = Vec::new();
        let mut remaining = quantity;
        for batch in &self.batches {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(batch.quantity);
            layers.push(SaleSegment::new(take, batch.unit_cost));
            remaining -= take;
        }
        Ok(layers)
    }

    /// Consume `quantity` units from the head and return the cost layers
    /// they came from, in consumption order.
    ///
    /// Nothing is consumed when the queue cannot cover the request.
    pub fn consume(&mut self, quantity: u32) -> Result<Vec<SaleSegment>, StockError> {
        let layers = self.layers_for(quantity)?;

        let mut remaining = quantity;
        while remaining > 0 {
            let Some(head) = self.batches.front_mut() else {
                break;
            };
            let take = remaining.min(head.quantity);
            head.quantity -= take;
            if head.quantity == 0 {
                self.batches.pop_front();
            }
            remaining -= take;
        }
        self.total -= u64::from(quantity);

        Ok(layers)
    }

    fn ensure_available(&self, quantity: u32) -> Result<(), StockError> {
        if self.total < u64::from(quantity) {
            return Err(StockError::Insufficient {
                requested: quantity,
                available: self.total,
            });
        }
        Ok(())
    }
}

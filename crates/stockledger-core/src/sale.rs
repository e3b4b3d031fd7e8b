//! Completed sales and their reversal.
//!
//! Every accepted sale leaves a [`SaleRecord`] remembering which cost layers
//! it consumed and the effective price it was sold at. A return looks up the
//! records for its nominal price, newest first, and unwinds each record's
//! layers oldest first, so the profit taken back is exactly the profit the
//! sale booked.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

use crate::PriceKey;

/// A slice of a purchase lot consumed by one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSegment {
    /// Units taken from the lot.
    pub quantity: u32,
    /// The lot's unit cost.
    pub unit_cost: Decimal,
}

impl SaleSegment {
    /// Create a segment.
    #[must_use]
    pub const fn new(quantity: u32, unit_cost: Decimal) -> Self {
        Self {
            quantity,
            unit_cost,
        }
    }

    /// Profit of selling this segment at `price`: `quantity * (price - unit_cost)`.
    #[must_use]
    pub fn margin_at(&self, price: Decimal) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(price.checked_sub(self.unit_cost)?)
    }

    /// Total cost of the segment: `quantity * unit_cost`.
    #[must_use]
    pub fn cost(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_cost)
    }
}

/// One accepted sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    base_price: PriceKey,
    effective_price: Decimal,
    remaining: u32,
    segments: VecDeque<SaleSegment>,
}

impl SaleRecord {
    /// Create a record from the layers a sale consumed, in consumption order.
    ///
    /// `effective_price` is the nominal price with the discount active at
    /// sale time already applied; later discount changes never touch it.
    #[must_use]
    pub fn new(base_price: PriceKey, effective_price: Decimal, segments: Vec<SaleSegment>) -> Self {
        let remaining = segments.iter().map(|s| s.quantity).sum();
        Self {
            base_price,
            effective_price,
            remaining,
            segments: segments.into(),
        }
    }

    /// Nominal price key the sale was recorded under.
    #[must_use]
    pub const fn base_price(&self) -> &PriceKey {
        &self.base_price
    }

    /// Price actually charged per unit.
    #[must_use]
    pub const fn effective_price(&self) -> Decimal {
        self.effective_price
    }

    /// Units that can still be returned.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Remaining cost layers, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &SaleSegment> {
        self.segments.iter()
    }

    /// Check whether every unit of the sale has been returned.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0 && self.segments.is_empty()
    }

    /// Profit still attributed to the open part of this sale.
    #[must_use]
    pub fn margin(&self) -> Option<Decimal> {
        self.segments
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.margin_at(self.effective_price)?))
    }

    /// Profit that returning `quantity` units would take back, walking the
    /// layers oldest first. `quantity` is capped at [`Self::remaining`].
    #[must_use]
    pub fn reversal_margin(&self, quantity: u32) -> Option<Decimal> {
        let mut needed = quantity.min(self.remaining);
        let mut total = Decimal::ZERO;
        for segment in &self.segments {
            if needed == 0 {
                break;
            }
            let take = needed.min(segment.quantity);
            let part = SaleSegment::new(take, segment.unit_cost).margin_at(self.effective_price)?;
            total = total.checked_add(part)?;
            needed -= take;
        }
        Some(total)
    }

    /// Remove up to `quantity` units from the oldest layers.
    fn unwind(&mut self, quantity: u32) {
        let mut needed = quantity.min(self.remaining);
        self.remaining -= needed;
        while needed > 0 {
            let Some(head) = self.segments.front_mut() else {
                break;
            };
            let take = needed.min(head.quantity);
            head.quantity -= take;
            if head.quantity == 0 {
                self.segments.pop_front();
            }
            needed -= take;
        }
    }
}

/// Error raised when a return cannot be matched to earlier sales.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnError {
    /// No open sale exists at this nominal price.
    #[error("no open sale at price {price}")]
    NoOpenSale {
        /// The nominal price key.
        price: PriceKey,
    },
    /// Open sales at this price do not cover the returned quantity.
    #[error("return of {requested} at price {price} exceeds {open} open units")]
    ExceedsOpen {
        /// The nominal price key.
        price: PriceKey,
        /// Units being returned.
        requested: u32,
        /// Units still open at the price.
        open: u64,
    },
    /// The reversed profit does not fit in a decimal.
    #[error("profit overflow while reversing sales at price {price}")]
    Overflow {
        /// The nominal price key.
        price: PriceKey,
    },
}

/// Sale records of one item, grouped by nominal price key.
///
/// Within a price, the most recent sale is matched first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBook {
    by_price: HashMap<PriceKey, Vec<SaleRecord>>,
}

impl SaleBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed sale as the most recent at its price.
    /// Records with nothing left to return are not kept.
    pub fn record(&mut self, record: SaleRecord) {
        if record.is_exhausted() {
            return;
        }
        self.by_price
            .entry(record.base_price.clone())
            .or_default()
            .push(record);
    }

    /// Open records at a price, most recent first.
    pub fn records(&self, price: &PriceKey) -> impl Iterator<Item = &SaleRecord> {
        self.by_price.get(price).into_iter().flatten().rev()
    }

    /// Units still returnable at a price.
    #[must_use]
    pub fn open_quantity(&self, price: &PriceKey) -> u64 {
        self.records(price).map(|r| u64::from(r.remaining)).sum()
    }

    /// Return `quantity` units sold at `price`.
    ///
    /// Records are consumed most recent first; within a record, the cost
    /// layers are unwound oldest first. Returns the profit the returned units
    /// had booked, which the caller takes back off the running total.
    ///
    /// Nothing changes when the open sales cannot cover the return.
    pub fn reverse(&mut self, price: &PriceKey, quantity: u32) -> Result<Decimal, ReturnError> {
        let open = self.open_quantity(price);
        if open == 0 {
            return Err(ReturnError::NoOpenSale {
                price: price.clone(),
            });
        }
        if open < u64::from(quantity) {
            return Err(ReturnError::ExceedsOpen {
                price: price.clone(),
                requested: quantity,
                open,
            });
        }
        let margin = self
            .reversal_margin(price, quantity)
            .ok_or_else(|| ReturnError::Overflow {
                price: price.clone(),
            })?;

        let Some(stack) = self.by_price.get_mut(price) else {
            return Ok(margin);
        };
        let mut needed = quantity;
        while needed > 0 {
            let Some(record) = stack.last_mut() else {
                break;
            };
            let take = needed.min(record.remaining);
            record.unwind(take);
            needed -= take;
            if record.is_exhausted() {
                stack.pop();
            }
        }
        if stack.is_empty() {
            self.by_price.remove(price);
        }

        Ok(margin)
    }

    fn reversal_margin(&self, price: &PriceKey, quantity: u32) -> Option<Decimal> {
        let mut needed = quantity;
        let mut total = Decimal::ZERO;
        for record in self.records(price) {
            if needed == 0 {
                break;
            }
            let take = needed.min(record.remaining);
            total = total.checked_add(record.reversal_margin(take)?)?;
            needed -= take;
        }
        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn key(price: Decimal) -> PriceKey {
        PriceKey::from_price(price)
    }

    fn sale(price: Decimal, effective: Decimal, layers: &[(u32, Decimal)]) -> SaleRecord {
        let segments = layers
            .iter()
            .map(|&(q, c)| SaleSegment::new(q, c))
            .collect();
        SaleRecord::new(key(price), effective, segments)
    }

    #[test]
    fn test_record_sums_segments() {
        let record = sale(dec!(8), dec!(8), &[(2, dec!(5)), (3, dec!(6))]);
        assert_eq!(record.remaining(), 5);
        assert_eq!(record.margin(), Some(dec!(12))); // 2*3 + 3*2
    }

    #[test]
    fn test_record_keeps_nominal_key_and_frozen_price() {
        let record = sale(dec!(10.004), dec!(7.50), &[(1, dec!(4)), (2, dec!(5))]);
        assert_eq!(record.base_price().as_str(), "10.00");
        assert_eq!(record.effective_price(), dec!(7.50));
        let layers: Vec<_> = record.segments().map(|s| s.quantity).collect();
        assert_eq!(layers, [1, 2]);
    }

    #[test]
    fn test_reversal_margin_walks_oldest_layer_first() {
        let record = sale(dec!(8), dec!(8), &[(2, dec!(5)), (3, dec!(6))]);
        // 2 units at cost 5, then 1 at cost 6
        assert_eq!(record.reversal_margin(3), Some(dec!(8)));
        assert_eq!(record.reversal_margin(10), Some(dec!(12)));
    }

    #[test]
    fn test_reverse_matches_most_recent_sale_first() {
        let mut book = SaleBook::new();
        book.record(sale(dec!(5), dec!(5), &[(2, dec!(1))]));
        book.record(sale(dec!(5), dec!(4), &[(2, dec!(3))]));

        // Most recent record: effective 4, cost 3
        let margin = book.reverse(&key(dec!(5)), 1).unwrap();
        assert_eq!(margin, dec!(1));

        let remaining: Vec<u32> = book.records(&key(dec!(5))).map(SaleRecord::remaining).collect();
        assert_eq!(remaining, vec![1, 2]);
    }

    #[test]
    fn test_reverse_spans_records_and_drops_exhausted() {
        let mut book = SaleBook::new();
        book.record(sale(dec!(5), dec!(5), &[(2, dec!(1))]));
        book.record(sale(dec!(5), dec!(5), &[(1, dec!(2))]));

        // 1 unit at margin 3, then 1 unit at margin 4
        let margin = book.reverse(&key(dec!(5)), 2).unwrap();
        assert_eq!(margin, dec!(7));
        assert_eq!(book.open_quantity(&key(dec!(5))), 1);
        assert_eq!(book.records(&key(dec!(5))).count(), 1);
    }

    #[test]
    fn test_reverse_everything_empties_price() {
        let mut book = SaleBook::new();
        book.record(sale(dec!(5), dec!(5), &[(2, dec!(1))]));
        book.reverse(&key(dec!(5)), 2).unwrap();

        assert_eq!(
            book.reverse(&key(dec!(5)), 1),
            Err(ReturnError::NoOpenSale { price: key(dec!(5)) })
        );
    }

    #[test]
    fn test_reverse_unknown_price() {
        let mut book = SaleBook::new();
        book.record(sale(dec!(5), dec!(5), &[(2, dec!(1))]));
        assert!(matches!(
            book.reverse(&key(dec!(6)), 1),
            Err(ReturnError::NoOpenSale { .. })
        ));
    }

    #[test]
    fn test_reverse_exceeding_open_changes_nothing() {
        let mut book = SaleBook::new();
        book.record(sale(dec!(5), dec!(5), &[(2, dec!(1))]));
        let before = book.clone();

        assert_eq!(
            book.reverse(&key(dec!(5)), 3),
            Err(ReturnError::ExceedsOpen {
                price: key(dec!(5)),
                requested: 3,
                open: 2
            })
        );
        assert_eq!(book, before);
    }

    #[test]
    fn test_colliding_keys_share_bucket() {
        let mut book = SaleBook::new();
        book.record(sale(dec!(2.004), dec!(2.004), &[(1, dec!(1))]));
        assert_eq!(book.open_quantity(&key(dec!(2.001))), 1);
    }
}

//! Core types for stockledger
//!
//! This crate provides the data model that the command engine mutates:
//!
//! - [`PriceKey`] - A nominal sell price rendered to two fraction digits
//! - [`StockQueue`] - FIFO cost layers of saleable stock for one item
//! - [`SaleRecord`] / [`SaleBook`] - Completed sales, indexed by nominal price
//! - [`DiscountStack`] - Active discount percentages, most recent on top
//! - [`ItemState`] - Everything tracked for one catalog item
//! - [`Ledger`] - All items of one processed file, the running profit and
//!   the one-way invalidation latch
//!
//! # Example
//!
//! ```
//! use stockledger_core::{Ledger, PriceKey, SaleRecord};
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = Ledger::new();
//! let item = ledger.item_mut("apple");
//! item.stock.push(10, dec!(5.00));
//!
//! // Sell four units at 8.00 from the oldest cost layers
//! let layers = item.stock.consume(4).unwrap();
//! let record = SaleRecord::new(PriceKey::from_price(dec!(8.00)), dec!(8.00), layers);
//! assert_eq!(record.margin(), Some(dec!(12.00)));
//!
//! assert_eq!(item.stock.total(), 6);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod item;
pub mod ledger;
pub mod number;
pub mod price;
pub mod sale;
pub mod stock;

pub use item::{DiscountStack, ItemState};
pub use ledger::Ledger;
pub use number::{parse_decimal, parse_integer, parse_quantity, NumberError};
pub use price::{apply_discount, format_money, PriceKey};
pub use sale::{ReturnError, SaleBook, SaleRecord, SaleSegment};
pub use stock::{StockBatch, StockError, StockQueue};

// Re-export commonly used external types
pub use rust_decimal::Decimal;

//! Command handlers.
//!
//! Each handler applies one validated command to the ledger. Handlers for
//! mutating commands either succeed completely or return an error without
//! changing stock, sales or profit; the caller decides what an error means
//! for the ledger as a whole.
//!
//! Items are created on first reference, once a command has passed field
//! validation and has a non-zero quantity.

use rust_decimal::Decimal;
use stockledger_core::{apply_discount, format_money, Ledger, PriceKey, SaleRecord, StockError};
use tracing::trace;

use crate::{EngineError, NO_RESULT};

fn stock_error(item: &str) -> impl FnOnce(StockError) -> EngineError + '_ {
    move |source| EngineError::Stock {
        item: item.to_string(),
        source,
    }
}

fn overflow(item: &str) -> EngineError {
    EngineError::Overflow {
        item: item.to_string(),
    }
}

/// `STOCK`: append a purchase lot to the item's stock.
pub fn stock(
    ledger: &mut Ledger,
    item: &str,
    quantity: u32,
    unit_cost: Decimal,
) -> Result<(), EngineError> {
    if quantity == 0 {
        return Ok(());
    }
    ledger.item_mut(item).stock.push(quantity, unit_cost);
    Ok(())
}

/// `ORDER`: sell units from the oldest cost layers.
///
/// The discount in force right now is frozen into the sale record; the
/// record is filed under the undiscounted price so a later `RETURN` quoting
/// that price finds it.
pub fn order(
    ledger: &mut Ledger,
    item: &str,
    quantity: u32,
    price: Decimal,
) -> Result<(), EngineError> {
    if quantity == 0 {
        return Ok(());
    }
    let (state, profit) = ledger.item_with_profit(item);

    let layers = state.stock.layers_for(quantity).map_err(stock_error(item))?;
    let percent = state.discounts.active();
    let effective = apply_discount(price, percent).ok_or_else(|| overflow(item))?;
    let record = SaleRecord::new(PriceKey::from_price(price), effective, layers);
    let total = record
        .margin()
        .and_then(|margin| profit.checked_add(margin))
        .ok_or_else(|| overflow(item))?;

    state.stock.consume(quantity).map_err(stock_error(item))?;
    trace!(
        item,
        quantity,
        price = %record.base_price(),
        effective = %record.effective_price(),
        layers = record.segments().count(),
        percent,
        "sold"
    );
    state.sales.record(record);
    *profit = total;
    Ok(())
}

/// `EXPIRE`: write off units from the oldest cost layers at their cost.
pub fn expire(ledger: &mut Ledger, item: &str, quantity: u32) -> Result<(), EngineError> {
    if quantity == 0 {
        return Ok(());
    }
    let (state, profit) = ledger.item_with_profit(item);

    let layers = state.stock.layers_for(quantity).map_err(stock_error(item))?;
    let total = layers
        .iter()
        .try_fold(*profit, |acc, layer| acc.checked_sub(layer.cost()?))
        .ok_or_else(|| overflow(item))?;

    state.stock.consume(quantity).map_err(stock_error(item))?;
    trace!(item, quantity, "expired");
    *profit = total;
    Ok(())
}

/// `RETURN`: take back the profit of the most recent sales at a nominal
/// price.
///
/// Returned units are not put back into stock.
pub fn return_sale(
    ledger: &mut Ledger,
    item: &str,
    quantity: u32,
    price: Decimal,
) -> Result<(), EngineError> {
    if quantity == 0 {
        return Ok(());
    }
    let (state, profit) = ledger.item_with_profit(item);

    let key = PriceKey::from_price(price);
    let margin = state
        .sales
        .reverse(&key, quantity)
        .map_err(|source| EngineError::Return {
            item: item.to_string(),
            source,
        })?;
    *profit = profit.checked_sub(margin).ok_or_else(|| overflow(item))?;
    trace!(item, quantity, price = %key, %margin, "returned");
    Ok(())
}

/// `DISCOUNT`: activate a discount on top of any existing ones.
pub fn discount(ledger: &mut Ledger, item: &str, percent: i32) {
    let discounts = &mut ledger.item_mut(item).discounts;
    discounts.begin(percent);
    trace!(item, percent, depth = discounts.depth(), "discount started");
}

/// `DISCOUNT_END`: end the most recent discount, if any.
pub fn discount_end(ledger: &mut Ledger, item: &str) {
    let discounts = &mut ledger.item_mut(item).discounts;
    match discounts.end() {
        Some(percent) => trace!(item, percent, depth = discounts.depth(), "discount ended"),
        None => trace!(item, "no discount to end"),
    }
}

/// `CHECK`: one `<item>: <quantity>` line per item, in first-reference
/// order. An invalid ledger reports nothing.
#[must_use]
pub fn check(ledger: &Ledger) -> Vec<String> {
    if ledger.is_invalid() {
        return Vec::new();
    }
    ledger
        .items()
        .map(|(name, state)| format!("{name}: {}", state.quantity()))
        .collect()
}

/// `PROFIT`: the running profit, or [`NO_RESULT`] for an invalid ledger.
#[must_use]
pub fn profit(ledger: &Ledger) -> String {
    if ledger.is_invalid() {
        return NO_RESULT.to_string();
    }
    format!("Profit/Loss: ${}", format_money(ledger.profit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockledger_core::ReturnError;

    #[test]
    fn test_stock_zero_does_not_create_item() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "a", 0, dec!(1.00)).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_order_books_fifo_margin() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "a", 2, dec!(1.00)).unwrap();
        stock(&mut ledger, "a", 5, dec!(3.00)).unwrap();

        order(&mut ledger, "a", 4, dec!(4.00)).unwrap();

        // 2 * (4 - 1) + 2 * (4 - 3)
        assert_eq!(ledger.profit(), dec!(8.00));
        assert_eq!(ledger.item("a").unwrap().quantity(), 3);
    }

    #[test]
    fn test_order_freezes_discount() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "a", 4, dec!(2.00)).unwrap();
        discount(&mut ledger, "a", 25);
        order(&mut ledger, "a", 2, dec!(4.00)).unwrap();
        discount_end(&mut ledger, "a");

        // Sold at 3.00; returning at the nominal 4.00 reverses 2 * (3 - 2)
        assert_eq!(ledger.profit(), dec!(2.00));
        return_sale(&mut ledger, "a", 2, dec!(4.00)).unwrap();
        assert_eq!(ledger.profit(), dec!(0.00));
    }

    #[test]
    fn test_order_insufficient_creates_item_but_changes_nothing() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "a", 1, dec!(2.00)).unwrap();

        let err = order(&mut ledger, "a", 5, dec!(3.00)).unwrap_err();
        assert!(matches!(err, EngineError::Stock { .. }));
        assert_eq!(ledger.item("a").unwrap().quantity(), 1);
        assert_eq!(ledger.profit(), Decimal::ZERO);

        assert!(order(&mut ledger, "b", 1, dec!(3.00)).is_err());
        assert!(ledger.item("b").is_some());
    }

    #[test]
    fn test_expire_writes_off_cost() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "a", 1, dec!(1.00)).unwrap();
        stock(&mut ledger, "a", 3, dec!(2.50)).unwrap();

        expire(&mut ledger, "a", 2).unwrap();

        assert_eq!(ledger.profit(), dec!(-3.50));
        assert_eq!(ledger.item("a").unwrap().quantity(), 2);
    }

    #[test]
    fn test_return_does_not_restock() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "a", 10, dec!(5.00)).unwrap();
        order(&mut ledger, "a", 4, dec!(8.00)).unwrap();
        return_sale(&mut ledger, "a", 4, dec!(8.00)).unwrap();

        assert_eq!(ledger.profit(), Decimal::ZERO);
        assert_eq!(ledger.item("a").unwrap().quantity(), 6);
    }

    #[test]
    fn test_return_without_sale() {
        let mut ledger = Ledger::new();
        let err = return_sale(&mut ledger, "c", 1, dec!(2.00)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Return {
                source: ReturnError::NoOpenSale { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_reports() {
        let mut ledger = Ledger::new();
        stock(&mut ledger, "b", 2, dec!(1.00)).unwrap();
        discount(&mut ledger, "a", 10);
        assert_eq!(check(&ledger), ["b: 2", "a: 0"]);
        assert_eq!(profit(&ledger), "Profit/Loss: $0.00");

        ledger.invalidate("test");
        assert!(check(&ledger).is_empty());
        assert_eq!(profit(&ledger), NO_RESULT);
    }
}

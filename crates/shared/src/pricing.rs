//! Order totals. Every amount is integer cents so totals never drift.

use serde::{Deserialize, Serialize};

use crate::domain::Money;

/// Orders strictly above this subtotal ship for free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money(100_00);
pub const SHIPPING_FEE: Money = Money(10_00);
pub const TAX_RATE_PERCENT: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPrices {
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub total_price: Money,
}

/// Computes order totals from `(unit price, quantity)` lines.
pub fn calc_prices<I>(lines: I) -> OrderPrices
where
    I: IntoIterator<Item = (Money, u32)>,
{
    let items_price: Money = lines
        .into_iter()
        .map(|(price, qty)| price.times(qty))
        .sum();
    let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else {
        SHIPPING_FEE
    };
    // Half-up rounding to the cent.
    let tax_price = Money(
        items_price
            .cents()
            .saturating_mul(TAX_RATE_PERCENT)
            .saturating_add(50)
            / 100,
    );

    OrderPrices {
        items_price,
        tax_price,
        shipping_price,
        total_price: items_price + tax_price + shipping_price,
    }
}

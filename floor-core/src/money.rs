//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic runs on `Decimal` internally and converts to
//! `f64` only at the storage/serialization boundary, rounded to 2 decimal
//! places half-up.

use crate::error::{FloorError, FloorResult};
use crate::manager::ItemInput;
use rust_decimal::prelude::*;
use shared::floor::{Account, AccountItem};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per line (€1,000,000)
const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed absolute quantity per line
const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate an item input before it becomes an immutable line
///
/// Quantity must be non-zero: negative quantities are compensating
/// entries, zero is always a mistake. Prices must be finite,
/// non-negative and bounded.
pub fn validate_item_input(input: &ItemInput) -> FloorResult<()> {
    if !input.unit_price.is_finite() {
        return Err(FloorError::InvalidTransition(format!(
            "unit price must be a finite number, got {}",
            input.unit_price
        )));
    }
    if input.unit_price < 0.0 {
        return Err(FloorError::InvalidTransition(format!(
            "unit price must be non-negative, got {}",
            input.unit_price
        )));
    }
    if input.unit_price > MAX_UNIT_PRICE {
        return Err(FloorError::InvalidTransition(format!(
            "unit price exceeds maximum allowed ({}), got {}",
            MAX_UNIT_PRICE, input.unit_price
        )));
    }
    if input.quantity == 0 {
        return Err(FloorError::InvalidTransition(
            "quantity must be non-zero".to_string(),
        ));
    }
    if input.quantity.abs() > MAX_QUANTITY {
        return Err(FloorError::InvalidTransition(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, input.quantity
        )));
    }
    if input.product_name.trim().is_empty() {
        return Err(FloorError::InvalidTransition(
            "product name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Line total snapshot: quantity × unit_price
pub fn line_total(quantity: i32, unit_price: f64) -> f64 {
    let total = Decimal::from(quantity) * to_decimal(unit_price);
    to_f64(total)
}

/// Sum of line totals
pub fn items_total(items: &[AccountItem]) -> f64 {
    let total: Decimal = items.iter().map(|i| to_decimal(i.total)).sum();
    to_f64(total)
}

/// Recompute an account's stored total from its items
///
/// Called after every append so the stored field can never drift from
/// the item list.
pub fn recalculate_account_total(account: &mut Account) {
    account.total = items_total(&account.items);
}

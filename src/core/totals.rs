use rust_decimal::{Decimal, RoundingStrategy};

use super::error::{InvalidInputKind, TaxError, ValidationError};
use super::types::*;

/// Round a Decimal to `dp` decimal places using half-up (commercial
/// rounding), always carrying exactly `dp` places.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Check line items, returning every problem found (not just the first).
pub fn validate_line_items(items: &[LineItem]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if items.is_empty() {
        errors.push(ValidationError::with_kind(
            "line_items",
            "invoice must have at least one line item",
            InvalidInputKind::EmptyLineItems,
        ));
        return errors;
    }

    for (i, item) in items.iter().enumerate() {
        if item.quantity <= Decimal::ZERO {
            errors.push(ValidationError::with_kind(
                format!("line_items[{i}].quantity"),
                format!("quantity must be positive, got {}", item.quantity),
                InvalidInputKind::NegativeQuantityOrPrice,
            ));
        }
        if item.unit_price < Decimal::ZERO {
            errors.push(ValidationError::with_kind(
                format!("line_items[{i}].unit_price"),
                format!("unit price must not be negative, got {}", item.unit_price),
                InvalidInputKind::NegativeQuantityOrPrice,
            ));
        }
    }

    errors
}

/// Compute invoice totals from line items and a rate determination.
///
/// The subtotal is rounded once at the final sum, not per line, so many
/// small lines cannot drift. `total` is the exact sum of the two rounded
/// components.
pub fn compute_totals(
    items: &[LineItem],
    determination: &TaxDetermination,
) -> Result<InvoiceTotals, TaxError> {
    if let Some(first) = validate_line_items(items).into_iter().next() {
        return Err(first.into_tax_error());
    }

    let rate = determination.applied_rate;
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxError::RateTable(format!(
            "applied rate {rate} must be a fraction between 0 and 1"
        )));
    }

    let mut sum = Decimal::ZERO;
    for (i, item) in items.iter().enumerate() {
        sum = item
            .quantity
            .checked_mul(item.unit_price)
            .and_then(|amount| sum.checked_add(amount))
            .ok_or_else(|| TaxError::Arithmetic(format!("line_items[{i}] overflows subtotal")))?;
    }

    let subtotal = round_half_up(sum, 2);
    let tax_amount = subtotal
        .checked_mul(rate)
        .map(|tax| round_half_up(tax, 2))
        .ok_or_else(|| TaxError::Arithmetic("tax amount overflows".into()))?;
    let total = subtotal
        .checked_add(tax_amount)
        .ok_or_else(|| TaxError::Arithmetic("total overflows".into()))?;

    Ok(InvoiceTotals {
        subtotal,
        tax_amount,
        total,
    })
}

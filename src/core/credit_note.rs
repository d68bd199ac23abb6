use tracing::debug;

use super::error::TaxError;
use super::types::{InvoiceStatus, InvoiceTotals};

impl InvoiceStatus {
    /// Whether a credit note may be issued against an invoice in this status.
    pub fn allows_credit_note(&self) -> bool {
        matches!(self, Self::Sent | Self::Paid | Self::Overdue)
    }
}

/// Totals for a credit note cancelling an issued invoice: every amount is
/// negated, so `total == subtotal + tax_amount` still holds.
///
/// Only sent, paid or overdue invoices can be credited; drafts are edited or
/// discarded instead.
pub fn credit_note_totals(
    original: &InvoiceTotals,
    status: InvoiceStatus,
) -> Result<InvoiceTotals, TaxError> {
    if !status.allows_credit_note() {
        return Err(TaxError::InvalidState(format!(
            "cannot create a credit note for an invoice with status {status:?}"
        )));
    }
    debug!(total = %original.total, "creating credit note totals");
    Ok(InvoiceTotals {
        subtotal: -original.subtotal,
        tax_amount: -original.tax_amount,
        total: -original.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn issued() -> InvoiceTotals {
        InvoiceTotals {
            subtotal: dec!(200.00),
            tax_amount: dec!(42.00),
            total: dec!(242.00),
        }
    }

    #[test]
    fn negates_every_amount() {
        let credit = credit_note_totals(&issued(), InvoiceStatus::Paid).unwrap();
        assert_eq!(credit.subtotal, dec!(-200.00));
        assert_eq!(credit.tax_amount, dec!(-42.00));
        assert_eq!(credit.total, dec!(-242.00));
        assert_eq!(credit.total, credit.subtotal + credit.tax_amount);
    }

    #[test]
    fn allowed_statuses() {
        for status in [InvoiceStatus::Sent, InvoiceStatus::Paid, InvoiceStatus::Overdue] {
            assert!(credit_note_totals(&issued(), status).is_ok());
        }
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Cancelled,
            InvoiceStatus::CreditNote,
        ] {
            assert!(matches!(
                credit_note_totals(&issued(), status),
                Err(TaxError::InvalidState(_))
            ));
        }
    }
}

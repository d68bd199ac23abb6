use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::{InvalidInputKind, TaxError};
use super::rates::{RateTable, RateTableHandle};
use super::totals;
use super::types::*;
use crate::vat::{EuVatFormat, TaxIdValidator};

/// Tax & invoice totals calculator.
///
/// Holds a read-only rate table and a tax-ID validator; both are injected so
/// tests can run against synthetic data. Cloning is cheap and clones share
/// the same table.
///
/// ```
/// use vat_engine::core::*;
/// use rust_decimal_macros::dec;
///
/// let engine = TaxEngine::builtin();
/// let seller = PartyBuilder::business("NL").build();
/// let buyer = PartyBuilder::consumer("NL").build();
/// let lines = [LineItemBuilder::new("Consulting", dec!(2), dec!(50.00)).build()];
///
/// let calc = engine.calculate(&seller, &buyer, &lines).unwrap();
/// assert_eq!(calc.determination.rule_applied, TaxRule::SameCountry);
/// assert_eq!(calc.totals.total, dec!(121.00));
/// ```
#[derive(Clone)]
pub struct TaxEngine {
    rates: Arc<RateTable>,
    validator: Arc<dyn TaxIdValidator>,
}

impl TaxEngine {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self {
            rates,
            validator: Arc::new(EuVatFormat),
        }
    }

    /// Engine over the built-in reference data.
    pub fn builtin() -> Self {
        Self::new(Arc::new(RateTable::builtin()))
    }

    /// Pin the handle's current table for the lifetime of this engine.
    pub fn from_handle(handle: &RateTableHandle) -> Self {
        Self::new(handle.snapshot())
    }

    /// Replace the tax-ID validator used for the reverse-charge check.
    pub fn with_validator(mut self, validator: impl TaxIdValidator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Determine the rate for a seller/buyer pair. The first matching rule
    /// wins:
    ///
    /// 1. unknown country on either side → `UNKNOWN_JURISDICTION`
    /// 2. same country → seller's standard rate
    /// 3. EU → EU, business buyer with well-formed VAT ID → 0%, reverse charge
    /// 4. any other EU → EU → seller's standard rate
    /// 5. EU → non-EU → 0%, export
    /// 6. non-EU seller → seller's standard rate
    pub fn determine_rate(
        &self,
        seller: &PartyInfo,
        buyer: &PartyInfo,
    ) -> Result<TaxDetermination, TaxError> {
        let seller_profile = self.rates.profile(&seller.country_code)?;
        let buyer_profile = self.rates.profile(&buyer.country_code)?;

        let determination = if seller_profile.country_code == buyer_profile.country_code {
            charged(seller_profile, TaxRule::SameCountry)
        } else if seller_profile.is_eu() && buyer_profile.is_eu() {
            if self.qualifies_for_reverse_charge(buyer_profile, buyer) {
                TaxDetermination {
                    applied_rate: Decimal::ZERO,
                    rule_applied: TaxRule::EuB2bReverseCharge,
                    reverse_charge: true,
                }
            } else {
                charged(seller_profile, TaxRule::EuB2cCrossBorder)
            }
        } else if seller_profile.is_eu() {
            TaxDetermination {
                applied_rate: Decimal::ZERO,
                rule_applied: TaxRule::ExportZeroRated,
                reverse_charge: false,
            }
        } else {
            charged(seller_profile, TaxRule::DefaultSellerRate)
        };

        debug!(
            seller = %seller_profile.country_code,
            buyer = %buyer_profile.country_code,
            rule = %determination.rule_applied,
            rate = %determination.applied_rate,
            "determined tax rate"
        );
        Ok(determination)
    }

    /// See [`totals::compute_totals`].
    pub fn compute_totals(
        &self,
        items: &[LineItem],
        determination: &TaxDetermination,
    ) -> Result<InvoiceTotals, TaxError> {
        totals::compute_totals(items, determination)
    }

    /// Determine the rate, compute totals, and attach the explanation and
    /// invoice note.
    pub fn calculate(
        &self,
        seller: &PartyInfo,
        buyer: &PartyInfo,
        items: &[LineItem],
    ) -> Result<InvoiceCalculation, TaxError> {
        let determination = self.determine_rate(seller, buyer)?;
        let totals = self.compute_totals(items, &determination)?;
        Ok(InvoiceCalculation {
            explanation: self.explain(seller, buyer, &determination),
            invoice_note: determination
                .rule_applied
                .invoice_note()
                .map(str::to_string),
            determination,
            totals,
        })
    }

    pub fn calculate_draft(&self, draft: &InvoiceDraft) -> Result<InvoiceCalculation, TaxError> {
        self.calculate(&draft.seller, &draft.buyer, &draft.line_items)
    }

    /// Fail with `MALFORMED_TAX_ID` when a business party lacks a well-formed
    /// VAT ID. Consumers always pass.
    ///
    /// Rate determination never calls this; it is for forms that insist on a
    /// VAT ID from business customers.
    pub fn require_well_formed_tax_id(&self, party: &PartyInfo) -> Result<(), TaxError> {
        if !party.is_business {
            return Ok(());
        }
        let profile = self.rates.profile(&party.country_code)?;
        let Some(tax_id) = party.effective_tax_id() else {
            return Err(TaxError::invalid_input(
                InvalidInputKind::MalformedTaxId,
                "a VAT ID is required for business customers",
            ));
        };
        self.validator
            .check(&profile.country_code, tax_id)
            .map_err(|e| TaxError::invalid_input(InvalidInputKind::MalformedTaxId, e.to_string()))
    }

    /// Human-readable statement of why `determination` applies.
    pub fn explain(
        &self,
        seller: &PartyInfo,
        buyer: &PartyInfo,
        determination: &TaxDetermination,
    ) -> String {
        let from = seller.country_code.trim().to_ascii_uppercase();
        let to = buyer.country_code.trim().to_ascii_uppercase();
        let pct = determination.rate_percent();
        let scheme = self
            .rates
            .get(&from)
            .map_or("VAT", |p| p.vat_scheme.label());

        match determination.rule_applied {
            TaxRule::SameCountry => {
                format!("Seller and buyer are both in {from}: {from} {scheme} applies at {pct}%.")
            }
            TaxRule::EuB2bReverseCharge => format!(
                "Intra-EU B2B supply from {from} to {to}: VAT is reverse charged to the buyer (VAT ID {}), invoiced at 0%.",
                buyer.effective_tax_id().unwrap_or_default()
            ),
            TaxRule::EuB2cCrossBorder => {
                let who = if buyer.is_business {
                    "a business without a valid VAT ID"
                } else {
                    "a consumer"
                };
                format!(
                    "Intra-EU sale from {from} to {who} in {to}: the seller's {from} VAT applies at {pct}%."
                )
            }
            TaxRule::ExportZeroRated => {
                format!("Export from {from} to {to} (outside the EU): zero-rated at 0%.")
            }
            TaxRule::DefaultSellerRate => format!(
                "Seller in {from} is outside the EU: the seller's {scheme} rate of {pct}% applies."
            ),
        }
    }

    fn qualifies_for_reverse_charge(
        &self,
        buyer_profile: &CountryTaxProfile,
        buyer: &PartyInfo,
    ) -> bool {
        let Some(tax_id) = buyer.effective_tax_id() else {
            return false;
        };
        match self.validator.check(&buyer_profile.country_code, tax_id) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    kind = %InvalidInputKind::MalformedTaxId,
                    buyer = %buyer_profile.country_code,
                    error = %e,
                    "buyer VAT ID malformed, falling back to cross-border consumer rate"
                );
                false
            }
        }
    }
}

fn charged(profile: &CountryTaxProfile, rule: TaxRule) -> TaxDetermination {
    TaxDetermination {
        applied_rate: profile.standard_rate,
        rule_applied: rule,
        reverse_charge: false,
    }
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for TaxEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaxEngine")
            .field("countries", &self.rates.len())
            .finish_non_exhaustive()
    }
}

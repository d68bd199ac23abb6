use rust_decimal::Decimal;

use super::error::{InvalidInputKind, TaxError};
use super::types::*;

/// Builder for [`PartyInfo`].
///
/// ```
/// use vat_engine::core::*;
///
/// let buyer = PartyBuilder::business("FR").tax_id("FR12345678901").build();
/// assert!(buyer.is_business);
/// assert_eq!(buyer.effective_tax_id(), Some("FR12345678901"));
///
/// let consumer = PartyBuilder::consumer("FR").tax_id("FR12345678901").build();
/// assert_eq!(consumer.effective_tax_id(), None);
/// ```
pub struct PartyBuilder {
    country_code: String,
    is_business: bool,
    tax_id: Option<String>,
}

impl PartyBuilder {
    /// A business party (B2B).
    pub fn business(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            is_business: true,
            tax_id: None,
        }
    }

    /// A private individual (B2C).
    pub fn consumer(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            is_business: false,
            tax_id: None,
        }
    }

    pub fn tax_id(mut self, id: impl Into<String>) -> Self {
        self.tax_id = Some(id.into());
        self
    }

    pub fn build(self) -> PartyInfo {
        PartyInfo {
            country_code: self.country_code,
            is_business: self.is_business,
            tax_id: self.tax_id,
        }
    }
}

/// Builder for [`LineItem`].
pub struct LineItemBuilder {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    category: Option<String>,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            category: None,
        }
    }

    /// Product category for reduced-rate lookup (e.g. "food").
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            category: self.category,
        }
    }
}

/// Builder for [`InvoiceDraft`].
///
/// ```
/// use vat_engine::core::*;
/// use rust_decimal_macros::dec;
///
/// let draft = InvoiceDraftBuilder::new()
///     .seller(PartyBuilder::business("NL").build())
///     .buyer(PartyBuilder::consumer("US").build())
///     .add_line(LineItemBuilder::new("Widget", dec!(3), dec!(9.99)).build())
///     .build()
///     .unwrap();
///
/// let calc = TaxEngine::builtin().calculate_draft(&draft).unwrap();
/// assert_eq!(calc.determination.rule_applied, TaxRule::ExportZeroRated);
/// ```
#[derive(Default)]
pub struct InvoiceDraftBuilder {
    seller: Option<PartyInfo>,
    buyer: Option<PartyInfo>,
    line_items: Vec<LineItem>,
}

impl InvoiceDraftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seller(mut self, party: PartyInfo) -> Self {
        self.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: PartyInfo) -> Self {
        self.buyer = Some(party);
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.line_items.push(line);
        self
    }

    /// Fails when seller or buyer is missing; line items are checked by the
    /// engine so the caller gets the proper error kind.
    pub fn build(self) -> Result<InvoiceDraft, TaxError> {
        let missing = |who: &str| {
            TaxError::invalid_input(
                InvalidInputKind::UnknownJurisdiction,
                format!("{who} is required"),
            )
        };
        Ok(InvoiceDraft {
            seller: self.seller.ok_or_else(|| missing("seller"))?,
            buyer: self.buyer.ok_or_else(|| missing("buyer"))?,
            line_items: self.line_items,
        })
    }
}

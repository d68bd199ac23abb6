use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Geographic grouping used by the rule resolver. Only `EU` membership
/// influences rate determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    EU,
    Americas,
    AsiaPacific,
    MiddleEastAfrica,
    Other,
}

/// Kind of consumption tax a jurisdiction levies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatScheme {
    /// Value added tax.
    #[serde(rename = "VAT")]
    Vat,
    /// Goods and services tax.
    #[serde(rename = "GST")]
    Gst,
    /// Sales tax levied at sub-national level.
    #[serde(rename = "Sales_Tax")]
    SalesTax,
    /// No consumption tax.
    None,
}

impl VatScheme {
    /// Short label used in explanations ("VAT", "GST", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vat => "VAT",
            Self::Gst => "GST",
            Self::SalesTax => "sales tax",
            Self::None => "no consumption tax",
        }
    }
}

/// Reference tax data for one ISO 3166-1 alpha-2 country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTaxProfile {
    /// ISO 3166-1 alpha-2 code, upper case.
    pub country_code: String,
    pub region: Region,
    /// Standard rate as a decimal fraction (0.21 = 21%).
    pub standard_rate: Decimal,
    /// Reduced rates by product category (e.g. "food" → 0.09).
    #[serde(default)]
    pub reduced_rates: BTreeMap<String, Decimal>,
    pub vat_scheme: VatScheme,
}

impl CountryTaxProfile {
    pub fn new(
        country_code: impl Into<String>,
        region: Region,
        standard_rate: Decimal,
        vat_scheme: VatScheme,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            region,
            standard_rate,
            reduced_rates: BTreeMap::new(),
            vat_scheme,
        }
    }

    /// Add a reduced rate for a product category.
    pub fn with_reduced_rate(mut self, category: impl Into<String>, rate: Decimal) -> Self {
        self.reduced_rates.insert(category.into(), rate);
        self
    }

    pub fn is_eu(&self) -> bool {
        self.region == Region::EU
    }

    /// Reduced rate for `category`, if the country defines one.
    pub fn reduced_rate(&self, category: &str) -> Option<Decimal> {
        self.reduced_rates.get(category).copied()
    }
}

/// Seller or buyer as seen by the tax engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    /// Whether the party acts as a business (B2B) rather than a consumer.
    pub is_business: bool,
    /// VAT identifier including the country prefix (e.g. "FR12345678901").
    /// Ignored for reverse charge when `is_business` is false.
    #[serde(default)]
    pub tax_id: Option<String>,
}

impl PartyInfo {
    /// The tax ID relevant for reverse charge: only a business's ID counts.
    pub fn effective_tax_id(&self) -> Option<&str> {
        if !self.is_business {
            return None;
        }
        self.tax_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// A single invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Invoiced quantity, must be positive.
    pub quantity: Decimal,
    /// Net price per unit, must not be negative.
    pub unit_price: Decimal,
    /// Product category for reduced-rate lookup.
    #[serde(default)]
    pub category: Option<String>,
}

impl LineItem {
    /// Unrounded line amount (`quantity × unit_price`).
    pub fn amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Which rule of the decision table produced a determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxRule {
    /// Seller and buyer in the same country, seller's standard rate.
    SameCountry,
    /// EU cross-border sale to a VAT-registered business, 0% with reverse charge.
    #[serde(rename = "EU_B2B_REVERSE_CHARGE")]
    EuB2bReverseCharge,
    /// EU cross-border sale to a consumer (or unidentified business), seller's rate.
    #[serde(rename = "EU_B2C_CROSS_BORDER")]
    EuB2cCrossBorder,
    /// EU seller, non-EU buyer, 0%.
    ExportZeroRated,
    /// Non-EU seller selling abroad, seller's standard rate.
    DefaultSellerRate,
}

impl TaxRule {
    /// Stable upper-case code, identical to the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SameCountry => "SAME_COUNTRY",
            Self::EuB2bReverseCharge => "EU_B2B_REVERSE_CHARGE",
            Self::EuB2cCrossBorder => "EU_B2C_CROSS_BORDER",
            Self::ExportZeroRated => "EXPORT_ZERO_RATED",
            Self::DefaultSellerRate => "DEFAULT_SELLER_RATE",
        }
    }

    /// Parse from the upper-case code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SAME_COUNTRY" => Some(Self::SameCountry),
            "EU_B2B_REVERSE_CHARGE" => Some(Self::EuB2bReverseCharge),
            "EU_B2C_CROSS_BORDER" => Some(Self::EuB2cCrossBorder),
            "EXPORT_ZERO_RATED" => Some(Self::ExportZeroRated),
            "DEFAULT_SELLER_RATE" => Some(Self::DefaultSellerRate),
            _ => None,
        }
    }

    /// Note that must be printed on the invoice for this rule, if any.
    pub fn invoice_note(&self) -> Option<&'static str> {
        match self {
            Self::EuB2bReverseCharge => {
                Some("VAT reverse charged: the customer is liable for VAT (Art. 196 Directive 2006/112/EC).")
            }
            Self::ExportZeroRated => {
                Some("Zero-rated export outside the EU (Art. 146 Directive 2006/112/EC).")
            }
            _ => None,
        }
    }
}

impl fmt::Display for TaxRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of rate determination for one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetermination {
    /// Rate as a decimal fraction, uniform across all lines.
    pub applied_rate: Decimal,
    pub rule_applied: TaxRule,
    /// True when VAT liability shifts to the buyer.
    pub reverse_charge: bool,
}

impl TaxDetermination {
    /// Applied rate expressed as a percentage (0.21 → 21).
    pub fn rate_percent(&self) -> Decimal {
        (self.applied_rate * Decimal::ONE_HUNDRED).normalize()
    }
}

/// Invoice totals, each rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line amounts.
    pub subtotal: Decimal,
    /// `subtotal × applied_rate`.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount`.
    pub total: Decimal,
}

/// Everything the invoice form needs to display before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCalculation {
    pub determination: TaxDetermination,
    pub totals: InvoiceTotals,
    /// Human-readable statement of the applied rule.
    pub explanation: String,
    /// Legally required invoice note (reverse charge, export).
    pub invoice_note: Option<String>,
}

/// Raw invoice input as received at a JSON boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub seller: PartyInfo,
    pub buyer: PartyInfo,
    pub line_items: Vec<LineItem>,
}

/// Lifecycle status of a persisted invoice (as reported by the backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
    CreditNote,
}

//! Read-only VAT assistant.
//!
//! Answers "which rate applies" and "what are the rates in X" questions for
//! the dashboard's VAT helper by querying the engine. Nothing here mutates
//! state or performs I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{PartyInfo, TaxEngine, TaxError, TaxRule, VatScheme};

/// A structured "which rate applies" question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    pub seller_country: String,
    pub buyer_country: String,
    pub buyer_is_business: bool,
    #[serde(default)]
    pub buyer_tax_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateAnswer {
    pub rule: TaxRule,
    /// Applied rate as a percentage (21 for 21%).
    pub rate_percent: Decimal,
    pub reverse_charge: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryAnswer {
    pub country_code: String,
    pub vat_scheme: VatScheme,
    pub in_eu: bool,
    pub standard_rate_percent: Decimal,
    /// Category → percentage, in category order.
    pub reduced_rates_percent: Vec<(String, Decimal)>,
    pub text: String,
}

/// Explainer over a [`TaxEngine`].
#[derive(Debug, Clone)]
pub struct VatAssistant {
    engine: TaxEngine,
}

impl VatAssistant {
    pub fn new(engine: TaxEngine) -> Self {
        Self { engine }
    }

    pub fn answer(&self, query: &RateQuery) -> Result<RateAnswer, TaxError> {
        let seller = PartyInfo {
            country_code: query.seller_country.clone(),
            is_business: true,
            tax_id: None,
        };
        let buyer = PartyInfo {
            country_code: query.buyer_country.clone(),
            is_business: query.buyer_is_business,
            tax_id: query.buyer_tax_id.clone(),
        };
        let determination = self.engine.determine_rate(&seller, &buyer)?;
        let mut text = self.engine.explain(&seller, &buyer, &determination);
        if let Some(note) = determination.rule_applied.invoice_note() {
            text.push_str(" Invoice note: ");
            text.push_str(note);
        }
        Ok(RateAnswer {
            rule: determination.rule_applied,
            rate_percent: determination.rate_percent(),
            reverse_charge: determination.reverse_charge,
            text,
        })
    }

    pub fn describe_country(&self, country_code: &str) -> Result<CountryAnswer, TaxError> {
        let profile = self.engine.rates().profile(country_code)?;
        let standard = percent(profile.standard_rate);
        let reduced: Vec<(String, Decimal)> = profile
            .reduced_rates
            .iter()
            .map(|(category, rate)| (category.clone(), percent(*rate)))
            .collect();

        let mut text = format!(
            "{} levies {} at a standard rate of {}%",
            profile.country_code,
            profile.vat_scheme.label(),
            standard
        );
        if !reduced.is_empty() {
            let list: Vec<String> = reduced
                .iter()
                .map(|(category, pct)| format!("{category} {pct}%"))
                .collect();
            text.push_str(&format!(" (reduced: {})", list.join(", ")));
        }
        text.push_str(if profile.is_eu() {
            "; it is an EU member state."
        } else {
            "; it is outside the EU."
        });

        Ok(CountryAnswer {
            country_code: profile.country_code.clone(),
            vat_scheme: profile.vat_scheme,
            in_eu: profile.is_eu(),
            standard_rate_percent: standard,
            reduced_rates_percent: reduced,
            text,
        })
    }
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

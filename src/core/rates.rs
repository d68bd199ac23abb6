//! Country tax reference data.
//!
//! A [`RateTable`] is immutable once built. Runtime updates go through
//! [`RateTableHandle::publish`], which swaps the whole table atomically so a
//! calculation never observes a half-updated table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use super::error::{InvalidInputKind, TaxError};
use super::types::{CountryTaxProfile, Region, VatScheme};

/// Immutable set of [`CountryTaxProfile`]s keyed by upper-case country code.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    profiles: BTreeMap<String, CountryTaxProfile>,
}

impl RateTable {
    /// Build a table from profiles, rejecting duplicates, malformed codes and
    /// rates outside `[0, 1]`.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = CountryTaxProfile>,
    ) -> Result<Self, TaxError> {
        let mut map = BTreeMap::new();
        for mut profile in profiles {
            let code = normalize_country_code(&profile.country_code);
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(TaxError::RateTable(format!(
                    "'{}' is not an ISO 3166-1 alpha-2 country code",
                    profile.country_code
                )));
            }
            check_rate(&code, "standard", profile.standard_rate)?;
            for (category, rate) in &profile.reduced_rates {
                check_rate(&code, category, *rate)?;
            }
            profile.country_code = code.clone();
            if map.insert(code.clone(), profile).is_some() {
                return Err(TaxError::RateTable(format!(
                    "duplicate profile for country {code}"
                )));
            }
        }
        Ok(Self { profiles: map })
    }

    /// Built-in reference data: all EU member states plus common non-EU
    /// trading partners.
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|&(code, region, rate, scheme)| {
                let mut profile = CountryTaxProfile::new(code, region, rate, scheme);
                for &(cc, category, reduced) in BUILTIN_REDUCED {
                    if cc == code {
                        profile.reduced_rates.insert(category.to_string(), reduced);
                    }
                }
                (code.to_string(), profile)
            })
            .collect();
        Self { profiles }
    }

    /// Look up a profile. The code is trimmed and upper-cased first.
    pub fn get(&self, country_code: &str) -> Option<&CountryTaxProfile> {
        self.profiles.get(&normalize_country_code(country_code))
    }

    /// Like [`RateTable::get`] but fails with `UNKNOWN_JURISDICTION`.
    pub fn profile(&self, country_code: &str) -> Result<&CountryTaxProfile, TaxError> {
        if country_code.trim().is_empty() {
            return Err(TaxError::invalid_input(
                InvalidInputKind::UnknownJurisdiction,
                "country code is missing",
            ));
        }
        self.get(country_code).ok_or_else(|| {
            TaxError::invalid_input(
                InvalidInputKind::UnknownJurisdiction,
                format!("no tax profile for country '{}'", country_code.trim()),
            )
        })
    }

    pub fn contains(&self, country_code: &str) -> bool {
        self.get(country_code).is_some()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles in country-code order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryTaxProfile> {
        self.profiles.values()
    }

    /// Country codes of all EU members in the table.
    pub fn eu_members(&self) -> Vec<&str> {
        self.iter()
            .filter(|p| p.is_eu())
            .map(|p| p.country_code.as_str())
            .collect()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Trim and upper-case a country code.
pub fn normalize_country_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn check_rate(code: &str, label: &str, rate: Decimal) -> Result<(), TaxError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxError::RateTable(format!(
            "{code} {label} rate {rate} must be a fraction between 0 and 1"
        )));
    }
    Ok(())
}

/// Shared, atomically replaceable rate table.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it for the
/// whole calculation; writers replace the table with
/// [`publish`](Self::publish).
pub struct RateTableHandle {
    current: ArcSwap<RateTable>,
}

impl RateTableHandle {
    pub fn new(table: RateTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// The table currently in effect.
    pub fn snapshot(&self) -> Arc<RateTable> {
        self.current.load_full()
    }

    /// Replace the whole table, returning the previous one.
    pub fn publish(&self, table: RateTable) -> Arc<RateTable> {
        let countries = table.len();
        let previous = self.current.swap(Arc::new(table));
        info!(countries, "published new rate table");
        previous
    }
}

impl Default for RateTableHandle {
    fn default() -> Self {
        Self::new(RateTable::builtin())
    }
}

impl fmt::Debug for RateTableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateTableHandle")
            .field("countries", &self.current.load().len())
            .finish()
    }
}

use Region::{Americas, AsiaPacific, EU, MiddleEastAfrica, Other};
use VatScheme::{Gst, SalesTax, Vat};

/// Standard rates. Sorted by country code.
static BUILTIN_PROFILES: &[(&str, Region, Decimal, VatScheme)] = &[
    ("AE", MiddleEastAfrica, dec!(0.05), Vat),
    ("AT", EU, dec!(0.20), Vat),
    ("AU", AsiaPacific, dec!(0.10), Gst),
    ("BE", EU, dec!(0.21), Vat),
    ("BG", EU, dec!(0.20), Vat),
    ("CA", Americas, dec!(0.05), Gst),
    ("CH", Other, dec!(0.081), Vat),
    ("CN", AsiaPacific, dec!(0.13), Vat),
    ("CY", EU, dec!(0.19), Vat),
    ("CZ", EU, dec!(0.21), Vat),
    ("DE", EU, dec!(0.19), Vat),
    ("DK", EU, dec!(0.25), Vat),
    ("EE", EU, dec!(0.24), Vat),
    ("ES", EU, dec!(0.21), Vat),
    ("FI", EU, dec!(0.255), Vat),
    ("FR", EU, dec!(0.20), Vat),
    ("GB", Other, dec!(0.20), Vat),
    ("GR", EU, dec!(0.24), Vat),
    ("HR", EU, dec!(0.25), Vat),
    ("HU", EU, dec!(0.27), Vat),
    ("IE", EU, dec!(0.23), Vat),
    ("IN", AsiaPacific, dec!(0.18), Gst),
    ("IS", Other, dec!(0.24), Vat),
    ("IT", EU, dec!(0.22), Vat),
    ("JP", AsiaPacific, dec!(0.10), Vat),
    ("LT", EU, dec!(0.21), Vat),
    ("LU", EU, dec!(0.17), Vat),
    ("LV", EU, dec!(0.21), Vat),
    ("MT", EU, dec!(0.18), Vat),
    ("MX", Americas, dec!(0.16), Vat),
    ("NL", EU, dec!(0.21), Vat),
    ("NO", Other, dec!(0.25), Vat),
    ("NZ", AsiaPacific, dec!(0.15), Gst),
    ("PL", EU, dec!(0.23), Vat),
    ("PT", EU, dec!(0.23), Vat),
    ("RO", EU, dec!(0.21), Vat),
    ("SA", MiddleEastAfrica, dec!(0.15), Vat),
    ("SE", EU, dec!(0.25), Vat),
    ("SG", AsiaPacific, dec!(0.09), Gst),
    ("SI", EU, dec!(0.22), Vat),
    ("SK", EU, dec!(0.23), Vat),
    ("TR", Other, dec!(0.20), Vat),
    ("US", Americas, dec!(0), SalesTax),
    ("ZA", MiddleEastAfrica, dec!(0.15), Vat),
];

static BUILTIN_REDUCED: &[(&str, &str, Decimal)] = &[
    ("AT", "food", dec!(0.10)),
    ("BE", "food", dec!(0.06)),
    ("DE", "books", dec!(0.07)),
    ("DE", "food", dec!(0.07)),
    ("ES", "food", dec!(0.10)),
    ("FR", "books", dec!(0.055)),
    ("FR", "food", dec!(0.055)),
    ("GB", "energy", dec!(0.05)),
    ("IT", "food", dec!(0.10)),
    ("NL", "books", dec!(0.09)),
    ("NL", "food", dec!(0.09)),
];

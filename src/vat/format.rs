//! EU VAT identifier format validation.

use std::fmt;

use tracing::trace;

/// Error returned when a VAT ID fails format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatFormatError {
    /// The invalid input value.
    pub value: String,
    /// Why the value failed validation.
    pub reason: String,
}

impl VatFormatError {
    fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for VatFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid VAT ID '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for VatFormatError {}

/// A format-checked VAT identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatId {
    /// VAT prefix ("EL" for Greece, otherwise the ISO country code).
    pub prefix: String,
    /// National number without the prefix.
    pub number: String,
}

impl fmt::Display for VatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.number)
    }
}

/// Decides whether a party's tax ID is well-formed for its country.
///
/// Implementations must be pure; the engine calls them during rate
/// determination.
pub trait TaxIdValidator: Send + Sync {
    fn check(&self, country_code: &str, tax_id: &str) -> Result<(), VatFormatError>;
}

impl<F> TaxIdValidator for F
where
    F: Fn(&str, &str) -> Result<(), VatFormatError> + Send + Sync,
{
    fn check(&self, country_code: &str, tax_id: &str) -> Result<(), VatFormatError> {
        self(country_code, tax_id)
    }
}

/// Per-country EU VAT ID patterns. The ID prefix must belong to the party's
/// country.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuVatFormat;

impl TaxIdValidator for EuVatFormat {
    fn check(&self, country_code: &str, tax_id: &str) -> Result<(), VatFormatError> {
        let id = validate_vat_format(tax_id)?;
        let expected = vat_prefix_for(country_code);
        if id.prefix != expected {
            return Err(VatFormatError::new(
                tax_id,
                format!(
                    "prefix {} does not match country {}",
                    id.prefix,
                    country_code.trim().to_ascii_uppercase()
                ),
            ));
        }
        Ok(())
    }
}

/// Accepts any two-letter prefix followed by 2 to 12 alphanumerics.
///
/// For jurisdictions or test setups where the per-country grammar is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientVatFormat;

impl TaxIdValidator for LenientVatFormat {
    fn check(&self, _country_code: &str, tax_id: &str) -> Result<(), VatFormatError> {
        let id = normalize_vat_id(tax_id);
        let ok = id.is_ascii()
            && id.len() >= 4
            && id.len() <= 14
            && id[..2].chars().all(|c| c.is_ascii_uppercase())
            && id[2..].chars().all(|c| c.is_ascii_alphanumeric());
        if ok {
            Ok(())
        } else {
            Err(VatFormatError::new(
                tax_id,
                "expected 2-letter prefix and alphanumeric body",
            ))
        }
    }
}

/// VAT prefix used by a country. Greece files under "EL".
pub fn vat_prefix_for(country_code: &str) -> String {
    let code = country_code.trim().to_ascii_uppercase();
    if code == "GR" { "EL".to_string() } else { code }
}

/// Strip whitespace, dots and dashes, and upper-case.
pub fn normalize_vat_id(vat_id: &str) -> String {
    vat_id
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

type NumberPattern = fn(&str) -> bool;

fn digits(n: &str) -> bool {
    n.chars().all(|c| c.is_ascii_digit())
}

static PATTERNS: &[(&str, NumberPattern)] = &[
    ("AT", |n| n.len() == 9 && n.starts_with('U') && digits(&n[1..])),
    ("BE", |n| n.len() == 10 && digits(n)),
    ("BG", |n| (n.len() == 9 || n.len() == 10) && digits(n)),
    ("CY", |n| {
        n.len() == 9 && digits(&n[..8]) && n.as_bytes()[8].is_ascii_alphabetic()
    }),
    ("CZ", |n| (8..=10).contains(&n.len()) && digits(n)),
    ("DE", |n| n.len() == 9 && digits(n) && n.as_bytes()[0] != b'0'),
    ("DK", |n| n.len() == 8 && digits(n)),
    ("EE", |n| n.len() == 9 && digits(n)),
    ("EL", |n| n.len() == 9 && digits(n)),
    ("ES", |n| n.len() == 9 && n.chars().all(|c| c.is_ascii_alphanumeric())),
    ("FI", |n| n.len() == 8 && digits(n)),
    ("FR", |n| {
        n.len() == 11 && n[..2].chars().all(|c| c.is_ascii_alphanumeric()) && digits(&n[2..])
    }),
    ("HR", |n| n.len() == 11 && digits(n)),
    ("HU", |n| n.len() == 8 && digits(n)),
    ("IE", |n| {
        (n.len() == 8 || n.len() == 9) && n.chars().all(|c| c.is_ascii_alphanumeric())
    }),
    ("IT", |n| n.len() == 11 && digits(n)),
    ("LT", |n| (n.len() == 9 || n.len() == 12) && digits(n)),
    ("LU", |n| n.len() == 8 && digits(n)),
    ("LV", |n| n.len() == 11 && digits(n)),
    ("MT", |n| n.len() == 8 && digits(n)),
    ("NL", |n| {
        n.len() == 12 && digits(&n[..9]) && n.as_bytes()[9] == b'B' && digits(&n[10..])
    }),
    ("PL", |n| n.len() == 10 && digits(n)),
    ("PT", |n| n.len() == 9 && digits(n)),
    ("RO", |n| (2..=10).contains(&n.len()) && digits(n)),
    ("SE", |n| n.len() == 12 && digits(n)),
    ("SI", |n| n.len() == 8 && digits(n)),
    ("SK", |n| n.len() == 10 && digits(n)),
];

/// Validate an EU VAT ID by format (no network call).
///
/// The input must include the 2-letter prefix (e.g. "DE123456789"). Spaces,
/// dots and dashes are ignored. Returns the prefix/number split on success.
pub fn validate_vat_format(vat_id: &str) -> Result<VatId, VatFormatError> {
    let id = normalize_vat_id(vat_id);
    if id.len() < 4 {
        return Err(VatFormatError::new(
            vat_id,
            "too short, must be at least 4 characters",
        ));
    }
    if !id.is_ascii() {
        return Err(VatFormatError::new(vat_id, "contains non-ASCII characters"));
    }

    let (prefix, number) = id.split_at(2);
    let Some(&(_, pattern)) = PATTERNS.iter().find(|(code, _)| *code == prefix) else {
        return Err(VatFormatError::new(
            vat_id,
            format!("unknown country prefix '{prefix}'"),
        ));
    };

    if !pattern(number) {
        trace!(prefix, "VAT number does not match country pattern");
        return Err(VatFormatError::new(
            vat_id,
            format!("invalid format for country {prefix}"),
        ));
    }

    Ok(VatId {
        prefix: prefix.to_string(),
        number: number.to_string(),
    })
}

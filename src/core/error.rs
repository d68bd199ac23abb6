use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classifies caller input rejected by the engine.
///
/// The host UI maps each kind to a message and blocks submission until the
/// input is corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidInputKind {
    /// Country code absent from the rate table (or missing entirely).
    UnknownJurisdiction,
    /// No line items were supplied.
    EmptyLineItems,
    /// A quantity is zero or negative, or a unit price is negative.
    NegativeQuantityOrPrice,
    /// A tax ID failed the format check. Never returned by rate determination,
    /// which degrades to consumer treatment instead.
    MalformedTaxId,
}

impl InvalidInputKind {
    /// Stable upper-case code, identical to the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownJurisdiction => "UNKNOWN_JURISDICTION",
            Self::EmptyLineItems => "EMPTY_LINE_ITEMS",
            Self::NegativeQuantityOrPrice => "NEGATIVE_QUANTITY_OR_PRICE",
            Self::MalformedTaxId => "MALFORMED_TAX_ID",
        }
    }
}

impl fmt::Display for InvalidInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors that can occur during tax determination or totals calculation.
///
/// All variants are synchronous and deterministic; retrying with the same
/// input yields the same error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaxError {
    /// Caller supplied input the engine cannot process.
    #[error("invalid input [{kind}]: {message}")]
    InvalidInput {
        kind: InvalidInputKind,
        message: String,
    },

    /// Rate table data is inconsistent or could not be parsed.
    #[error("rate table error: {0}")]
    RateTable(String),

    /// Configuration value missing, malformed, or unreadable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Amounts exceed the representable decimal range.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Invoice number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// Operation not allowed for the invoice's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl TaxError {
    pub fn invalid_input(kind: InvalidInputKind, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            kind,
            message: message.into(),
        }
    }

    /// The input kind, if this is an [`TaxError::InvalidInput`].
    pub fn kind(&self) -> Option<InvalidInputKind> {
        match self {
            Self::InvalidInput { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path to the invalid field (e.g. "line_items[2].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Input kind code if applicable (e.g. "NEGATIVE_QUANTITY_OR_PRICE").
    pub rule: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule code.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error tagged with an input kind.
    pub fn with_kind(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: InvalidInputKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(kind.code().to_string()),
        }
    }

    /// Convert into the hard error surfaced by the engine.
    pub fn into_tax_error(self) -> TaxError {
        let kind = match self.rule.as_deref() {
            Some("UNKNOWN_JURISDICTION") => InvalidInputKind::UnknownJurisdiction,
            Some("EMPTY_LINE_ITEMS") => InvalidInputKind::EmptyLineItems,
            Some("MALFORMED_TAX_ID") => InvalidInputKind::MalformedTaxId,
            _ => InvalidInputKind::NegativeQuantityOrPrice,
        };
        TaxError::invalid_input(kind, format!("{}: {}", self.field, self.message))
    }
}

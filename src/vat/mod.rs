//! VAT identifier validation.
//!
//! The engine only needs to know whether a buyer's VAT ID is well-formed
//! before granting reverse charge. That check is a [`TaxIdValidator`], so
//! hosts can swap in stricter or looser grammars per jurisdiction.
//!
//! # Example
//!
//! ```
//! use vat_engine::vat::*;
//!
//! assert!(validate_vat_format("DE123456789").is_ok());
//! assert!(EuVatFormat.check("FR", "FR12345678901").is_ok());
//! assert!(EuVatFormat.check("FR", "DE123456789").is_err());
//! ```

mod format;

pub use format::{
    EuVatFormat, LenientVatFormat, TaxIdValidator, VatFormatError, VatId, normalize_vat_id,
    validate_vat_format, vat_prefix_for,
};

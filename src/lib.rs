//! # vat-engine
//!
//! Invoice VAT determination and totals for merchant invoicing: picks the
//! applicable rate for a seller/buyer pair (same country, EU reverse charge,
//! EU cross-border consumer sale, export, non-EU seller) and computes the
//! subtotal, tax and total.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Rates are decimal fractions (`0.21` = 21%).
//!
//! ## Quick Start
//!
//! ```rust
//! use vat_engine::core::*;
//! use rust_decimal_macros::dec;
//!
//! let engine = TaxEngine::builtin();
//! let seller = PartyBuilder::business("DE").tax_id("DE123456789").build();
//! let buyer = PartyBuilder::business("FR").tax_id("FR12345678901").build();
//! let lines = [LineItemBuilder::new("Consulting", dec!(10), dec!(150)).build()];
//!
//! let calc = engine.calculate(&seller, &buyer, &lines).unwrap();
//! assert_eq!(calc.determination.rule_applied, TaxRule::EuB2bReverseCharge);
//! assert!(calc.determination.reverse_charge);
//! assert_eq!(calc.totals.total, dec!(1500.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Rate tables, tax engine, VAT ID formats, assistant, numbering |
//! | `config` | `.env`/environment config, YAML/JSON rate tables, tracing setup |
//! | `vies` | Async EU VIES registration check |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod vat;

#[cfg(feature = "core")]
pub mod assistant;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "vies")]
pub mod vies;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

//! Core tax types, rate tables, and the tax engine.
//!
//! This module provides the reference rate data, the rule resolver that
//! picks a rate for a seller/buyer pair, and the totals calculator.

mod builder;
mod credit_note;
mod engine;
mod error;
mod numbering;
mod rates;
mod totals;
mod types;

pub use builder::*;
pub use credit_note::credit_note_totals;
pub use engine::TaxEngine;
pub use error::*;
pub use numbering::*;
pub use rates::*;
pub use totals::*;
pub use types::*;

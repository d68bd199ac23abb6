use chrono::{Datelike, NaiveDate};

use super::error::TaxError;

/// Per-year invoice counter rendered as `{prefix}-{year}-{counter}`.
///
/// ```
/// use vat_engine::core::InvoiceNumberSequence;
///
/// let mut numbers = InvoiceNumberSequence::continue_after("INV", 2026, Some("INV-2026-000041"));
/// assert_eq!(numbers.next_number(), "INV-2026-000042");
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceNumberSequence {
    prefix: String,
    year: i32,
    counter: u64,
    width: usize,
}

impl InvoiceNumberSequence {
    /// Counter width used unless overridden ("000001").
    pub const DEFAULT_PADDING: usize = 6;

    pub fn new(prefix: impl Into<String>, year: i32) -> Self {
        Self::starting_at(prefix, year, 1)
    }

    /// `counter` is the value the next call to [`next_number`](Self::next_number) issues.
    pub fn starting_at(prefix: impl Into<String>, year: i32, counter: u64) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            counter,
            width: Self::DEFAULT_PADDING,
        }
    }

    /// Resume numbering from the last invoice number stored for `prefix`.
    ///
    /// A number from another prefix or year, or one whose counter is not
    /// numeric, is ignored and the year starts over at 1.
    pub fn continue_after(prefix: impl Into<String>, year: i32, last_issued: Option<&str>) -> Self {
        let prefix = prefix.into();
        let counter = last_issued
            .and_then(|last| parse_counter(last, &prefix, year))
            .map_or(1, |n| n.saturating_add(1));
        Self::starting_at(prefix, year, counter)
    }

    pub fn with_padding(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Issue a number and move the counter on.
    pub fn next_number(&mut self) -> String {
        let issued = self.render(self.counter);
        self.counter = self.counter.saturating_add(1);
        issued
    }

    pub fn peek(&self) -> String {
        self.render(self.counter)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next_raw(&self) -> u64 {
        self.counter
    }

    /// Switch to a later year; the counter restarts at 1.
    pub fn advance_year(&mut self, year: i32) -> Result<(), TaxError> {
        if year <= self.year {
            return Err(TaxError::Numbering(format!(
                "cannot move numbering from {} back to {year}",
                self.year
            )));
        }
        self.year = year;
        self.counter = 1;
        Ok(())
    }

    /// Roll over when `date` lies in a later year than the sequence.
    /// Returns whether a rollover happened.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        date.year() > self.year && self.advance_year(date.year()).is_ok()
    }

    fn render(&self, counter: u64) -> String {
        format!("{}-{}-{counter:0>w$}", self.prefix, self.year, w = self.width)
    }
}

fn parse_counter(number: &str, prefix: &str, year: i32) -> Option<u64> {
    let rest = number.trim().strip_prefix(prefix)?.strip_prefix('-')?;
    let (y, counter) = rest.split_once('-')?;
    if y.parse::<i32>().ok()? != year || !counter.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    counter.parse().ok()
}

// Stay date range handling: nights are whole calendar-day blocks between
// check-in and check-out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::PricingError;

/// Date format accepted by [`DateRange::parse`], e.g. "2025-06-11".
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A check-in / check-out pair. A range with `check_out <= check_in` is
/// representable (nights() returns 0) but is rejected by the engine before
/// any pricing math runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    /// Parse a range from "YYYY-MM-DD" strings. Missing or malformed dates
    /// surface as a validation error rather than a zero-night booking.
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, PricingError> {
        let check_in = NaiveDate::parse_from_str(check_in, DATE_FORMAT).map_err(|e| {
            PricingError::InvalidDateRange(format!("unparseable check-in '{}': {}", check_in, e))
        })?;
        let check_out = NaiveDate::parse_from_str(check_out, DATE_FORMAT).map_err(|e| {
            PricingError::InvalidDateRange(format!("unparseable check-out '{}': {}", check_out, e))
        })?;
        Ok(Self::new(check_in, check_out))
    }

    /// Number of nights in the stay: max(0, check_out - check_in) in days.
    pub fn nights(&self) -> u32 {
        (self.check_out - self.check_in).num_days().max(0) as u32
    }

    /// A range is billable only when it spans at least one night.
    pub fn is_valid(&self) -> bool {
        self.check_out > self.check_in
    }

    /// Iterate the nights of the stay, one date per night starting at
    /// check-in. Empty for invalid ranges.
    pub fn iter_nights(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.check_in
            .iter_days()
            .take_while(move |day| *day < self.check_out)
    }

    /// Ensure the range spans at least one night.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(PricingError::InvalidDateRange(format!(
                "check-out {} must be after check-in {}",
                self.check_out, self.check_in
            )))
        }
    }
}

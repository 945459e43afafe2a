// Nightly base-price strategies. The original marketplace modeled these as a
// class hierarchy behind a runtime registry; here they are a closed enum
// dispatched by one pure function so every variant is checked at compile time.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::engine::PricingError;
use crate::property::{GuestSelection, PropertyRate};

/// Amenity keywords that qualify a property for the premium uplift.
/// Matched case-insensitively as substrings of each amenity tag.
pub const LUXURY_AMENITY_KEYWORDS: &[&str] = &["spa", "pool", "concierge", "ocean view"];

/// The named pricing strategy variants exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Standard,
    Dynamic,
    LongTerm,
    Premium,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Standard => "standard",
            StrategyKind::Dynamic => "dynamic",
            StrategyKind::LongTerm => "long-term",
            StrategyKind::Premium => "premium",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = PricingError;

    // Unknown identifiers are a configuration mistake and must fail loudly,
    // never fall back to the standard strategy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(StrategyKind::Standard),
            "dynamic" => Ok(StrategyKind::Dynamic),
            "long-term" => Ok(StrategyKind::LongTerm),
            "premium" => Ok(StrategyKind::Premium),
            other => Err(PricingError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Calendar season, derived from the month of each night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

/// Per-season multipliers applied by the dynamic strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalMultipliers {
    pub spring: Decimal,
    pub summer: Decimal,
    pub fall: Decimal,
    pub winter: Decimal,
}

impl SeasonalMultipliers {
    pub fn for_season(&self, season: Season) -> Decimal {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Fall => self.fall,
            Season::Winter => self.winter,
        }
    }

    /// Multiplier for the season the given night falls in.
    pub fn for_date(&self, date: NaiveDate) -> Decimal {
        self.for_season(Season::from_month(date.month()))
    }
}

impl Default for SeasonalMultipliers {
    fn default() -> Self {
        Self {
            spring: Decimal::ONE,
            summer: Decimal::new(125, 2),
            fall: Decimal::ONE,
            winter: Decimal::new(85, 2),
        }
    }
}

/// Tunables consumed by the dynamic strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub weekend_multiplier: Decimal,
    pub seasonal: SeasonalMultipliers,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            weekend_multiplier: Decimal::new(12, 1),
            seasonal: SeasonalMultipliers::default(),
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Compute the effective nightly base price for the stay.
///
/// The dynamic variant prices every night individually and divides the exact
/// sum by the night count; multiplying the returned figure back by the night
/// count reconstructs the per-night sum to within minor-unit precision. Do
/// not price a single sample night and extrapolate.
pub fn base_price_per_night(
    kind: StrategyKind,
    property: &PropertyRate,
    range: &DateRange,
    _guests: &GuestSelection,
    config: &StrategyConfig,
) -> Decimal {
    match kind {
        StrategyKind::Standard => property.nightly_price,
        StrategyKind::Dynamic => {
            let nights = range.nights();
            if nights == 0 {
                return property.nightly_price;
            }
            let mut total = Decimal::ZERO;
            for night in range.iter_nights() {
                let mut price = property.nightly_price;
                if is_weekend(night) {
                    price *= config.weekend_multiplier;
                }
                price *= config.seasonal.for_date(night);
                total += price;
            }
            total / Decimal::from(nights)
        }
        StrategyKind::LongTerm => property.nightly_price * long_term_multiplier(range.nights()),
        StrategyKind::Premium => property.nightly_price * premium_multiplier(&property.amenities),
    }
}

/// Progressive long-stay multiplier. Tiers are mutually exclusive: the
/// highest threshold met wins, they never accumulate.
fn long_term_multiplier(nights: u32) -> Decimal {
    if nights >= 28 {
        Decimal::new(70, 2)
    } else if nights >= 14 {
        Decimal::new(80, 2)
    } else if nights >= 7 {
        Decimal::new(90, 2)
    } else {
        Decimal::ONE
    }
}

/// +10% per luxury amenity, stacking additively (2 matches = x1.20).
fn premium_multiplier(amenities: &[String]) -> Decimal {
    let matches = amenities
        .iter()
        .filter(|amenity| {
            let tag = amenity.to_lowercase();
            LUXURY_AMENITY_KEYWORDS
                .iter()
                .any(|keyword| tag.contains(keyword))
        })
        .count();
    Decimal::ONE + Decimal::new(matches as i64, 1)
}

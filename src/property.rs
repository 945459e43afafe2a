use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::PricingError;

// Data structures describing the property's rate card and the guest party.
// Both are read-only inputs to pricing; nothing here is mutated by the engine.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRate {
    pub nightly_price: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    /// Amenity tags as listed on the property record, e.g. "Heated Pool".
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Maximum adults + children the property sleeps.
    pub max_guests: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSelection {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl GuestSelection {
    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
        }
    }

    /// Guests counted against the property capacity. Infants are exempt.
    pub fn counted(&self) -> u32 {
        self.adults + self.children
    }

    /// Check the party against the property capacity: at least one adult,
    /// and adults + children within `max_guests`.
    pub fn validate(&self, max_guests: u32) -> Result<(), PricingError> {
        if self.adults < 1 {
            return Err(PricingError::InvalidGuests(
                "at least one adult is required".to_string(),
            ));
        }
        if self.counted() > max_guests {
            return Err(PricingError::InvalidGuests(format!(
                "{} guests exceed the property capacity of {}",
                self.counted(),
                max_guests
            )));
        }
        Ok(())
    }
}

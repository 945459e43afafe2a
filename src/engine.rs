// Booking price calculation engine. Runs the fixed template: validate the
// stay, compute the strategy base price, add pass-through fees, evaluate
// discount rules, tax the post-discount amount, and emit an itemized
// breakdown. Pure over its inputs: identical requests against the same
// config always produce identical results.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::currency::round_money;
use crate::date_range::DateRange;
use crate::discount::{
    evaluate_rules, AppliedDiscount, BookingContext, DiscountOutcome, DiscountRule,
};
use crate::property::{GuestSelection, PropertyRate};
use crate::strategy::{base_price_per_night, StrategyConfig, StrategyKind};

// Validation failures are reported synchronously to the caller; nothing in a
// pure computation is transient enough to retry.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("invalid guest selection: {0}")]
    InvalidGuests(String),

    #[error("unknown pricing strategy: {0}")]
    UnknownStrategy(String),
}

/// Engine configuration, overridable per deployment. Serde-friendly so the
/// host application can ship overrides as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// ISO 4217 code used for display; never alters the numeric result.
    pub currency: String,
    /// Applied to the post-discount amount when `include_taxes` is set.
    pub tax_rate: Decimal,
    pub include_taxes: bool,
    pub strategy: StrategyConfig,
    pub discount_rules: Vec<DiscountRule>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            tax_rate: Decimal::ZERO,
            include_taxes: true,
            strategy: StrategyConfig::default(),
            discount_rules: DiscountRule::default_rules(),
        }
    }
}

/// One quote request: a property snapshot, the stay, the party, and the
/// strategy to price with.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub property: PropertyRate,
    pub stay: DateRange,
    pub guests: GuestSelection,
    pub strategy: StrategyKind,
    /// Quote date for lead-time discount rules. Defaults to the current UTC
    /// date; pass it explicitly for reproducible results.
    pub booked_on: Option<NaiveDate>,
    pub repeat_guest: bool,
}

impl QuoteRequest {
    pub fn new(
        property: PropertyRate,
        stay: DateRange,
        guests: GuestSelection,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            property,
            stay,
            guests,
            strategy,
            booked_on: None,
            repeat_guest: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCategory {
    Accommodation,
    Fee,
    Tax,
    Discount,
}

/// One labeled amount in the display breakdown. Amounts sum to the grand
/// total; discounts appear as negative amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Decimal,
    pub category: LineCategory,
}

/// The itemized outcome of one calculation. Created once per call and never
/// mutated; persistence is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub currency: String,
    pub nights: u32,
    pub subtotal: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
    pub effective_nightly_price: Decimal,
    pub applied_discounts: Vec<AppliedDiscount>,
    pub breakdown: Vec<LineItem>,
}

pub struct PricingEngine {
    config: QuoteConfig,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(QuoteConfig::default())
    }
}

impl PricingEngine {
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Price a stay. Validation failures short-circuit before any pricing
    /// math runs; an invalid range is never billed as zero nights.
    pub fn quote(&self, request: &QuoteRequest) -> Result<CalculationResult, PricingError> {
        request.stay.validate()?;
        request.guests.validate(request.property.max_guests)?;

        let nights = request.stay.nights();
        let base = base_price_per_night(
            request.strategy,
            &request.property,
            &request.stay,
            &request.guests,
            &self.config.strategy,
        );
        let subtotal = round_money(base * Decimal::from(nights));
        let cleaning_fee = request.property.cleaning_fee;
        let service_fee = request.property.service_fee;
        let pre_discount_total = subtotal + cleaning_fee + service_fee;

        let booking = BookingContext {
            nights,
            check_in: request.stay.check_in,
            booked_on: request
                .booked_on
                .unwrap_or_else(|| Utc::now().date_naive()),
            repeat_guest: request.repeat_guest,
        };
        let discounts = evaluate_rules(&self.config.discount_rules, &booking, pre_discount_total);

        let taxable_amount = pre_discount_total - discounts.discount_total;
        let taxes = if self.config.include_taxes {
            round_money(taxable_amount * self.config.tax_rate)
        } else {
            Decimal::ZERO
        };
        let grand_total = pre_discount_total + taxes - discounts.discount_total;
        let effective_nightly_price = round_money(base);

        debug!(
            strategy = request.strategy.as_str(),
            nights,
            %subtotal,
            discount_total = %discounts.discount_total,
            %grand_total,
            "priced stay"
        );

        let breakdown = build_breakdown(
            nights,
            effective_nightly_price,
            subtotal,
            cleaning_fee,
            service_fee,
            taxes,
            &discounts,
        );

        Ok(CalculationResult {
            currency: self.config.currency.clone(),
            nights,
            subtotal,
            cleaning_fee,
            service_fee,
            taxes,
            discount_total: discounts.discount_total,
            grand_total,
            effective_nightly_price,
            applied_discounts: discounts.applied,
            breakdown,
        })
    }
}

fn build_breakdown(
    nights: u32,
    effective_nightly_price: Decimal,
    subtotal: Decimal,
    cleaning_fee: Decimal,
    service_fee: Decimal,
    taxes: Decimal,
    discounts: &DiscountOutcome,
) -> Vec<LineItem> {
    let mut breakdown = vec![LineItem {
        label: format!("{} nights x {} per night", nights, effective_nightly_price),
        amount: subtotal,
        category: LineCategory::Accommodation,
    }];
    if cleaning_fee > Decimal::ZERO {
        breakdown.push(LineItem {
            label: "Cleaning fee".to_string(),
            amount: cleaning_fee,
            category: LineCategory::Fee,
        });
    }
    if service_fee > Decimal::ZERO {
        breakdown.push(LineItem {
            label: "Service fee".to_string(),
            amount: service_fee,
            category: LineCategory::Fee,
        });
    }
    if taxes > Decimal::ZERO {
        breakdown.push(LineItem {
            label: "Taxes".to_string(),
            amount: taxes,
            category: LineCategory::Tax,
        });
    }
    if discounts.discount_total > Decimal::ZERO {
        let label = match discounts.applied.as_slice() {
            [only] => only.rule.label.clone(),
            _ => "Discounts".to_string(),
        };
        breakdown.push(LineItem {
            label,
            amount: -discounts.discount_total,
            category: LineCategory::Discount,
        });
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn property() -> PropertyRate {
        PropertyRate {
            nightly_price: dec!(100),
            cleaning_fee: dec!(50),
            service_fee: dec!(20),
            amenities: vec![],
            max_guests: 4,
        }
    }

    fn week_long_request(strategy: StrategyKind) -> QuoteRequest {
        let mut request = QuoteRequest::new(
            property(),
            DateRange::new(date("2025-06-10"), date("2025-06-17")),
            GuestSelection::new(2, 0, 0),
            strategy,
        );
        request.booked_on = Some(date("2025-06-01"));
        request
    }

    fn taxed_engine() -> PricingEngine {
        PricingEngine::new(QuoteConfig {
            tax_rate: dec!(0.10),
            ..QuoteConfig::default()
        })
    }

    // The worked reference booking: $100/night, $50 cleaning, $20 service,
    // 7 nights on the long-term strategy with the default weekly rule and a
    // 10% tax rate.
    #[test]
    fn test_week_long_long_term_booking() {
        let result = taxed_engine()
            .quote(&week_long_request(StrategyKind::LongTerm))
            .unwrap();

        assert_eq!(result.nights, 7);
        assert_eq!(result.effective_nightly_price, dec!(90));
        assert_eq!(result.subtotal, dec!(630));
        assert_eq!(result.cleaning_fee, dec!(50));
        assert_eq!(result.service_fee, dec!(20));
        assert_eq!(result.discount_total, dec!(70.00));
        assert_eq!(result.taxes, dec!(63.00));
        assert_eq!(result.grand_total, dec!(693.00));

        assert_eq!(result.applied_discounts.len(), 1);
        assert_eq!(result.applied_discounts[0].rule.label, "Weekly stay discount");
        assert_eq!(result.currency, "USD");
    }

    #[test]
    fn test_same_day_stay_is_rejected_before_pricing() {
        let mut request = week_long_request(StrategyKind::Standard);
        request.stay = DateRange::new(date("2025-06-10"), date("2025-06-10"));

        let err = PricingEngine::default().quote(&request).unwrap_err();
        assert!(matches!(err, PricingError::InvalidDateRange(_)));
    }

    #[test]
    fn test_overcapacity_party_is_rejected() {
        let mut request = week_long_request(StrategyKind::Standard);
        request.guests = GuestSelection::new(3, 2, 0);

        let err = PricingEngine::default().quote(&request).unwrap_err();
        assert!(matches!(err, PricingError::InvalidGuests(_)));
    }

    #[test]
    fn test_tax_applies_to_post_discount_amount() {
        let result = taxed_engine()
            .quote(&week_long_request(StrategyKind::Standard))
            .unwrap();

        // Pre-discount total is 770; weekly rule takes 77, so tax is 10% of
        // 693, not of 770
        assert_eq!(result.discount_total, dec!(77.00));
        assert_eq!(result.taxes, dec!(69.30));
        assert_eq!(result.grand_total, dec!(762.30));
    }

    #[test]
    fn test_taxes_can_be_excluded() {
        let engine = PricingEngine::new(QuoteConfig {
            tax_rate: dec!(0.10),
            include_taxes: false,
            ..QuoteConfig::default()
        });
        let result = engine
            .quote(&week_long_request(StrategyKind::Standard))
            .unwrap();
        assert_eq!(result.taxes, Decimal::ZERO);
        assert_eq!(result.grand_total, dec!(693.00));
    }

    #[test]
    fn test_stacked_discounts_both_subtract() {
        let engine = PricingEngine::new(QuoteConfig {
            discount_rules: vec![
                DiscountRule::weekly(7, dec!(10)),
                DiscountRule::early_bird(30, dec!(5)),
            ],
            ..QuoteConfig::default()
        });
        let mut request = week_long_request(StrategyKind::Standard);
        request.booked_on = Some(date("2025-04-01"));

        let result = engine.quote(&request).unwrap();
        // 770 pre-discount: 77 weekly + 38.50 early bird
        assert_eq!(result.applied_discounts.len(), 2);
        assert_eq!(result.discount_total, dec!(115.50));
        assert_eq!(result.grand_total, dec!(654.50));
    }

    #[test]
    fn test_zero_priced_property_is_not_an_error() {
        let mut request = week_long_request(StrategyKind::Standard);
        request.property = PropertyRate {
            nightly_price: Decimal::ZERO,
            cleaning_fee: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            amenities: vec![],
            max_guests: 4,
        };

        let result = PricingEngine::default().quote(&request).unwrap();
        assert_eq!(result.subtotal, Decimal::ZERO);
        assert_eq!(result.grand_total, Decimal::ZERO);
        // Zero-amount lines are omitted; only the accommodation line remains
        assert_eq!(result.breakdown.len(), 1);
    }

    #[test]
    fn test_identical_requests_are_idempotent() {
        let engine = taxed_engine();
        let request = week_long_request(StrategyKind::Dynamic);
        let first = engine.quote(&request).unwrap();
        let second = engine.quote(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakdown_sums_to_grand_total() {
        let result = taxed_engine()
            .quote(&week_long_request(StrategyKind::LongTerm))
            .unwrap();

        let sum: Decimal = result.breakdown.iter().map(|line| line.amount).sum();
        assert_eq!(sum, result.grand_total);

        let categories: Vec<LineCategory> =
            result.breakdown.iter().map(|line| line.category).collect();
        assert_eq!(
            categories,
            vec![
                LineCategory::Accommodation,
                LineCategory::Fee,
                LineCategory::Fee,
                LineCategory::Tax,
                LineCategory::Discount,
            ]
        );
        // Discount line is displayed as a negative amount
        assert_eq!(result.breakdown.last().unwrap().amount, dec!(-70.00));
    }

    #[test]
    fn test_config_override_from_json() {
        let config: QuoteConfig = serde_json::from_str(
            r#"{
                "currency": "EUR",
                "tax_rate": "0.27",
                "strategy": {
                    "weekend_multiplier": "1.5",
                    "seasonal": {
                        "spring": "1.0",
                        "summer": "1.4",
                        "fall": "1.0",
                        "winter": "0.9"
                    }
                },
                "discount_rules": [
                    {
                        "kind": "weekly",
                        "threshold": 7,
                        "percent_off": "12",
                        "label": "Weekly stay discount"
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.tax_rate, dec!(0.27));
        assert!(config.include_taxes);
        assert_eq!(config.strategy.weekend_multiplier, dec!(1.5));
        assert_eq!(config.discount_rules.len(), 1);

        let result = PricingEngine::new(config)
            .quote(&week_long_request(StrategyKind::Standard))
            .unwrap();
        // 770 pre-discount, 12% weekly = 92.40, tax 27% of 677.60 = 182.95
        assert_eq!(result.discount_total, dec!(92.40));
        assert_eq!(result.taxes, dec!(182.95));
        assert_eq!(result.grand_total, dec!(860.55));
    }
}

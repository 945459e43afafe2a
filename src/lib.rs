// Booking price calculation core for the rental marketplace

// Export one module per pricing concern
pub mod currency;
pub mod date_range;
pub mod discount;
pub mod engine;
pub mod property;
pub mod strategy;

// Re-export key types for convenience
pub use currency::{render_breakdown, round_money, CurrencyFormatter};
pub use date_range::DateRange;
pub use discount::{AppliedDiscount, BookingContext, DiscountKind, DiscountOutcome, DiscountRule};
pub use engine::{
    CalculationResult, LineCategory, LineItem, PricingEngine, PricingError, QuoteConfig,
    QuoteRequest,
};
pub use property::{GuestSelection, PropertyRate};
pub use strategy::{
    base_price_per_night, Season, SeasonalMultipliers, StrategyConfig, StrategyKind,
};

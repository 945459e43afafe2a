// Discount rules evaluated against a booking. Every rule is tested
// independently; all matching rules stack additively against the
// pre-discount total (unlike the long-term tiers, which are exclusive).

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Weekly,
    Monthly,
    EarlyBird,
    LastMinute,
    RepeatGuest,
}

/// One immutable discount rule, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub kind: DiscountKind,
    /// Nights for weekly/monthly, lead-time days for early-bird/last-minute.
    /// Ignored by repeat-guest.
    pub threshold: i64,
    /// Percentage off the pre-discount total, 0-100.
    pub percent_off: Decimal,
    pub label: String,
}

impl DiscountRule {
    pub fn weekly(threshold: i64, percent_off: Decimal) -> Self {
        Self {
            kind: DiscountKind::Weekly,
            threshold,
            percent_off,
            label: "Weekly stay discount".to_string(),
        }
    }

    pub fn monthly(threshold: i64, percent_off: Decimal) -> Self {
        Self {
            kind: DiscountKind::Monthly,
            threshold,
            percent_off,
            label: "Monthly stay discount".to_string(),
        }
    }

    pub fn early_bird(threshold: i64, percent_off: Decimal) -> Self {
        Self {
            kind: DiscountKind::EarlyBird,
            threshold,
            percent_off,
            label: "Early bird discount".to_string(),
        }
    }

    pub fn last_minute(threshold: i64, percent_off: Decimal) -> Self {
        Self {
            kind: DiscountKind::LastMinute,
            threshold,
            percent_off,
            label: "Last minute discount".to_string(),
        }
    }

    pub fn repeat_guest(percent_off: Decimal) -> Self {
        Self {
            kind: DiscountKind::RepeatGuest,
            threshold: 0,
            percent_off,
            label: "Repeat guest discount".to_string(),
        }
    }

    /// Rules shipped by default: 10% off weekly stays, 20% off monthly stays.
    pub fn default_rules() -> Vec<Self> {
        vec![
            Self::weekly(7, Decimal::from(10)),
            Self::monthly(28, Decimal::from(20)),
        ]
    }

    /// Whether this rule matches the booking. Each kind has its own test and
    /// no rule excludes another.
    pub fn applies(&self, ctx: &BookingContext) -> bool {
        match self.kind {
            DiscountKind::Weekly | DiscountKind::Monthly => {
                i64::from(ctx.nights) >= self.threshold
            }
            DiscountKind::EarlyBird => ctx.lead_days() >= self.threshold,
            DiscountKind::LastMinute => ctx.lead_days() <= self.threshold,
            // Externally supplied flag; there is no internal guest-history
            // lookup in this core.
            DiscountKind::RepeatGuest => ctx.repeat_guest,
        }
    }
}

/// Booking facts the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct BookingContext {
    pub nights: u32,
    pub check_in: NaiveDate,
    /// The date the quote is made, used for lead-time rules.
    pub booked_on: NaiveDate,
    pub repeat_guest: bool,
}

impl BookingContext {
    /// Days between booking and check-in; negative when check-in is past.
    pub fn lead_days(&self) -> i64 {
        (self.check_in - self.booked_on).num_days()
    }
}

/// A rule that matched, with the amount it knocked off the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub rule: DiscountRule,
    pub amount: Decimal,
}

/// Outcome of evaluating every configured rule against one booking.
#[derive(Debug, Clone, Default)]
pub struct DiscountOutcome {
    pub discount_total: Decimal,
    pub applied: Vec<AppliedDiscount>,
}

/// Evaluate `rules` against `ctx`, each discount computed as a percentage of
/// `basis` (the pre-discount total) and rounded to minor units.
pub fn evaluate_rules(
    rules: &[DiscountRule],
    ctx: &BookingContext,
    basis: Decimal,
) -> DiscountOutcome {
    let mut outcome = DiscountOutcome::default();
    for rule in rules {
        if !rule.applies(ctx) {
            continue;
        }
        let amount = (basis * rule.percent_off / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        outcome.discount_total += amount;
        outcome.applied.push(AppliedDiscount {
            rule: rule.clone(),
            amount,
        });
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ctx(nights: u32, check_in: &str, booked_on: &str) -> BookingContext {
        BookingContext {
            nights,
            check_in: date(check_in),
            booked_on: date(booked_on),
            repeat_guest: false,
        }
    }

    #[test_case(6, false; "#1 below weekly threshold")]
    #[test_case(7, true; "#2 at weekly threshold")]
    #[test_case(8, true; "#3 above weekly threshold")]
    fn test_weekly_threshold_is_inclusive(nights: u32, matches: bool) {
        let rule = DiscountRule::weekly(7, dec!(10));
        assert_eq!(rule.applies(&ctx(nights, "2025-06-10", "2025-06-01")), matches);
    }

    #[test]
    fn test_early_bird_lead_time() {
        let rule = DiscountRule::early_bird(30, dec!(5));
        // 40 days out qualifies, 10 days out does not
        assert!(rule.applies(&ctx(3, "2025-07-11", "2025-06-01")));
        assert!(!rule.applies(&ctx(3, "2025-06-11", "2025-06-01")));
    }

    #[test]
    fn test_last_minute_lead_time() {
        let rule = DiscountRule::last_minute(3, dec!(8));
        assert!(rule.applies(&ctx(2, "2025-06-03", "2025-06-01")));
        assert!(!rule.applies(&ctx(2, "2025-06-10", "2025-06-01")));
    }

    #[test]
    fn test_repeat_guest_uses_external_flag() {
        let rule = DiscountRule::repeat_guest(dec!(5));
        let mut booking = ctx(2, "2025-06-10", "2025-06-01");
        assert!(!rule.applies(&booking));
        booking.repeat_guest = true;
        assert!(rule.applies(&booking));
    }

    #[test]
    fn test_matching_rules_stack_additively() {
        let rules = vec![
            DiscountRule::weekly(7, dec!(10)),
            DiscountRule::early_bird(30, dec!(5)),
            DiscountRule::monthly(28, dec!(20)),
        ];
        // 7 nights booked 60 days out: weekly and early-bird both match
        let booking = ctx(7, "2025-08-01", "2025-06-02");
        let outcome = evaluate_rules(&rules, &booking, dec!(700));

        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.applied[0].amount, dec!(70.00));
        assert_eq!(outcome.applied[1].amount, dec!(35.00));
        assert_eq!(outcome.discount_total, dec!(105.00));
    }

    #[test]
    fn test_no_matching_rules() {
        let booking = ctx(2, "2025-06-10", "2025-06-08");
        let outcome = evaluate_rules(&DiscountRule::default_rules(), &booking, dec!(300));
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.discount_total, Decimal::ZERO);
    }

    #[test]
    fn test_discount_amounts_round_to_cents() {
        let rules = vec![DiscountRule::weekly(7, dec!(7.5))];
        let booking = ctx(7, "2025-06-10", "2025-06-01");
        // 7.5% of 333.33 = 24.99975 -> 25.00
        let outcome = evaluate_rules(&rules, &booking, dec!(333.33));
        assert_eq!(outcome.discount_total, dec!(25.00));
    }
}

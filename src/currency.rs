// Display-layer currency handling. Formatting never feeds back into the
// numeric result; the grand total is computed on Decimal values only.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::CalculationResult;

/// Round a monetary amount to minor units (2 dp, midpoint away from zero).
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Locale-aware formatter for one currency. Knows symbol placement,
/// separators, and minor-unit count for the common marketplace currencies;
/// anything else falls back to "<amount> <code>".
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    code: String,
    symbol: String,
    minor_units: u32,
    symbol_prefix: bool,
    thousands_sep: char,
    decimal_sep: char,
}

impl CurrencyFormatter {
    pub fn new(code: &str) -> Self {
        let upper = code.to_uppercase();
        let (symbol, minor_units, symbol_prefix, thousands_sep, decimal_sep) =
            match upper.as_str() {
                "USD" => ("$", 2, true, ',', '.'),
                "GBP" => ("£", 2, true, ',', '.'),
                "EUR" => ("€", 2, false, '.', ','),
                "JPY" => ("¥", 0, true, ',', '.'),
                "HUF" => ("Ft", 0, false, ' ', ','),
                _ => ("", 2, false, ',', '.'),
            };
        let symbol = if symbol.is_empty() {
            upper.clone()
        } else {
            symbol.to_string()
        };
        Self {
            code: upper,
            symbol,
            minor_units,
            symbol_prefix,
            thousands_sep,
            decimal_sep,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount
            .round_dp_with_strategy(self.minor_units, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let fixed = format!("{:.*}", self.minor_units as usize, rounded.abs());

        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (fixed.as_str(), None),
        };
        let mut digits = group_thousands(int_part, self.thousands_sep);
        if let Some(frac) = frac_part {
            digits.push(self.decimal_sep);
            digits.push_str(frac);
        }

        let body = if self.symbol_prefix {
            format!("{}{}", self.symbol, digits)
        } else {
            format!("{} {}", digits, self.symbol)
        };
        if negative {
            format!("-{}", body)
        } else {
            body
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(*c);
    }
    grouped
}

/// Render the itemized breakdown as display text, one labeled amount per
/// line followed by the grand total.
pub fn render_breakdown(result: &CalculationResult) -> String {
    let formatter = CurrencyFormatter::new(&result.currency);
    let mut out = String::new();
    for line in &result.breakdown {
        out.push_str(&format!(
            "{:<36} {:>14}\n",
            line.label,
            formatter.format(line.amount)
        ));
    }
    out.push_str(&format!(
        "{:<36} {:>14}\n",
        "Total",
        formatter.format(result.grand_total)
    ));
    out
}

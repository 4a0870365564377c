//! Rupee amounts.
//!
//! All arithmetic stays in `Decimal`; these helpers only round and format for
//! display. Rounding is half-up to two places, matching how the backend bills.

use rust_decimal::{Decimal, RoundingStrategy};

pub const RUPEE: &str = "₹";

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `₹1234.50`: fixed two decimals, no grouping. Used on the cart and receipts.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{RUPEE}{:.2}", rounded.abs())
}

/// `₹45` / `₹45.5`: the amount as the backend sent it, trailing zeros dropped.
pub fn format_plain(amount: Decimal) -> String {
    format!("{RUPEE}{}", round_money(amount).normalize())
}

/// `₹1,23,456.5`: Indian digit grouping (thousands, then lakhs and crores).
pub fn format_inr_grouped(amount: Decimal) -> String {
    let rounded = round_money(amount).normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let grouped = group_indian(&int_part);
    let mut out = String::with_capacity(grouped.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(RUPEE);
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), last_three)
}

/// Percentage with at most one decimal, e.g. `12.5%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(1).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn fixed_two_decimals() {
        assert_eq!(format_inr(d("336")), "₹336.00");
        assert_eq!(format_inr(d("16.005")), "₹16.01");
        assert_eq!(format_inr(Decimal::ZERO), "₹0.00");
    }

    #[test]
    fn plain_drops_trailing_zeros() {
        assert_eq!(format_plain(d("45.00")), "₹45");
        assert_eq!(format_plain(d("45.50")), "₹45.5");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr_grouped(d("999")), "₹999");
        assert_eq!(format_inr_grouped(d("1000")), "₹1,000");
        assert_eq!(format_inr_grouped(d("123456")), "₹1,23,456");
        assert_eq!(format_inr_grouped(d("12345678.5")), "₹1,23,45,678.5");
    }
}

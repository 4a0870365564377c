//! Cart display overlay: tax and spin-wheel discount on top of the server total.
//!
//! The server total is authoritative. Everything computed here is for display
//! before checkout; the backend applies the real charge.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::money::round_money;

/// 5 %, display only.
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Flat credit shown for a "Free Item" prize.
///
/// Promotional demo behaviour: the backend has no matching rule, so checkout
/// sends a 0 % discount for this prize and only the display reflects it.
pub const FREE_ITEM_CREDIT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)%").expect("percent regex must compile"));

/// A prize won on the spin wheel, as stored between spin and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiscountToken {
    Percent(u32),
    FreeItem,
}

impl DiscountToken {
    /// `"10% OFF"` → `Percent(10)`, `"Free Item"` → `FreeItem`; anything
    /// else (e.g. `"Try Again"`) is not a discount.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(caps) = PERCENT_RE.captures(raw) {
            let percent = caps[1].parse::<u32>().ok()?;
            return Some(DiscountToken::Percent(percent.min(100)));
        }
        if raw.to_ascii_lowercase().contains("free item") {
            return Some(DiscountToken::FreeItem);
        }
        None
    }

    /// Percent sent with `POST /checkout`.
    pub fn checkout_percent(&self) -> u32 {
        match self {
            DiscountToken::Percent(p) => *p,
            DiscountToken::FreeItem => 0,
        }
    }

    pub fn amount(&self, subtotal: Decimal) -> Decimal {
        match self {
            DiscountToken::Percent(p) => subtotal * Decimal::from(*p) / Decimal::ONE_HUNDRED,
            DiscountToken::FreeItem => FREE_ITEM_CREDIT,
        }
    }

    pub fn label(&self) -> String {
        match self {
            DiscountToken::Percent(p) => format!("{p}% OFF"),
            DiscountToken::FreeItem => "Free Item".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub discount_label: Option<String>,
}

/// `total = max(0, subtotal + tax - discount)`.
pub fn overlay(subtotal: Decimal, token: Option<&DiscountToken>) -> CartTotals {
    let subtotal = subtotal.max(Decimal::ZERO);
    let tax = subtotal * TAX_RATE;
    let discount = token.map(|t| t.amount(subtotal)).unwrap_or(Decimal::ZERO);
    let total = (subtotal + tax - discount).max(Decimal::ZERO);

    CartTotals {
        subtotal: round_money(subtotal),
        tax: round_money(tax),
        discount: round_money(discount),
        total: round_money(total),
        discount_label: token.map(DiscountToken::label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn parses_prize_tokens() {
        assert_eq!(DiscountToken::parse("10% OFF"), Some(DiscountToken::Percent(10)));
        assert_eq!(DiscountToken::parse("Flat 25% off!"), Some(DiscountToken::Percent(25)));
        assert_eq!(DiscountToken::parse("Free Item"), Some(DiscountToken::FreeItem));
        assert_eq!(DiscountToken::parse("Try Again"), None);
        assert_eq!(DiscountToken::parse("250% OFF"), Some(DiscountToken::Percent(100)));
    }

    #[test]
    fn percent_discount_scales_with_subtotal() {
        let totals = overlay(d("320"), Some(&DiscountToken::Percent(10)));
        assert_eq!(totals.tax, d("16.00"));
        assert_eq!(totals.discount, d("32.00"));
        assert_eq!(totals.total, d("304.00"));
        assert_eq!(totals.discount_label.as_deref(), Some("10% OFF"));
    }

    #[test]
    fn free_item_is_flat_fifty() {
        let totals = overlay(d("200"), Some(&DiscountToken::FreeItem));
        assert_eq!(totals.discount, d("50"));
        assert_eq!(totals.total, d("160.00"));
        assert_eq!(DiscountToken::FreeItem.checkout_percent(), 0);
    }

    #[test]
    fn total_never_negative() {
        for subtotal in ["0", "1", "10", "47.62", "1000"] {
            for token in [
                None,
                Some(DiscountToken::FreeItem),
                Some(DiscountToken::Percent(100)),
                Some(DiscountToken::Percent(5)),
            ] {
                let s = d(subtotal);
                let totals = overlay(s, token.as_ref());
                let expected = (s + s * TAX_RATE
                    - token.map(|t| t.amount(s)).unwrap_or_default())
                .max(Decimal::ZERO);
                assert!(totals.total >= Decimal::ZERO);
                assert_eq!(totals.total, round_money(expected));
            }
        }
    }

    #[test]
    fn no_token_means_no_discount() {
        let totals = overlay(d("100"), None);
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, d("105.00"));
        assert!(totals.discount_label.is_none());
    }
}

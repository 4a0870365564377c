use askama::Template;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::Cart,
    money::{format_inr, format_plain},
    pricing::{CartTotals, DiscountToken, overlay},
    ui::i18n::{self, Language, Msg},
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartLine {
    pub id: String,
    /// Localised where the product has a translated name.
    pub name: String,
    pub unit: Option<String>,
    pub image: Option<String>,
    pub qty: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: i64,
    pub totals: CartTotals,
    pub checkout_enabled: bool,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn cart_view(cart: &Cart, discount: Option<&DiscountToken>, lang: Language) -> CartView {
    let lines: Vec<CartLine> = cart
        .items
        .iter()
        .map(|item| CartLine {
            id: item.id.clone(),
            name: i18n::product_name(lang, &item.id, &item.name).to_string(),
            unit: item.unit.clone(),
            image: item.image.clone(),
            qty: item.qty,
            unit_price: item.price,
            line_total: item.line_total(),
        })
        .collect();

    CartView {
        item_count: cart.item_count(),
        totals: overlay(cart.total, discount),
        checkout_enabled: !lines.is_empty(),
        lines,
    }
}

struct CartRow<'a> {
    id: &'a str,
    name: &'a str,
    image: &'a str,
    qty: i64,
    price: String,
    total: String,
}

struct SummaryEntry<'a> {
    id: &'static str,
    label: &'a str,
    value: String,
}

#[derive(Template)]
#[template(path = "cart.html")]
struct CartTemplate<'a> {
    basket: &'a str,
    count: String,
    basket_empty: &'a str,
    scan_items: &'a str,
    rows: Vec<CartRow<'a>>,
    summary: Vec<SummaryEntry<'a>>,
    checkout: &'a str,
    checkout_enabled: bool,
}

pub fn render_cart(view: &CartView, lang: Language) -> askama::Result<String> {
    let rows = view
        .lines
        .iter()
        .map(|line| {
            let mut price = format_plain(line.unit_price);
            if let Some(unit) = line.unit.as_deref().filter(|s| !s.is_empty()) {
                price.push_str(" / ");
                price.push_str(unit);
            }
            CartRow {
                id: &line.id,
                name: &line.name,
                image: line.image.as_deref().unwrap_or_default(),
                qty: line.qty,
                price,
                total: format_plain(line.line_total),
            }
        })
        .collect();

    let totals = &view.totals;
    let discount = match &totals.discount_label {
        Some(label) => SummaryEntry {
            id: "discount",
            label: label.as_str(),
            value: format!("-{}", format_inr(totals.discount)),
        },
        None => SummaryEntry {
            id: "discount",
            label: i18n::text(lang, Msg::NoDiscount),
            value: format_inr(Decimal::ZERO),
        },
    };
    let summary = vec![
        SummaryEntry {
            id: "subtotal",
            label: i18n::text(lang, Msg::Subtotal),
            value: format_inr(totals.subtotal),
        },
        SummaryEntry {
            id: "tax",
            label: i18n::text(lang, Msg::Tax),
            value: format_inr(totals.tax),
        },
        discount,
        SummaryEntry {
            id: "total-amount",
            label: i18n::text(lang, Msg::Total),
            value: format_inr(totals.total),
        },
    ];

    CartTemplate {
        basket: i18n::text(lang, Msg::Basket),
        count: format!("{} {}", view.item_count, i18n::text(lang, Msg::Items)),
        basket_empty: i18n::text(lang, Msg::BasketEmpty),
        scan_items: i18n::text(lang, Msg::ScanItems),
        rows,
        summary,
        checkout: i18n::text(lang, Msg::Checkout),
        checkout_enabled: view.checkout_enabled,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CartItem;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn item(id: &str, name: &str, price: &str, qty: i64) -> CartItem {
        CartItem {
            id: id.into(),
            name: name.into(),
            price: d(price),
            qty,
            unit: None,
            image: None,
            discount: Decimal::ZERO,
            final_price: None,
        }
    }

    #[test]
    fn summarises_lines_and_counts_quantities() {
        let cart = Cart {
            items: vec![item("52612D5C", "Rice Bag 5kg", "320", 1), item("B3211839", "Bread Loaf", "45", 2)],
            total: d("410"),
        };
        let view = cart_view(&cart, Some(&DiscountToken::Percent(10)), Language::En);

        assert_eq!(view.item_count, 3);
        assert_eq!(view.lines[1].line_total, d("90"));
        assert_eq!(view.totals.tax, d("20.50"));
        assert_eq!(view.totals.discount, d("41.00"));
        assert_eq!(view.totals.total, d("389.50"));
        assert!(view.checkout_enabled);
    }

    #[test]
    fn empty_cart_disables_checkout() {
        let view = cart_view(&Cart::default(), None, Language::En);
        let html = render_cart(&view, Language::En).expect("render");

        assert!(!view.checkout_enabled);
        assert!(html.contains("disabled=\"disabled\""));
        assert!(html.contains(i18n::text(Language::En, Msg::BasketEmpty)));
    }

    #[test]
    fn free_item_never_drives_total_negative() {
        let cart = Cart {
            items: vec![item("03563B38", "Milk Packet 500ml", "30", 1)],
            total: d("30"),
        };
        let view = cart_view(&cart, Some(&DiscountToken::FreeItem), Language::En);
        assert_eq!(view.totals.total, Decimal::ZERO);
    }

    #[test]
    fn item_names_are_escaped_and_localised() {
        let cart = Cart {
            items: vec![item("X1", "<b>Soap</b>", "10", 1), item("83E69038", "Sugar 1kg", "50", 1)],
            total: d("60"),
        };
        let html = render_cart(&cart_view(&cart, None, Language::Ta), Language::Ta).expect("render");
        assert!(html.contains("&lt;b&gt;Soap"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("சர்க்கரை"));
    }
}

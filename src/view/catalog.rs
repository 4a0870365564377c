use askama::Template;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::Product,
    money::format_plain,
    ui::i18n::{self, Language},
    view::inventory::{ProductFilter, categories},
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogCard {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    /// Price after the product's own discount, when it has one.
    pub offer_price: Option<Decimal>,
    pub promotion: Option<String>,
    pub image: Option<String>,
    pub in_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogView {
    pub categories: Vec<String>,
    pub cards: Vec<CatalogCard>,
}

pub fn catalog_view(products: &[Product], filter: &ProductFilter, lang: Language) -> CatalogView {
    let cards = filter
        .apply(products)
        .into_iter()
        .map(|p| CatalogCard {
            id: p.id.clone(),
            name: i18n::product_name(lang, &p.id, &p.name).to_string(),
            category: p.category_label().to_string(),
            price: p.price,
            offer_price: (p.discount > Decimal::ZERO).then(|| p.discounted_price()),
            promotion: p.promotion_description.clone().filter(|s| !s.is_empty()),
            image: p.image.clone(),
            in_stock: p.stock > 0,
        })
        .collect();

    CatalogView {
        categories: categories(products),
        cards,
    }
}

struct CardRow<'a> {
    class: &'static str,
    id: &'a str,
    name: &'a str,
    category: &'a str,
    image: &'a str,
    /// Crossed-out list price, empty without an offer.
    was: String,
    price: String,
    promotion: &'a str,
}

#[derive(Template)]
#[template(path = "catalog.html")]
struct CatalogTemplate<'a> {
    cards: Vec<CardRow<'a>>,
}

pub fn render_catalog(view: &CatalogView) -> askama::Result<String> {
    let cards = view
        .cards
        .iter()
        .map(|card| CardRow {
            class: if card.in_stock {
                "product-card"
            } else {
                "product-card out-of-stock"
            },
            id: &card.id,
            name: &card.name,
            category: &card.category,
            image: card.image.as_deref().unwrap_or_default(),
            was: card
                .offer_price
                .map(|_| format_plain(card.price))
                .unwrap_or_default(),
            price: format_plain(card.offer_price.unwrap_or(card.price)),
            promotion: card.promotion.as_deref().unwrap_or_default(),
        })
        .collect();
    CatalogTemplate { cards }.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::inventory::StockFilter;

    fn product(id: &str, name: &str, category: &str, discount: &str) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            price: "100".parse().expect("decimal"),
            stock: 4,
            category: Some(category.into()),
            unit: None,
            image: None,
            discount: discount.parse().expect("decimal"),
            promotion_description: None,
            promotion_expiry: None,
            last_updated: None,
        }
    }

    #[test]
    fn filters_by_category_and_localises_names() {
        let products = vec![
            product("83E69038", "Sugar 1kg", "Grocery", "0"),
            product("X2", "Shampoo", "Care", "10"),
        ];
        let filter = ProductFilter::new(None, Some("Grocery"), StockFilter::All);
        let view = catalog_view(&products, &filter, Language::Ta);

        assert_eq!(view.categories, vec!["Care", "Grocery"]);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].name, "சர்க்கரை");
        assert_eq!(view.cards[0].offer_price, None);
    }

    #[test]
    fn discounted_products_show_offer_price() {
        let products = vec![product("X2", "Shampoo", "Care", "10")];
        let view = catalog_view(&products, &ProductFilter::default(), Language::En);
        assert_eq!(view.cards[0].offer_price, Some("90".parse().expect("decimal")));
        assert!(render_catalog(&view).expect("render").contains("₹90"));
    }
}

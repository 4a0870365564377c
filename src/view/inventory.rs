//! Inventory tables for the admin dashboard and the worker console.
//!
//! The two consoles draw the line for "low stock" differently: the admin
//! table badges anything under 10, the worker console treats 1–4 as low and
//! 0 as out of stock.

use std::collections::BTreeSet;

use askama::Template;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Product,
    money::{format_inr_grouped, format_plain},
};

pub const ADMIN_LOW_STOCK: i64 = 10;
pub const WORKER_LOW_STOCK: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    LowStock,
    OutStock,
}

impl StockFilter {
    pub fn matches(self, stock: i64) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::InStock => stock > 0,
            StockFilter::LowStock => stock > 0 && stock < WORKER_LOW_STOCK,
            StockFilter::OutStock => stock == 0,
        }
    }
}

/// Search text, category and stock status, all combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: String,
    /// `None` is the "all" option.
    pub category: Option<String>,
    pub stock: StockFilter,
}

impl ProductFilter {
    pub fn new(search: Option<&str>, category: Option<&str>, stock: StockFilter) -> Self {
        Self {
            search: search.unwrap_or_default().trim().to_lowercase(),
            category: category
                .map(str::trim)
                .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
                .map(str::to_string),
            stock,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let search_hit = self.search.is_empty()
            || product.name.to_lowercase().contains(&self.search)
            || product.id.to_lowercase().contains(&self.search);
        let category_hit = self
            .category
            .as_deref()
            .is_none_or(|c| product.category_label() == c);

        search_hit && category_hit && self.stock.matches(product.stock)
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Sorted distinct categories, with missing ones folded into `General`.
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category_label().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InventoryStats {
    pub total_products: usize,
    pub low_stock: usize,
    pub inventory_value: Decimal,
    /// Indian digit grouping, e.g. `₹1,23,456`.
    pub inventory_value_label: String,
}

pub fn stats(products: &[Product]) -> InventoryStats {
    let inventory_value: Decimal = products
        .iter()
        .map(|p| p.price * Decimal::from(p.stock))
        .sum();

    InventoryStats {
        total_products: products.len(),
        low_stock: products
            .iter()
            .filter(|p| StockFilter::LowStock.matches(p.stock))
            .count(),
        inventory_value_label: format_inr_grouped(inventory_value),
        inventory_value,
    }
}

pub fn stock_class(stock: i64) -> &'static str {
    if stock <= 0 {
        "text-red-500 bg-red-500/10"
    } else if stock < WORKER_LOW_STOCK {
        "text-orange-500 bg-orange-500/10"
    } else {
        "text-green-500 bg-green-500/10"
    }
}

/// `(label, classes)` for the admin table badge.
pub fn admin_badge(stock: i64) -> (&'static str, &'static str) {
    if stock < ADMIN_LOW_STOCK {
        ("Low Stock", "text-orange-500 bg-orange-50")
    } else {
        ("In Stock", "text-green-500 bg-green-50")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InventoryView {
    pub stats: InventoryStats,
    pub categories: Vec<String>,
    pub rows: Vec<Product>,
}

pub fn inventory_view(products: &[Product], filter: &ProductFilter) -> InventoryView {
    InventoryView {
        stats: stats(products),
        categories: categories(products),
        rows: filter.apply(products).into_iter().cloned().collect(),
    }
}

struct AdminRow<'a> {
    name: &'a str,
    price: String,
    stock: i64,
    badge: &'static str,
    badge_class: &'static str,
}

#[derive(Template)]
#[template(path = "admin_inventory.html")]
struct AdminTableTemplate<'a> {
    rows: Vec<AdminRow<'a>>,
}

pub fn render_admin_table(rows: &[Product]) -> askama::Result<String> {
    let rows = rows
        .iter()
        .map(|item| {
            let (badge, badge_class) = admin_badge(item.stock);
            AdminRow {
                name: &item.name,
                price: format_plain(item.price),
                stock: item.stock,
                badge,
                badge_class,
            }
        })
        .collect();
    AdminTableTemplate { rows }.render()
}

struct WorkerRow<'a> {
    id: &'a str,
    image: &'a str,
    name: &'a str,
    category: &'a str,
    price: String,
    stock: i64,
    stock_class: &'static str,
    unit: &'a str,
    discount: String,
    promotion: &'a str,
    updated: &'a str,
}

#[derive(Template)]
#[template(path = "worker_inventory.html")]
struct WorkerTableTemplate<'a> {
    rows: Vec<WorkerRow<'a>>,
}

pub fn render_worker_table(rows: &[Product]) -> askama::Result<String> {
    let rows = rows
        .iter()
        .map(|p| WorkerRow {
            id: &p.id,
            image: p.image.as_deref().unwrap_or_default(),
            name: &p.name,
            category: p.category_label(),
            price: format_plain(p.price),
            stock: p.stock,
            stock_class: stock_class(p.stock),
            unit: p.unit.as_deref().filter(|u| !u.is_empty()).unwrap_or("-"),
            discount: if p.discount > Decimal::ZERO {
                format!("{}%", p.discount.normalize())
            } else {
                "-".to_string()
            },
            promotion: p.promotion_description.as_deref().unwrap_or_default(),
            updated: p.last_updated.as_deref().unwrap_or("Never"),
        })
        .collect();
    WorkerTableTemplate { rows }.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn product(id: &str, name: &str, category: Option<&str>, price: &str, stock: i64) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            price: d(price),
            stock,
            category: category.map(Into::into),
            unit: None,
            image: None,
            discount: Decimal::ZERO,
            promotion_description: None,
            promotion_expiry: None,
            last_updated: None,
        }
    }

    fn shelf() -> Vec<Product> {
        vec![
            product("52612D5C", "Rice Bag 5kg", Some("Grains"), "320", 50),
            product("9917FEE4", "Sunflower Oil 1L", Some("Oil"), "180", 3),
            product("03563B38", "Milk Packet 500ml", Some("Dairy"), "30", 0),
            product("A1", "Loose Candy", None, "2", 1000),
        ]
    }

    #[test]
    fn worker_stats_count_only_strictly_low_stock() {
        let s = stats(&shelf());
        assert_eq!(s.total_products, 4);
        assert_eq!(s.low_stock, 1);
        assert_eq!(s.inventory_value, d("18540"));
        assert_eq!(s.inventory_value_label, "₹18,540");
    }

    #[test]
    fn filters_combine() {
        let products = shelf();
        let by_search = ProductFilter::new(Some("oil"), None, StockFilter::All);
        assert_eq!(by_search.apply(&products).len(), 1);

        let by_id = ProductFilter::new(Some("03563"), Some("all"), StockFilter::All);
        assert_eq!(by_id.apply(&products)[0].name, "Milk Packet 500ml");

        let general = ProductFilter::new(None, Some("General"), StockFilter::InStock);
        assert_eq!(general.apply(&products).len(), 1);

        let out = ProductFilter::new(None, None, StockFilter::OutStock);
        assert_eq!(out.apply(&products)[0].id, "03563B38");
    }

    #[test]
    fn categories_sorted_with_general() {
        assert_eq!(categories(&shelf()), vec!["Dairy", "General", "Grains", "Oil"]);
    }

    #[test]
    fn badges_follow_each_console_threshold() {
        assert_eq!(admin_badge(9).0, "Low Stock");
        assert_eq!(admin_badge(10).0, "In Stock");
        assert!(stock_class(0).contains("red"));
        assert!(stock_class(4).contains("orange"));
        assert!(stock_class(5).contains("green"));
    }

    #[test]
    fn empty_table_says_so() {
        assert!(render_worker_table(&[]).expect("render").contains("No products found"));
    }
}

//! View-models mirroring the trolley backend's JSON.
//!
//! The backend is loose about shapes: product lists arrive either as arrays or
//! as objects keyed by product id, numbers sometimes arrive as strings and
//! optional series may be `null`. Decoding here absorbs those variations so
//! the rest of the crate only ever sees ordered `Vec`s and concrete numbers.

use std::{fmt, marker::PhantomData};

use rust_decimal::Decimal;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{MapAccess, SeqAccess, Visitor},
};
use serde_json::Value;
use utoipa::ToSchema;

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub stock: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub discount: Decimal,
    #[serde(default)]
    pub promotion_description: Option<String>,
    #[serde(default)]
    pub promotion_expiry: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl Product {
    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Shelf price after the product's own percentage discount.
    pub fn discounted_price(&self) -> Decimal {
        if self.discount <= Decimal::ZERO {
            return self.price;
        }
        let factor = Decimal::ONE - self.discount / Decimal::ONE_HUNDRED;
        (self.price * factor).round_dp(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    /// Filled from the map key when the backend sends a keyed cart.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub qty: i64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub discount: Decimal,
    #[serde(default)]
    pub final_price: Option<Decimal>,
}

impl Keyed for CartItem {
    fn adopt_key(&mut self, key: String) {
        if self.id.is_empty() {
            self.id = key;
        }
    }
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// Server-side cart as returned by `GET /cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    #[serde(default, deserialize_with = "keyed_by_id")]
    pub items: Vec<CartItem>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total: Decimal,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| item.qty).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    Banner,
    SpinWheel,
    #[serde(other)]
    Other,
}

impl PromotionKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromotionKind::Banner => "banner",
            PromotionKind::SpinWheel => "spin wheel",
            PromotionKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PromotionContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prizes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Promotion {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: PromotionContent,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_shown: Option<String>,
}

/// `GET /api/promotions/current`: at most one campaign of each kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentPromotion {
    #[serde(default)]
    pub spin_wheel: Option<Promotion>,
    #[serde(default)]
    pub banner: Option<Promotion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesStats {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_sales: Decimal,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub total_orders: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub total_products: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub low_stock_count: i64,
    #[serde(default)]
    pub sales_trend: Option<Decimal>,
    #[serde(default)]
    pub orders_trend: Option<Decimal>,
}

/// One bucket of a revenue series. The backend names the label after the
/// bucket size (`hour`, `date`, `week`, `month`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeriesPoint {
    #[serde(
        alias = "hour",
        alias = "date",
        alias = "week",
        alias = "month",
        deserialize_with = "lenient::label"
    )]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentSale {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total: Decimal,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySale {
    pub category: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Decimal,
}

/// `GET /api/admin/analytics`. Each fetch replaces the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSnapshot {
    #[serde(default)]
    pub stats: SalesStats,
    #[serde(default, deserialize_with = "keyed_list")]
    pub recent_sales: Vec<RecentSale>,
    #[serde(default, deserialize_with = "keyed_list")]
    pub hourly_sales: Vec<SeriesPoint>,
    #[serde(default, deserialize_with = "keyed_list")]
    pub daily_sales: Vec<SeriesPoint>,
    #[serde(default, deserialize_with = "keyed_list")]
    pub weekly_sales: Vec<SeriesPoint>,
    #[serde(default, deserialize_with = "keyed_list")]
    pub monthly_sales: Vec<SeriesPoint>,
    #[serde(default, deserialize_with = "category_sales")]
    pub category_sales: Vec<CategorySale>,
}

/// Theme and banner settings shared by the customer and worker screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_nav_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_banner_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_banner_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DesignDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DesignReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub design: Option<DesignDraft>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total: Decimal,
    #[serde(default)]
    pub discount_applied: Option<Decimal>,
}

/// Generic backend acknowledgement. Customer endpoints answer with
/// `{status: "ok"|"error"}`, worker endpoints with `{success: bool}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderSummary>,
}

impl Ack {
    pub fn is_ok(&self) -> bool {
        self.success == Some(true) || self.status.as_deref() == Some("ok")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/worker/add-product`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub category: String,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    pub promotion_description: String,
    pub promotion_expiry: String,
}

/// Body of `POST /api/worker/update-product`. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ProductPatch {
    pub id: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn has_changes(&self) -> bool {
        self.price.is_some()
            || self.stock.is_some()
            || self.discount.is_some()
            || self.promotion_description.is_some()
            || self.promotion_expiry.is_some()
            || self.image.is_some()
    }
}

/// Body of `POST /api/worker/promotions/add`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NewPromotion {
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    pub title: String,
    pub content: PromotionContent,
}

/// Newtype for top-level payloads that may be an array or an id-keyed object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedList<T>(pub Vec<T>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeyedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        keyed_list(deserializer).map(KeyedList)
    }
}

/// Decodes an array, an object keyed by id (values kept in document order)
/// or `null` into a `Vec`.
pub fn keyed_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_any(KeyedListVisitor {
        adopt: |_, _| {},
        marker: PhantomData,
    })
}

/// Entries whose id may live only in the surrounding map key.
pub trait Keyed {
    fn adopt_key(&mut self, key: String);
}

/// Like [`keyed_list`], but hands each map key to the entry it labels.
pub fn keyed_by_id<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Keyed,
{
    deserializer.deserialize_any(KeyedListVisitor {
        adopt: T::adopt_key,
        marker: PhantomData,
    })
}

struct KeyedListVisitor<T> {
    adopt: fn(&mut T, String),
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedListVisitor<T> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array, an object keyed by id, or null")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            out.push(value);
        }
        Ok(out)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, mut value)) = map.next_entry::<String, T>()? {
            (self.adopt)(&mut value, key);
            out.push(value);
        }
        Ok(out)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }
}

/// Category totals arrive either as `[{category, amount}]` or as
/// `{category: amount}`.
fn category_sales<'de, D>(deserializer: D) -> Result<Vec<CategorySale>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let sales = match value {
        Value::Array(entries) => entries
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<CategorySale>, _>>()
            .map_err(serde::de::Error::custom)?,
        Value::Object(entries) => entries
            .into_iter()
            .map(|(category, amount)| CategorySale {
                category,
                amount: lenient::decimal_from_value(&amount).unwrap_or_default(),
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(sales)
}

pub(crate) mod lenient {
    use std::str::FromStr;

    use rust_decimal::{Decimal, prelude::FromPrimitive};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Decimal::from)
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    /// Numbers, numeric strings and `null` (as zero).
    pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(Decimal::ZERO),
            other => decimal_from_value(&other)
                .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {other}"))),
        }
    }

    /// Bucket labels: hours sometimes arrive as bare numbers.
    pub fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(serde::de::Error::custom(format!(
                "expected a label, got {other}"
            ))),
        }
    }

    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(|| serde::de::Error::custom("integer out of range")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {s:?}"))),
            other => Err(serde::de::Error::custom(format!(
                "expected an integer, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn cart_items_keep_document_order() {
        let cart: Cart = serde_json::from_str(
            r#"{"items": {
                "B3211839": {"id": "B3211839", "name": "Bread Loaf", "price": 45, "qty": 2},
                "03563B38": {"id": "03563B38", "name": "Milk Packet", "price": "30", "qty": 1}
            }, "total": 120}"#,
        )
        .expect("cart json");

        let ids: Vec<_> = cart.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["B3211839", "03563B38"]);
        assert_eq!(cart.total, d("120"));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.items[0].line_total(), d("90"));
    }

    #[test]
    fn keyed_cart_items_take_id_from_key() {
        let cart: Cart = serde_json::from_str(
            r#"{"items": {"B3211839": {"name": "Bread Loaf", "price": 45, "qty": 2,
                "image": "x", "final_price": 90}}, "total": 90}"#,
        )
        .expect("cart without inner ids");

        assert_eq!(cart.items[0].id, "B3211839");
        assert_eq!(cart.items[0].final_price, Some(d("90")));

        let inner_wins: Cart =
            serde_json::from_str(r#"{"items": {"key": {"id": "B1", "qty": 1}}}"#).expect("cart");
        assert_eq!(inner_wins.items[0].id, "B1");
    }

    #[test]
    fn products_decode_from_array_or_map() {
        let from_map: KeyedList<Product> =
            serde_json::from_str(r#"{"A": {"id": "A", "price": 10, "stock": "4", "discount": null}}"#)
                .expect("map");
        let from_array: KeyedList<Product> =
            serde_json::from_str(r#"[{"id": "A", "price": 10.5, "stock": 4}]"#).expect("array");

        assert_eq!(from_map.0[0].stock, 4);
        assert_eq!(from_map.0[0].discount, Decimal::ZERO);
        assert_eq!(from_array.0[0].price, d("10.5"));
        assert_eq!(from_map.0[0].category_label(), DEFAULT_CATEGORY);
    }

    #[test]
    fn missing_or_null_series_decode_as_empty() {
        let snapshot: AnalyticsSnapshot = serde_json::from_str(
            r#"{"stats": {"total_sales": 10}, "daily_sales": null,
                "monthly_sales": [{"month": "Jan", "amount": 68000}],
                "category_sales": {"Dairy": 30, "Bakery": 45}}"#,
        )
        .expect("snapshot");

        assert!(snapshot.daily_sales.is_empty());
        assert!(snapshot.hourly_sales.is_empty());
        assert_eq!(snapshot.monthly_sales[0].label, "Jan");
        assert_eq!(snapshot.category_sales.len(), 2);
    }

    #[test]
    fn ack_accepts_both_status_styles() {
        let worker: Ack = serde_json::from_str(r#"{"success": true}"#).expect("worker");
        let customer: Ack = serde_json::from_str(r#"{"status": "ok"}"#).expect("customer");
        let failed: Ack =
            serde_json::from_str(r#"{"status": "error", "message": "Cart is empty"}"#).expect("err");

        assert!(worker.is_ok());
        assert!(customer.is_ok());
        assert!(!failed.is_ok());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            id: "A".into(),
            stock: Some(50),
            price: Some(d("120.5")),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).expect("json");
        assert_eq!(json, serde_json::json!({"id": "A", "stock": 50, "price": 120.5}));
    }

    #[test]
    fn discounted_price_rounds_to_paise() {
        let product = Product {
            id: "A".into(),
            name: "Tea".into(),
            price: d("120"),
            stock: 5,
            category: None,
            unit: None,
            image: None,
            discount: d("15"),
            promotion_description: None,
            promotion_expiry: None,
            last_updated: None,
        };
        assert_eq!(product.discounted_price(), d("102.00"));
    }
}

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{NewProduct, Product, ProductPatch, UiSettings},
    state::{StockTab, WorkerMode},
    ui::{modal::ModalPhase, session::Theme},
    view::{
        design::DesignCanvas,
        inventory::InventoryStats,
        promotions::PromotionEntry,
    },
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub promotion_description: String,
    #[serde(default)]
    pub promotion_expiry: String,
}

impl AddProductRequest {
    pub fn validate(self) -> AppResult<NewProduct> {
        let id = self.id.trim().to_string();
        let name = self.name.trim().to_string();
        if id.is_empty() || name.is_empty() {
            return Err(AppError::BadRequest("Product ID and name are required.".into()));
        }
        if self.price < Decimal::ZERO || self.stock < 0 {
            return Err(AppError::BadRequest("Price and stock cannot be negative.".into()));
        }
        let discount = self.discount.unwrap_or(Decimal::ZERO);
        if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&discount) {
            return Err(AppError::BadRequest("Discount must be between 0 and 100.".into()));
        }

        Ok(NewProduct {
            id,
            name,
            unit: self.unit.trim().to_string(),
            price: self.price,
            stock: self.stock,
            category: self.category.trim().to_string(),
            image: self.image.trim().to_string(),
            discount,
            promotion_description: self.promotion_description.trim().to_string(),
            promotion_expiry: self.promotion_expiry.trim().to_string(),
        })
    }
}

/// Edit modal fields as typed by the worker. Blank means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EditProductForm {
    pub id: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub promotion_description: String,
    #[serde(default)]
    pub promotion_expiry: String,
    #[serde(default)]
    pub image: String,
}

fn parse_field<T: FromStr>(raw: &str, field: &str) -> AppResult<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid {field}: {raw}")))
}

fn changed_text(raw: &str, current: Option<&str>) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty() && Some(raw) != current).then(|| raw.to_string())
}

impl EditProductForm {
    /// Pre-fills the modal from a table row.
    pub fn prefill(row: &Product) -> Self {
        Self {
            id: row.id.clone(),
            price: row.price.normalize().to_string(),
            stock: row.stock.to_string(),
            discount: row.discount.normalize().to_string(),
            promotion_description: row.promotion_description.clone().unwrap_or_default(),
            promotion_expiry: row.promotion_expiry.clone().unwrap_or_default(),
            image: row.image.clone().unwrap_or_default(),
        }
    }

    /// Keeps only non-empty fields whose value differs from `row`.
    pub fn into_patch(self, row: &Product) -> AppResult<ProductPatch> {
        let price = parse_field::<Decimal>(&self.price, "price")?;
        let stock = parse_field::<i64>(&self.stock, "stock")?;
        let discount = parse_field::<Decimal>(&self.discount, "discount")?;
        if price.is_some_and(|p| p < Decimal::ZERO) || stock.is_some_and(|s| s < 0) {
            return Err(AppError::BadRequest("Price and stock cannot be negative.".into()));
        }

        Ok(ProductPatch {
            id: row.id.clone(),
            price: price.filter(|p| *p != row.price),
            stock: stock.filter(|s| *s != row.stock),
            discount: discount.filter(|d| *d != row.discount),
            promotion_description: changed_text(
                &self.promotion_description,
                row.promotion_description.as_deref(),
            ),
            promotion_expiry: changed_text(&self.promotion_expiry, row.promotion_expiry.as_deref()),
            image: changed_text(&self.image, row.image.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingsRequest {
    pub theme_bg_color: Option<String>,
    pub theme_text_color: Option<String>,
    pub theme_nav_color: Option<String>,
    pub theme_button_color: Option<String>,
    pub promo_banner_text: Option<String>,
    pub promo_banner_image: Option<String>,
}

fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

impl SettingsRequest {
    pub fn validate(self) -> AppResult<UiSettings> {
        let colors = [
            ("background", &self.theme_bg_color),
            ("text", &self.theme_text_color),
            ("navigation", &self.theme_nav_color),
            ("button", &self.theme_button_color),
        ];
        for (name, value) in colors {
            if let Some(value) = value
                .as_deref()
                .filter(|v| !v.is_empty() && !is_hex_color(v))
            {
                return Err(AppError::BadRequest(format!(
                    "Invalid {name} colour {value}; expected #rrggbb."
                )));
            }
        }

        Ok(UiSettings {
            theme_bg_color: self.theme_bg_color,
            theme_text_color: self.theme_text_color,
            theme_nav_color: self.theme_nav_color,
            theme_button_color: self.theme_button_color,
            promo_banner_text: self.promo_banner_text,
            promo_banner_image: self.promo_banner_image,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ModeRequest {
    pub mode: WorkerMode,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TabRequest {
    pub tab: StockTab,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ThemeRequest {
    pub theme: Option<Theme>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TemplateRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GraphicRequest {
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DesignRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DesignOutcome {
    pub canvas: DesignCanvas,
    pub fallback_applied: bool,
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SpinWheelRequest {
    pub title: String,
    #[serde(default)]
    pub prizes: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkerInventory {
    pub stats: InventoryStats,
    pub categories: Vec<String>,
    pub rows: Vec<Product>,
    pub html: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromotionPool {
    pub entries: Vec<PromotionEntry>,
    /// Time to the next rotation, `MM:SS`.
    pub next_rotation: String,
    pub html: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsoleState {
    pub mode: WorkerMode,
    pub tab: StockTab,
    pub theme: Theme,
    pub logged_in: bool,
    pub editing: Option<EditProductForm>,
    pub canvas: DesignCanvas,
    pub panels: PanelPhases,
    /// `MM:SS` to the next rotation; only while the promotions manager is open.
    pub next_rotation: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PanelPhases {
    pub edit: ModalPhase,
    pub tools: ModalPhase,
    pub ai: ModalPhase,
    pub promotions: ModalPhase,
    pub spin_creator: ModalPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleFragment {
    Canvas,
    Templates,
    Graphics,
    Chat,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Product {
        Product {
            id: "52612D5C".into(),
            name: "Rice Bag 5kg".into(),
            price: "320".parse().expect("decimal"),
            stock: 50,
            category: Some("Grains".into()),
            unit: Some("bag".into()),
            image: Some("https://img/rice.jpg".into()),
            discount: Decimal::ZERO,
            promotion_description: None,
            promotion_expiry: None,
            last_updated: None,
        }
    }

    #[test]
    fn unchanged_prefill_produces_empty_patch() {
        let patch = EditProductForm::prefill(&row())
            .into_patch(&row())
            .expect("valid form");
        assert!(!patch.has_changes());
        assert_eq!(patch.id, "52612D5C");
    }

    #[test]
    fn patch_carries_only_changed_fields() {
        let mut form = EditProductForm::prefill(&row());
        form.stock = "45".into();
        form.price = "320.00".into();
        form.promotion_description = "Diwali offer".into();
        form.image = String::new();

        let patch = form.into_patch(&row()).expect("valid form");
        assert_eq!(patch.stock, Some(45));
        assert_eq!(patch.price, None);
        assert_eq!(patch.image, None);
        assert_eq!(patch.promotion_description.as_deref(), Some("Diwali offer"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let form = EditProductForm {
            id: "52612D5C".into(),
            stock: "lots".into(),
            ..Default::default()
        };
        assert!(matches!(form.into_patch(&row()), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn settings_colours_must_be_hex() {
        let bad = SettingsRequest {
            theme_bg_color: Some("red".into()),
            theme_text_color: None,
            theme_nav_color: None,
            theme_button_color: None,
            promo_banner_text: None,
            promo_banner_image: None,
        };
        assert!(bad.validate().is_err());

        let good = SettingsRequest {
            theme_bg_color: Some("#1a2B3c".into()),
            theme_text_color: Some(String::new()),
            theme_nav_color: None,
            theme_button_color: None,
            promo_banner_text: Some("Sale".into()),
            promo_banner_image: None,
        };
        assert_eq!(good.validate().expect("valid").theme_bg_color.as_deref(), Some("#1a2B3c"));
    }

    #[test]
    fn new_product_requires_id_and_name() {
        let req = AddProductRequest {
            id: " ".into(),
            name: "Soap".into(),
            unit: String::new(),
            price: Decimal::TEN,
            stock: 1,
            category: String::new(),
            image: String::new(),
            discount: None,
            promotion_description: String::new(),
            promotion_expiry: String::new(),
        };
        assert!(req.validate().is_err());
    }
}

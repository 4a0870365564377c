use serde::Deserialize;
use utoipa::ToSchema;

use crate::view::inventory::{ProductFilter, StockFilter};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CatalogQuery {
    /// Category name, `all` for every category.
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InventoryQuery {
    /// Matches product name or id, case-insensitive.
    pub q: Option<String>,
    pub category: Option<String>,
    pub stock: Option<StockFilter>,
}

impl InventoryQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter::new(
            self.q.as_deref(),
            self.category.as_deref(),
            self.stock.unwrap_or_default(),
        )
    }
}

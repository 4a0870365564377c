//! Per-trolley UI state that outlives a single render.
//!
//! [`Preferences`] survive a customer change (language, theme, the pending
//! spin discount until checkout succeeds). [`SessionFlags`] belong to one
//! shopping session and are wiped by "new customer".

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{pricing::DiscountToken, ui::i18n::Language, ui::pairing::PairingData};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
    /// Prize text as won, e.g. `"10% OFF"`.
    pub spin_discount: Option<String>,
}

impl Preferences {
    pub fn discount_token(&self) -> Option<DiscountToken> {
        self.spin_discount.as_deref().and_then(DiscountToken::parse)
    }

    /// Percent sent with checkout; zero without a percentage prize.
    pub fn checkout_discount(&self) -> u32 {
        self.discount_token()
            .map(|t| t.checkout_percent())
            .unwrap_or(0)
    }
}

/// Per-customer flags. A new customer gets a new id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SessionFlags {
    pub id: Uuid,
    pub spin_wheel_shown: bool,
    pub pairing_data: Option<PairingData>,
    pub phone_connected: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            spin_wheel_shown: false,
            pairing_data: None,
            phone_connected: false,
        }
    }
}

//! Access to the trolley backend.
//!
//! The backend is an opaque HTTP service and the only source of truth. Views
//! talk to it exclusively through [`TrolleyBackend`] so tests can substitute
//! a scripted implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    Ack, AnalyticsSnapshot, Cart, ChatReply, Credentials, CurrentPromotion, DesignReply,
    NewProduct, NewPromotion, Product, ProductPatch, Promotion, SeriesPoint, UiSettings,
};

pub mod http;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("worker session expired")]
    Unauthorized,

    #[error("{0}")]
    Rejected(String),

    #[error("invalid backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Http(_) => "Failed to reach the store server.".to_string(),
            BackendError::Status { status, message } if message.is_empty() => {
                format!("Request failed with status {status}.")
            }
            BackendError::Status { message, .. } => message.clone(),
            BackendError::Unauthorized => "Session expired. Please login again.".to_string(),
            BackendError::Rejected(message) => message.clone(),
            BackendError::Decode(_) => "Received an invalid response from the server.".to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

impl Ack {
    /// Turns `success: false` / `status: "error"` into [`BackendError::Rejected`]
    /// carrying the backend's message, or `fallback` when it sent none.
    pub fn accepted(self, fallback: &str) -> BackendResult<Ack> {
        if self.is_ok() {
            return Ok(self);
        }
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(BackendError::Rejected(message))
    }
}

#[async_trait]
pub trait TrolleyBackend: Send + Sync {
    async fn products(&self) -> BackendResult<Vec<Product>>;
    async fn cart(&self) -> BackendResult<Cart>;
    async fn scan(&self, uid: &str) -> BackendResult<Ack>;
    async fn remove_from_cart(&self, uid: &str) -> BackendResult<Ack>;
    async fn checkout(&self, discount_percent: u32) -> BackendResult<Ack>;
    async fn settings(&self) -> BackendResult<UiSettings>;
    async fn current_promotion(&self) -> BackendResult<CurrentPromotion>;

    async fn admin_login(&self, credentials: &Credentials) -> BackendResult<Ack>;
    async fn analytics(&self, end_date: Option<NaiveDate>) -> BackendResult<AnalyticsSnapshot>;
    async fn inventory(&self) -> BackendResult<Vec<Product>>;
    async fn daily_sales(&self) -> BackendResult<Vec<SeriesPoint>>;
    async fn monthly_sales(&self) -> BackendResult<Vec<SeriesPoint>>;
    async fn chat(&self, message: &str) -> BackendResult<ChatReply>;

    async fn worker_login(&self, credentials: &Credentials) -> BackendResult<Ack>;
    async fn worker_logout(&self) -> BackendResult<Ack>;
    async fn worker_products(&self) -> BackendResult<Vec<Product>>;
    async fn add_product(&self, product: &NewProduct) -> BackendResult<Ack>;
    async fn update_product(&self, patch: &ProductPatch) -> BackendResult<Ack>;
    async fn delete_product(&self, id: &str) -> BackendResult<Ack>;
    async fn save_settings(&self, settings: &UiSettings) -> BackendResult<Ack>;
    async fn promotions(&self) -> BackendResult<Vec<Promotion>>;
    async fn add_promotion(&self, promotion: &NewPromotion) -> BackendResult<Ack>;
    async fn delete_promotion(&self, id: i64) -> BackendResult<Ack>;
    async fn generate_design(&self, prompt: &str) -> BackendResult<DesignReply>;

    /// Whether `url` serves an image within the probe timeout.
    async fn image_loads(&self, url: &str) -> bool;
}

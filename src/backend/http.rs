//! reqwest-backed [`TrolleyBackend`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{BackendError, BackendResult, TrolleyBackend};
use crate::models::{
    Ack, AnalyticsSnapshot, Cart, ChatReply, Credentials, CurrentPromotion, DesignReply, KeyedList,
    NewProduct, NewPromotion, Product, ProductPatch, Promotion, SeriesPoint, UiSettings,
};

pub const IMAGE_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the trolley backend. Worker and admin logins are cookie
/// sessions, so the client keeps a cookie store.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                return Err(BackendError::Unauthorized);
            }
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(Into::into)
    }
}

#[async_trait]
impl TrolleyBackend for HttpBackend {
    async fn products(&self) -> BackendResult<Vec<Product>> {
        Ok(self.get::<KeyedList<Product>>("/products").await?.0)
    }

    async fn cart(&self) -> BackendResult<Cart> {
        self.get("/cart").await
    }

    async fn scan(&self, uid: &str) -> BackendResult<Ack> {
        self.post("/rfid", &json!({ "uid": uid })).await
    }

    async fn remove_from_cart(&self, uid: &str) -> BackendResult<Ack> {
        self.post("/cart/remove", &json!({ "uid": uid })).await
    }

    async fn checkout(&self, discount_percent: u32) -> BackendResult<Ack> {
        self.post("/checkout", &json!({ "discount": discount_percent }))
            .await
    }

    async fn settings(&self) -> BackendResult<UiSettings> {
        self.get("/api/settings").await
    }

    async fn current_promotion(&self) -> BackendResult<CurrentPromotion> {
        self.get("/api/promotions/current").await
    }

    async fn admin_login(&self, credentials: &Credentials) -> BackendResult<Ack> {
        self.post("/api/admin/login", credentials).await
    }

    async fn analytics(&self, end_date: Option<NaiveDate>) -> BackendResult<AnalyticsSnapshot> {
        let path = match end_date {
            Some(date) => format!("/api/admin/analytics?end_date={}", date.format("%Y-%m-%d")),
            None => "/api/admin/analytics".to_string(),
        };
        self.get(&path).await
    }

    async fn inventory(&self) -> BackendResult<Vec<Product>> {
        Ok(self.get::<KeyedList<Product>>("/inventory").await?.0)
    }

    async fn daily_sales(&self) -> BackendResult<Vec<SeriesPoint>> {
        Ok(self.get::<KeyedList<SeriesPoint>>("/sales/daily").await?.0)
    }

    async fn monthly_sales(&self) -> BackendResult<Vec<SeriesPoint>> {
        Ok(self.get::<KeyedList<SeriesPoint>>("/sales/monthly").await?.0)
    }

    async fn chat(&self, message: &str) -> BackendResult<ChatReply> {
        self.post("/chat", &json!({ "message": message })).await
    }

    async fn worker_login(&self, credentials: &Credentials) -> BackendResult<Ack> {
        self.post("/api/worker/login", credentials).await
    }

    async fn worker_logout(&self) -> BackendResult<Ack> {
        self.post_empty("/api/worker/logout").await
    }

    async fn worker_products(&self) -> BackendResult<Vec<Product>> {
        Ok(self.get::<KeyedList<Product>>("/api/worker/products").await?.0)
    }

    async fn add_product(&self, product: &NewProduct) -> BackendResult<Ack> {
        self.post("/api/worker/add-product", product).await
    }

    async fn update_product(&self, patch: &ProductPatch) -> BackendResult<Ack> {
        self.post("/api/worker/update-product", patch).await
    }

    async fn delete_product(&self, id: &str) -> BackendResult<Ack> {
        self.post("/api/worker/delete-product", &json!({ "id": id }))
            .await
    }

    async fn save_settings(&self, settings: &UiSettings) -> BackendResult<Ack> {
        self.post("/api/worker/settings", settings).await
    }

    async fn promotions(&self) -> BackendResult<Vec<Promotion>> {
        Ok(self
            .get::<KeyedList<Promotion>>("/api/worker/promotions/list")
            .await?
            .0)
    }

    async fn add_promotion(&self, promotion: &NewPromotion) -> BackendResult<Ack> {
        self.post("/api/worker/promotions/add", promotion).await
    }

    async fn delete_promotion(&self, id: i64) -> BackendResult<Ack> {
        self.delete(&format!("/api/worker/promotions/{id}")).await
    }

    async fn generate_design(&self, prompt: &str) -> BackendResult<DesignReply> {
        self.post("/api/ai/design", &json!({ "prompt": prompt }))
            .await
    }

    async fn image_loads(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        if let Some(data) = url.strip_prefix("data:") {
            return data.starts_with("image/");
        }

        let response = match self
            .client
            .get(url)
            .timeout(IMAGE_PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(url, error = %err, "image probe failed");
                return false;
            }
        };

        response.status().is_success()
            && response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with("image/"))
    }
}

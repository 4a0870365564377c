#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::{SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use trolley_console::{
    backend::{BackendError, BackendResult, TrolleyBackend},
    config::{AppConfig, PollingConfig},
    models::{
        Ack, AnalyticsSnapshot, Cart, CartItem, ChatReply, Credentials, CurrentPromotion,
        DesignReply, NewProduct, NewPromotion, Product, ProductPatch, Promotion, PromotionContent,
        PromotionKind, SeriesPoint, UiSettings,
    },
    state::AppState,
};

pub fn d(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

pub fn ok() -> Ack {
    Ack {
        status: Some("ok".into()),
        success: Some(true),
        ..Default::default()
    }
}

pub fn rejected(message: &str) -> Ack {
    Ack {
        status: Some("error".into()),
        success: Some(false),
        message: Some(message.into()),
        ..Default::default()
    }
}

pub fn product(id: &str, name: &str, price: &str, stock: i64, category: &str) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        price: d(price),
        stock,
        category: Some(category.into()),
        unit: Some("1 pc".into()),
        image: None,
        discount: Decimal::ZERO,
        promotion_description: None,
        promotion_expiry: None,
        last_updated: None,
    }
}

pub fn cart_of(items: &[(&str, &str, &str, i64)]) -> Cart {
    let items: Vec<CartItem> = items
        .iter()
        .map(|(id, name, price, qty)| CartItem {
            id: (*id).into(),
            name: (*name).into(),
            price: d(price),
            qty: *qty,
            unit: None,
            image: None,
            discount: Decimal::ZERO,
            final_price: None,
        })
        .collect();
    let total = items.iter().map(CartItem::line_total).sum();
    Cart { items, total }
}

pub fn promotion(id: i64, kind: PromotionKind, title: &str, prizes: &[&str]) -> Promotion {
    Promotion {
        id,
        kind,
        title: Some(title.into()),
        content: PromotionContent {
            prizes: prizes.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        },
        active: true,
        created_at: None,
        last_shown: None,
    }
}

/// Scripted store server. Every call is counted; writes are recorded.
#[derive(Default)]
pub struct MockBackend {
    pub products: Mutex<Vec<Product>>,
    pub cart: Mutex<Cart>,
    pub current_promotion: Mutex<CurrentPromotion>,
    pub analytics: Mutex<AnalyticsSnapshot>,
    pub inventory: Mutex<Vec<Product>>,
    pub worker_products: Mutex<Vec<Product>>,
    pub promotions: Mutex<Vec<Promotion>>,
    pub settings: Mutex<UiSettings>,
    pub checkout_ack: Mutex<Option<Ack>>,
    pub scan_ack: Mutex<Option<Ack>>,
    pub design_reply: Mutex<Option<DesignReply>>,
    pub loadable_images: Mutex<Vec<String>>,
    pub chat_fails: AtomicBool,
    pub cart_fails: AtomicBool,
    pub worker_session_expired: AtomicBool,

    pub cart_calls: AtomicUsize,
    pub analytics_calls: AtomicUsize,
    pub worker_product_calls: AtomicUsize,
    pub promotion_list_calls: AtomicUsize,
    pub update_calls: AtomicUsize,

    pub checkout_discounts: Mutex<Vec<u32>>,
    pub patches: Mutex<Vec<ProductPatch>>,
    pub added_products: Mutex<Vec<NewProduct>>,
    pub added_promotions: Mutex<Vec<NewPromotion>>,
    pub deleted_products: Mutex<Vec<String>>,
    pub probed_images: Mutex<Vec<String>>,
    pub analytics_dates: Mutex<Vec<Option<NaiveDate>>>,
}

impl MockBackend {
    fn worker_guard(&self) -> BackendResult<()> {
        if self.worker_session_expired.load(Ordering::SeqCst) {
            return Err(BackendError::Unauthorized);
        }
        Ok(())
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrolleyBackend for MockBackend {
    async fn products(&self) -> BackendResult<Vec<Product>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn cart(&self) -> BackendResult<Cart> {
        self.cart_calls.fetch_add(1, Ordering::SeqCst);
        if self.cart_fails.load(Ordering::SeqCst) {
            return Err(BackendError::Status {
                status: 503,
                message: "cart unavailable".into(),
            });
        }
        Ok(self.cart.lock().unwrap().clone())
    }

    async fn scan(&self, uid: &str) -> BackendResult<Ack> {
        if let Some(ack) = self.scan_ack.lock().unwrap().clone() {
            return Ok(ack);
        }
        let found = self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == uid)
            .cloned();
        let Some(product) = found else {
            return Ok(rejected("Product not found"));
        };
        let mut cart = self.cart.lock().unwrap();
        match cart.items.iter_mut().find(|item| item.id == uid) {
            Some(item) => item.qty += 1,
            None => cart.items.push(CartItem {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                qty: 1,
                unit: product.unit.clone(),
                image: product.image.clone(),
                discount: Decimal::ZERO,
                final_price: None,
            }),
        }
        cart.total = cart.items.iter().map(CartItem::line_total).sum();
        Ok(ok())
    }

    async fn remove_from_cart(&self, uid: &str) -> BackendResult<Ack> {
        let mut cart = self.cart.lock().unwrap();
        if let Some(item) = cart.items.iter_mut().find(|item| item.id == uid) {
            item.qty -= 1;
        }
        cart.items.retain(|item| item.qty > 0);
        cart.total = cart.items.iter().map(CartItem::line_total).sum();
        Ok(ok())
    }

    async fn checkout(&self, discount_percent: u32) -> BackendResult<Ack> {
        self.checkout_discounts.lock().unwrap().push(discount_percent);
        let ack = self.checkout_ack.lock().unwrap().clone().unwrap_or_else(ok);
        if ack.is_ok() {
            *self.cart.lock().unwrap() = Cart::default();
        }
        Ok(ack)
    }

    async fn settings(&self) -> BackendResult<UiSettings> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn current_promotion(&self) -> BackendResult<CurrentPromotion> {
        Ok(self.current_promotion.lock().unwrap().clone())
    }

    async fn admin_login(&self, credentials: &Credentials) -> BackendResult<Ack> {
        if credentials.password == "admin123" {
            Ok(ok())
        } else {
            Ok(rejected("Invalid credentials"))
        }
    }

    async fn analytics(&self, end_date: Option<NaiveDate>) -> BackendResult<AnalyticsSnapshot> {
        self.analytics_calls.fetch_add(1, Ordering::SeqCst);
        self.analytics_dates.lock().unwrap().push(end_date);
        Ok(self.analytics.lock().unwrap().clone())
    }

    async fn inventory(&self) -> BackendResult<Vec<Product>> {
        Ok(self.inventory.lock().unwrap().clone())
    }

    async fn daily_sales(&self) -> BackendResult<Vec<SeriesPoint>> {
        Ok(vec![
            SeriesPoint::new("2024-03-01", d("100")),
            SeriesPoint::new("2024-03-02", d("150")),
        ])
    }

    async fn monthly_sales(&self) -> BackendResult<Vec<SeriesPoint>> {
        Ok(vec![SeriesPoint::new("2024-03", d("2500"))])
    }

    async fn chat(&self, message: &str) -> BackendResult<ChatReply> {
        if self.chat_fails.load(Ordering::SeqCst) {
            return Err(BackendError::Status {
                status: 500,
                message: String::new(),
            });
        }
        Ok(ChatReply {
            reply: format!("You said: {message}"),
        })
    }

    async fn worker_login(&self, credentials: &Credentials) -> BackendResult<Ack> {
        if credentials.password == "worker123" {
            self.worker_session_expired.store(false, Ordering::SeqCst);
            Ok(ok())
        } else {
            Ok(rejected("Invalid credentials"))
        }
    }

    async fn worker_logout(&self) -> BackendResult<Ack> {
        Ok(ok())
    }

    async fn worker_products(&self) -> BackendResult<Vec<Product>> {
        self.worker_guard()?;
        self.worker_product_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.worker_products.lock().unwrap().clone())
    }

    async fn add_product(&self, product: &NewProduct) -> BackendResult<Ack> {
        self.worker_guard()?;
        let mut rows = self.worker_products.lock().unwrap();
        if rows.iter().any(|p| p.id == product.id) {
            return Ok(rejected("Product ID already exists"));
        }
        let mut row = self::product(&product.id, &product.name, "0", product.stock, &product.category);
        row.price = product.price;
        rows.push(row);
        self.added_products.lock().unwrap().push(product.clone());
        Ok(ok())
    }

    async fn update_product(&self, patch: &ProductPatch) -> BackendResult<Ack> {
        self.worker_guard()?;
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.patches.lock().unwrap().push(patch.clone());
        let mut rows = self.worker_products.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|p| p.id == patch.id) {
            if let Some(price) = patch.price {
                row.price = price;
            }
            if let Some(stock) = patch.stock {
                row.stock = stock;
            }
        }
        Ok(ok())
    }

    async fn delete_product(&self, id: &str) -> BackendResult<Ack> {
        self.worker_guard()?;
        self.deleted_products.lock().unwrap().push(id.to_string());
        self.worker_products.lock().unwrap().retain(|p| p.id != id);
        Ok(ok())
    }

    async fn save_settings(&self, settings: &UiSettings) -> BackendResult<Ack> {
        self.worker_guard()?;
        *self.settings.lock().unwrap() = settings.clone();
        Ok(ok())
    }

    async fn promotions(&self) -> BackendResult<Vec<Promotion>> {
        self.worker_guard()?;
        self.promotion_list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.promotions.lock().unwrap().clone())
    }

    async fn add_promotion(&self, promotion: &NewPromotion) -> BackendResult<Ack> {
        self.worker_guard()?;
        self.added_promotions.lock().unwrap().push(promotion.clone());
        Ok(ok())
    }

    async fn delete_promotion(&self, id: i64) -> BackendResult<Ack> {
        self.worker_guard()?;
        self.promotions.lock().unwrap().retain(|p| p.id != id);
        Ok(ok())
    }

    async fn generate_design(&self, _prompt: &str) -> BackendResult<DesignReply> {
        Ok(self.design_reply.lock().unwrap().clone().unwrap_or(DesignReply {
            success: false,
            design: None,
            note: None,
            message: None,
        }))
    }

    async fn image_loads(&self, url: &str) -> bool {
        self.probed_images.lock().unwrap().push(url.to_string());
        self.loadable_images.lock().unwrap().iter().any(|u| u == url)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        backend_url: "http://backend.test".into(),
        host: "127.0.0.1".into(),
        port: 0,
        backend_timeout: Duration::from_secs(1),
        polling: PollingConfig::default(),
    }
}

pub fn state_with(backend: Arc<MockBackend>) -> AppState {
    AppState::with_rng(test_config(), backend, StdRng::seed_from_u64(7))
}

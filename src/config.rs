use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub host: String,
    pub port: u16,
    pub backend_timeout: Duration,
    pub polling: PollingConfig,
}

/// Cadences of the background pollers.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub cart: Duration,
    pub promotions: Duration,
    pub analytics: Duration,
    pub worker_products: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            cart: Duration::from_secs(2),
            promotions: Duration::from_secs(5),
            analytics: Duration::from_secs(30),
            worker_products: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url = env::var("BACKEND_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = PollingConfig::default();
        let polling = PollingConfig {
            cart: secs_from_env("CART_POLL_SECS", defaults.cart),
            promotions: secs_from_env("PROMO_POLL_SECS", defaults.promotions),
            analytics: secs_from_env("ANALYTICS_POLL_SECS", defaults.analytics),
            worker_products: secs_from_env("WORKER_POLL_SECS", defaults.worker_products),
        };

        Ok(Self {
            port,
            backend_url,
            host,
            backend_timeout: secs_from_env("BACKEND_TIMEOUT_SECS", Duration::from_secs(10)),
            polling,
        })
    }
}

fn secs_from_env(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

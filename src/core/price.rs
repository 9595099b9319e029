//! Live stablecoin price abstractions

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

pub const FALLBACK_PRICE: f64 = 1.0;

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the USD price of a single asset.
    async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64>;
}

/// Last known stablecoin price, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePrice {
    /// `None` until the first fetch completes.
    pub price: Option<f64>,
    pub updated_at: DateTime<Local>,
    pub loading: bool,
}

impl LivePrice {
    pub fn new() -> Self {
        Self {
            price: None,
            updated_at: Local::now(),
            loading: true,
        }
    }

    pub fn display_price(&self) -> f64 {
        self.price.unwrap_or(FALLBACK_PRICE)
    }
}

impl Default for LivePrice {
    fn default() -> Self {
        Self::new()
    }
}

//! Background refresh of the live stablecoin price.

use crate::core::config::AppConfig;
use crate::core::price::{LivePrice, PriceProvider};
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub asset_id: String,
    pub interval: Duration,
    pub fallback_price: f64,
}

impl From<&AppConfig> for PollerConfig {
    fn from(config: &AppConfig) -> Self {
        PollerConfig {
            asset_id: config.asset_id.clone(),
            interval: config.poll_interval(),
            fallback_price: config.fallback_price,
        }
    }
}

/// Owns the running poll task. Dropping the handle cancels it.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    receiver: watch::Receiver<LivePrice>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<LivePrice> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> LivePrice {
        self.receiver.borrow().clone()
    }

    /// Cancels the interval and waits for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Price poller task ended abnormally");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub struct PricePoller;

impl PricePoller {
    /// Starts polling immediately, then once per `config.interval`.
    pub fn spawn(provider: Arc<dyn PriceProvider>, config: PollerConfig) -> PollerHandle {
        let (sender, receiver) = watch::channel(LivePrice::new());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(provider, config, sender, cancel.clone()));

        PollerHandle {
            cancel,
            task: Some(task),
            receiver,
        }
    }
}

async fn run(
    provider: Arc<dyn PriceProvider>,
    config: PollerConfig,
    sender: watch::Sender<LivePrice>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        debug!(asset_id = %config.asset_id, "Refreshing live price");
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = refresh(provider.as_ref(), &config, &sender) => {}
        }
    }

    info!("Price poller stopped");
}

/// Performs one fetch and publishes the outcome. Failures publish the
/// fallback price and keep the previous timestamp.
pub async fn refresh(
    provider: &dyn PriceProvider,
    config: &PollerConfig,
    sender: &watch::Sender<LivePrice>,
) {
    match provider.fetch_usd_price(&config.asset_id).await {
        Ok(price) => {
            debug!(price, "Live price updated");
            sender.send_modify(|live| {
                live.price = Some(price);
                live.updated_at = Local::now();
                live.loading = false;
            });
        }
        Err(e) => {
            warn!(error = %e, fallback = config.fallback_price, "Price fetch failed, using fallback");
            sender.send_modify(|live| {
                live.price = Some(config.fallback_price);
                live.loading = false;
            });
        }
    }
}

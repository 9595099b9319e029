use super::dashboard::Dashboard;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::{CalculationInput, LivePrice, PriceProvider};
use crate::poller::{self, PollerConfig};
use anyhow::Result;
use tokio::sync::watch;

/// Fetches the live price once and renders the dashboard a single time.
pub async fn run(
    config: &AppConfig,
    input: CalculationInput,
    provider: &dyn PriceProvider,
) -> Result<()> {
    let (sender, receiver) = watch::channel(LivePrice::new());

    let spinner = ui::new_spinner("Fetching live USDC price...");
    poller::refresh(provider, &PollerConfig::from(config), &sender).await;
    spinner.finish_and_clear();

    let live = receiver.borrow().clone();
    let mut dashboard = Dashboard::new(input);
    println!("{}", dashboard.render(&live));
    Ok(())
}

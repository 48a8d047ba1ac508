//! Fixed-interval polling loop.
//!
//! Probes every requested strategy immediately, then again each interval,
//! until the process is killed. Strategies within a tick are launched as
//! independent tasks — a failed probe never suppresses its sibling or any
//! future tick. No jitter, no catch-up on missed ticks.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::models::Strategy;
use crate::probe::Prober;

/// Never returns in normal operation; the `Result` exists so `main` can
/// propagate it with `?`.
pub async fn run(prober: Arc<Prober>, strategies: Vec<Strategy>, interval: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);

    loop {
        // First tick completes immediately.
        ticker.tick().await;

        for &strategy in &strategies {
            let prober = Arc::clone(&prober);
            tokio::spawn(async move {
                if let Err(e) = prober.probe(strategy).await {
                    eprintln!("{} probe failed: {:#}", strategy, e);
                }
            });
        }
    }
}

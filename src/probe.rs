//! One complete measurement cycle: request, extract, display, persist.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::Config;
use crate::extract::{self, PagespeedResponse};
use crate::models::{page_url, MeasurementRecord, MetricsMode, Strategy};
use crate::store::ResultStore;

pub struct Prober {
    client: reqwest::Client,
    store: ResultStore,
    domain: String,
    page_url: String,
    api_base: String,
    api_key: String,
    metrics_mode: MetricsMode,
    interval_secs: u64,
    /// One-time startup banner latch. UX state only — owned by the instance
    /// so nothing leaks across runs.
    has_announced_startup: AtomicBool,
}

impl Prober {
    pub fn new(
        config: &Config,
        domain: String,
        api_key: String,
        metrics_mode: MetricsMode,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            store: ResultStore::new(config.data_dir.clone()),
            page_url: page_url(&domain),
            domain,
            api_base: config.api_base.clone(),
            api_key,
            metrics_mode,
            interval_secs: config.interval_secs,
            has_announced_startup: AtomicBool::new(false),
        })
    }

    /// Resolved API endpoint for one strategy.
    pub fn endpoint(&self, strategy: Strategy) -> String {
        format!(
            "{}?url={}&key={}&strategy={}",
            self.api_base, self.page_url, self.api_key, strategy
        )
    }

    /// Run one measurement cycle for one strategy.
    ///
    /// Transport, parse, and extraction failures abort only this attempt;
    /// the caller's schedule is unaffected. A persistence failure after a
    /// successful measurement is logged with the file path and otherwise
    /// swallowed — the record was already printed.
    pub async fn probe(&self, strategy: Strategy) -> Result<()> {
        let endpoint = self.endpoint(strategy);

        if !self.has_announced_startup.swap(true, Ordering::SeqCst) {
            self.print_banner(strategy, &endpoint);
        }

        let response = self.fetch(&endpoint).await?;
        let record = extract::extract_record(&response, self.metrics_mode)
            .with_context(|| format!("Unexpected response shape from endpoint: {}", endpoint))?;

        self.print_record(strategy, &record);

        let today = chrono::Local::now().date_naive();
        if let Err(e) = self
            .store
            .append(&self.domain, today, strategy, &record)
            .await
        {
            eprintln!("Warning: failed to persist record: {:#}", e);
        }

        Ok(())
    }

    async fn fetch(&self, endpoint: &str) -> Result<PagespeedResponse> {
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .with_context(|| format!("Failed to fetch data from endpoint: {}", endpoint))?;

        response
            .json::<PagespeedResponse>()
            .await
            .with_context(|| format!("Failed to parse response from endpoint: {}", endpoint))
    }

    fn print_banner(&self, strategy: Strategy, endpoint: &str) {
        println!(
            "Running {} page speed test on:",
            strategy.as_str().to_uppercase()
        );
        println!("{}", self.page_url);
        println!();
        println!("API endpoint:");
        println!("{}", endpoint);
        println!();
        println!("Checking every {} seconds", self.interval_secs);
        println!();
    }

    fn print_record(&self, strategy: Strategy, record: &MeasurementRecord) {
        println!(
            "{} page speed score: {}",
            strategy.as_str().to_uppercase(),
            record.score
        );

        let timings = record.timing_metrics();
        if !timings.is_empty() {
            println!("{:<28} {:>12}", "METRIC", "VALUE");
            for (label, value) in timings {
                println!("{:<28} {:>12}", label, value);
            }
        }
        println!();
    }
}

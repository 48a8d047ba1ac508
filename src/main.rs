//! # speedwatch CLI
//!
//! Polls the PageSpeed Insights API for a domain and accumulates per-day
//! metric logs.
//!
//! ## Usage
//!
//! ```bash
//! speedwatch run <domain> [strategy] [metrics-mode]
//! ```
//!
//! - `domain` — required; must contain at least one `.`
//! - `strategy` — `mobile` (default), `desktop`, or `both`
//! - `metrics-mode` — `default` for full timing metrics; omit for score only
//!
//! The API key is read from the `PSI_API_KEY` environment variable. An
//! optional TOML config (`--config`, default `./config/speedwatch.toml`)
//! can override the data directory, polling interval, request timeout, and
//! API base URL.
//!
//! Any usage error exits with status 1 before a single request is made.
//! Once running, the process polls forever until killed.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use speedwatch::config;
use speedwatch::models::{MetricsMode, StrategyArg};
use speedwatch::probe::Prober;
use speedwatch::scheduler;

/// speedwatch — periodic page speed measurement with daily JSON logs.
#[derive(Parser)]
#[command(
    name = "speedwatch",
    about = "Polls the PageSpeed Insights API for a domain and accumulates per-day metric logs",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). All settings have defaults, so
    /// the file may be absent.
    #[arg(long, global = true, default_value = "./config/speedwatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start polling a domain.
    ///
    /// Probes immediately, then on every interval tick, forever. With
    /// strategy `both`, mobile and desktop are probed independently
    /// each tick.
    Run {
        /// Domain to measure (e.g. `example.com`). Must contain a `.`.
        domain: String,

        /// Device strategy: `mobile` (default), `desktop`, or `both`.
        strategy: Option<String>,

        /// Pass `default` to extract the five timing metrics in addition
        /// to the performance score.
        metrics_mode: Option<String>,
    },
}

fn usage() -> ! {
    eprintln!();
    eprintln!("Usage: speedwatch run <domain> [mobile|desktop|both] [default]");
    eprintln!("Example: speedwatch run mysite.com");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Clap's own exit codes vary; every usage failure here is 1.
            // Help and version requests are not failures.
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    match cli.command {
        Commands::Run {
            domain,
            strategy,
            metrics_mode,
        } => {
            if !domain.contains('.') {
                eprintln!("Please provide a valid domain");
                eprintln!("You provided: {}", domain);
                usage();
            }

            let strategies = match strategy.as_deref().unwrap_or("mobile").parse::<StrategyArg>() {
                Ok(arg) => arg.expand(),
                Err(e) => {
                    eprintln!("{}", e);
                    usage();
                }
            };

            let metrics_mode = match metrics_mode.as_deref() {
                None => MetricsMode::ScoreOnly,
                Some("default") => MetricsMode::Full,
                Some(other) => {
                    eprintln!("Unrecognized metrics mode: {}", other);
                    usage();
                }
            };

            let api_key = std::env::var("PSI_API_KEY")
                .map_err(|_| anyhow::anyhow!("PSI_API_KEY environment variable not set"))?;

            let cfg = config::load_config(&cli.config)?;
            let interval = Duration::from_secs(cfg.interval_secs);

            let prober = Arc::new(Prober::new(&cfg, domain, api_key, metrics_mode)?);
            scheduler::run(prober, strategies, interval).await
        }
    }
}

//! # speedwatch
//!
//! A long-running CLI that polls the PageSpeed Insights API for one domain,
//! extracts a fixed set of scalar metrics from each response, prints them,
//! and appends them to a per-day, per-domain JSON log file.
//!
//! ## Data flow
//!
//! ```text
//! ┌───────────┐   ┌─────────┐   ┌────────────┐   ┌─────────────┐
//! │ Scheduler │──▶│ Prober  │──▶│ Extractor  │──▶│ ResultStore │
//! │ (1/min)   │   │ (HTTP)  │   │ (typed)    │   │ (JSON file) │
//! └───────────┘   └─────────┘   └────────────┘   └─────────────┘
//!                                     │
//!                                     ▼
//!                                  console
//! ```
//!
//! ## Quick start
//!
//! ```bash
//! export PSI_API_KEY=...
//! speedwatch run example.com               # mobile, score only
//! speedwatch run example.com both default  # both strategies, full metrics
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with defaults |
//! | [`models`] | Strategies, metric records, log documents |
//! | [`extract`] | Typed response model and metric extraction |
//! | [`store`] | Per-day per-domain JSON log accumulation |
//! | [`probe`] | One measurement cycle (request → print → persist) |
//! | [`scheduler`] | Fixed-interval polling loop |

pub mod config;
pub mod extract;
pub mod models;
pub mod probe;
pub mod scheduler;
pub mod store;

//! Core data models used throughout speedwatch.
//!
//! These types represent the device strategies, metric records, and daily
//! log documents that flow through the probe-and-persist pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Device profile the measurement API should simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    /// Lowercase wire/log-file name for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy as accepted on the command line. `both` is a request-time
/// expansion into two independent probes, never a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Mobile,
    Desktop,
    Both,
}

impl StrategyArg {
    /// Expand into the concrete strategies to probe each tick.
    pub fn expand(&self) -> Vec<Strategy> {
        match self {
            StrategyArg::Mobile => vec![Strategy::Mobile],
            StrategyArg::Desktop => vec![Strategy::Desktop],
            StrategyArg::Both => vec![Strategy::Mobile, Strategy::Desktop],
        }
    }
}

impl FromStr for StrategyArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(StrategyArg::Mobile),
            "desktop" => Ok(StrategyArg::Desktop),
            "both" => Ok(StrategyArg::Both),
            other => anyhow::bail!(
                "Invalid strategy '{}'. Must be mobile, desktop, or both.",
                other
            ),
        }
    }
}

/// Which metrics a probe extracts: just the performance score, or the
/// score plus the five Lighthouse timing audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsMode {
    ScoreOnly,
    Full,
}

impl MetricsMode {
    pub fn is_full(&self) -> bool {
        matches!(self, MetricsMode::Full)
    }
}

/// One measurement taken from a single API response.
///
/// Serializes to a flat JSON object: `"score"` is always present (0–100);
/// the timing metrics appear only in full mode. Values are bare numbers —
/// units from the source `displayValue` strings are stripped on extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub score: f64,

    #[serde(rename = "first-contentful-paint", skip_serializing_if = "Option::is_none")]
    pub first_contentful_paint: Option<f64>,

    #[serde(rename = "total-blocking-time", skip_serializing_if = "Option::is_none")]
    pub total_blocking_time: Option<f64>,

    #[serde(rename = "largest-contentful-paint", skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint: Option<f64>,

    #[serde(rename = "speed-index", skip_serializing_if = "Option::is_none")]
    pub speed_index: Option<f64>,

    #[serde(rename = "cumulative-layout-shift", skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<f64>,
}

impl MeasurementRecord {
    /// Score-only record with no timing metrics.
    pub fn score_only(score: f64) -> Self {
        Self {
            score,
            first_contentful_paint: None,
            total_blocking_time: None,
            largest_contentful_paint: None,
            speed_index: None,
            cumulative_layout_shift: None,
        }
    }

    /// Labeled timing metrics present on this record, in display order.
    pub fn timing_metrics(&self) -> Vec<(&'static str, f64)> {
        [
            ("first-contentful-paint", self.first_contentful_paint),
            ("total-blocking-time", self.total_blocking_time),
            ("largest-contentful-paint", self.largest_contentful_paint),
            ("speed-index", self.speed_index),
            ("cumulative-layout-shift", self.cumulative_layout_shift),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}

/// In-memory shape of one daily log file: strategy name → records in
/// append order.
pub type LogDocument = BTreeMap<String, Vec<MeasurementRecord>>;

/// Page URL for a domain: `https://` plus the percent-encoded domain.
pub fn page_url(domain: &str) -> String {
    format!("https://{}", urlencoding::encode(domain))
}

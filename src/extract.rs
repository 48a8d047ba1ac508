//! Metric extraction from a PageSpeed Insights response.
//!
//! Models the slice of the API response we depend on as typed structs, so a
//! missing field surfaces as a named [`ExtractError`] instead of a blind
//! lookup failure. Extraction is pure — no I/O, no side effects.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{MeasurementRecord, MetricsMode};

/// Lighthouse audit ids for the timing metrics we track, in display order.
pub const TIMING_AUDITS: [&str; 5] = [
    "first-contentful-paint",
    "total-blocking-time",
    "largest-contentful-paint",
    "speed-index",
    "cumulative-layout-shift",
];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("response is missing expected field: {0}")]
    MissingField(String),

    #[error("audit '{0}' display value '{1}' has no numeric content")]
    UnparseableValue(String, String),
}

/// The slice of the PageSpeed Insights response that extraction reads.
/// Everything is optional here; [`extract_record`] decides what is required.
#[derive(Debug, Deserialize)]
pub struct PagespeedResponse {
    #[serde(rename = "lighthouseResult")]
    pub lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
pub struct LighthouseResult {
    pub categories: Option<Categories>,
    pub audits: Option<BTreeMap<String, Audit>>,
}

#[derive(Debug, Deserialize)]
pub struct Categories {
    pub performance: Option<PerformanceCategory>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceCategory {
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Audit {
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
}

/// Build a [`MeasurementRecord`] from one parsed API response.
///
/// The source score is a fraction in [0, 1] and is stored scaled ×100.
/// In full mode all five timing audits must be present; an absent field is
/// an [`ExtractError::MissingField`], never a silent default.
pub fn extract_record(
    response: &PagespeedResponse,
    mode: MetricsMode,
) -> Result<MeasurementRecord, ExtractError> {
    let lighthouse = response
        .lighthouse_result
        .as_ref()
        .ok_or_else(|| ExtractError::MissingField("lighthouseResult".into()))?;

    let score = lighthouse
        .categories
        .as_ref()
        .and_then(|c| c.performance.as_ref())
        .and_then(|p| p.score)
        .ok_or_else(|| {
            ExtractError::MissingField("lighthouseResult.categories.performance.score".into())
        })?;

    let mut record = MeasurementRecord::score_only(score * 100.0);

    if mode.is_full() {
        let audits = lighthouse
            .audits
            .as_ref()
            .ok_or_else(|| ExtractError::MissingField("lighthouseResult.audits".into()))?;

        for id in TIMING_AUDITS {
            let display = audits
                .get(id)
                .and_then(|a| a.display_value.as_deref())
                .ok_or_else(|| {
                    ExtractError::MissingField(format!(
                        "lighthouseResult.audits.{}.displayValue",
                        id
                    ))
                })?;
            let value = parse_display_value(id, display)?;

            match id {
                "first-contentful-paint" => record.first_contentful_paint = Some(value),
                "total-blocking-time" => record.total_blocking_time = Some(value),
                "largest-contentful-paint" => record.largest_contentful_paint = Some(value),
                "speed-index" => record.speed_index = Some(value),
                "cumulative-layout-shift" => record.cumulative_layout_shift = Some(value),
                _ => unreachable!(),
            }
        }
    }

    Ok(record)
}

/// Reduce a human-readable display value like `"1.2 s"` or `"250 ms"` to a
/// bare number by dropping every character that is not a digit or a decimal
/// point. Lossy on purpose — the unit is discarded, and the same stripping
/// is applied to every audit regardless of its original type. Downstream
/// log consumers rely on this format.
fn parse_display_value(id: &str, display: &str) -> Result<f64, ExtractError> {
    let numeric: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    numeric
        .parse::<f64>()
        .map_err(|_| ExtractError::UnparseableValue(id.to_string(), display.to_string()))
}

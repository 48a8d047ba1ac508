//! Daily log file accumulation.
//!
//! One JSON file per (calendar date, domain) holds every record appended
//! that day, keyed by strategy. Every append is a full read-modify-write:
//! the file is parsed, the new record pushed onto its strategy's sequence,
//! and the whole document rewritten. Existing strategies are never
//! truncated or reordered.
//!
//! Concurrent probes for the same target can overlap in wall-clock time, so
//! writes are serialized per domain with an async mutex; without it the
//! read-modify-write would lose updates. Keying on the domain rather than
//! the file path keeps the map bounded — a long-running process crosses
//! date boundaries, and per-path entries would accumulate one per day.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::{LogDocument, MeasurementRecord, Strategy};

pub struct ResultStore {
    data_dir: PathBuf,
    /// One async lock per domain. The outer std mutex only guards the map
    /// itself and is never held across an await.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ResultStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the log file for one (date, domain) pair: `M-D-YYYY_<domain>.json`.
    pub fn log_path(&self, domain: &str, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}.json", date.format("%-m-%-d-%Y"), domain))
    }

    /// Append one record to the day's log file for the given strategy.
    ///
    /// Creates the data directory and the file lazily. If the file exists
    /// but lacks the strategy, a new singleton sequence is added; otherwise
    /// the record is appended to the existing sequence. Returns the file
    /// path written.
    pub async fn append(
        &self,
        domain: &str,
        date: NaiveDate,
        strategy: Strategy,
        record: &MeasurementRecord,
    ) -> Result<PathBuf> {
        let path = self.log_path(domain, date);
        let lock = self.lock_for(domain);
        let _guard = lock.lock().await;

        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;

        let mut document = read_document(&path)?;
        document
            .entry(strategy.as_str().to_string())
            .or_default()
            .push(record.clone());

        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write log file: {}", path.display()))?;

        Ok(path)
    }

    fn lock_for(&self, domain: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(domain.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Read and parse an existing log file, or return an empty document if the
/// file does not exist yet.
pub fn read_document(path: &Path) -> Result<LogDocument> {
    if !path.exists() {
        return Ok(LogDocument::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
    }

    fn record(score: f64) -> MeasurementRecord {
        MeasurementRecord::score_only(score)
    }

    #[test]
    fn log_path_uses_unpadded_date_stamp() {
        let store = ResultStore::new("/tmp/sw-data");
        let path = store.log_path("example.com", date());
        assert_eq!(
            path,
            PathBuf::from("/tmp/sw-data/8-3-2026_example.com.json")
        );
    }

    #[tokio::test]
    async fn first_append_creates_singleton_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path().join("data"));

        let path = store
            .append("example.com", date(), Strategy::Mobile, &record(87.0))
            .await
            .unwrap();

        let doc = read_document(&path).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc["mobile"].len(), 1);
        assert_eq!(doc["mobile"][0].score, 87.0);
    }

    #[tokio::test]
    async fn appends_accumulate_in_call_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());

        for score in [10.0, 20.0, 30.0] {
            store
                .append("example.com", date(), Strategy::Mobile, &record(score))
                .await
                .unwrap();
        }

        let doc = read_document(&store.log_path("example.com", date())).unwrap();
        let scores: Vec<f64> = doc["mobile"].iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![10.0, 20.0, 30.0]);
    }

    #[tokio::test]
    async fn second_strategy_does_not_touch_first() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());

        store
            .append("example.com", date(), Strategy::Mobile, &record(87.0))
            .await
            .unwrap();
        store
            .append("example.com", date(), Strategy::Desktop, &record(93.0))
            .await
            .unwrap();

        let doc = read_document(&store.log_path("example.com", date())).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc["mobile"].len(), 1);
        assert_eq!(doc["mobile"][0].score, 87.0);
        assert_eq!(doc["desktop"][0].score, 93.0);
    }

    #[tokio::test]
    async fn round_trip_preserves_record_values() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());

        let full = MeasurementRecord {
            score: 87.0,
            first_contentful_paint: Some(1.2),
            total_blocking_time: Some(250.0),
            largest_contentful_paint: Some(2.4),
            speed_index: Some(3.1),
            cumulative_layout_shift: Some(0.1),
        };

        let path = store
            .append("example.com", date(), Strategy::Mobile, &full)
            .await
            .unwrap();

        let doc = read_document(&path).unwrap();
        assert_eq!(doc["mobile"][0], full);
    }

    #[tokio::test]
    async fn separate_dates_get_separate_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());
        let other = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();

        store
            .append("example.com", date(), Strategy::Mobile, &record(1.0))
            .await
            .unwrap();
        store
            .append("example.com", other, Strategy::Mobile, &record(2.0))
            .await
            .unwrap();

        assert!(store.log_path("example.com", date()).exists());
        assert!(store.log_path("example.com", other).exists());
    }

    #[tokio::test]
    async fn lock_map_stays_one_entry_per_domain() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());

        for day in 1..=5 {
            let date = NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
            store
                .append("example.com", date, Strategy::Mobile, &record(1.0))
                .await
                .unwrap();
        }
        store
            .append("other.org", date(), Strategy::Mobile, &record(1.0))
            .await
            .unwrap();

        assert_eq!(store.locks.lock().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_lose_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(ResultStore::new(tmp.path()));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let strategy = if i % 2 == 0 {
                Strategy::Mobile
            } else {
                Strategy::Desktop
            };
            handles.push(tokio::spawn(async move {
                store
                    .append("example.com", date(), strategy, &record(i as f64))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let doc = read_document(&store.log_path("example.com", date())).unwrap();
        assert_eq!(doc["mobile"].len(), 8);
        assert_eq!(doc["desktop"].len(), 8);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_not_panicked() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());
        let path = store.log_path("example.com", date());
        std::fs::write(&path, "not json").unwrap();

        let err = store
            .append("example.com", date(), Strategy::Mobile, &record(1.0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}

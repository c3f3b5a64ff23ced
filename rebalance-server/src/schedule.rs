use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use rebalance_engine::error::ProviderError;
use rebalance_engine::models::{TargetEntry, TargetList};
use rebalance_engine::providers::{SellSignal, TargetProvider};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// One month's block of the schedule file: the instruments to hold (with
/// weights and target prices) and the codes flagged for liquidation.
#[derive(Debug, Clone, Deserialize)]
struct ScheduleEntry {
    #[serde(default)]
    stocks: Vec<TargetEntry>,
    #[serde(default)]
    sell: Vec<String>,
}

/// Rebalance schedule backed by a JSON file keyed by month-start date
/// (`YYYY-MM-DD`). Re-read on every call so edits take effect without a
/// restart. Serves as both the target provider and the sell signal.
#[derive(Debug, Clone)]
pub struct FileSchedule {
    path: PathBuf,
}

impl FileSchedule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<NaiveDate, ScheduleEntry>, ProviderError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| ProviderError::Other(format!("read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Other(format!("parse {}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl TargetProvider for FileSchedule {
    async fn targets_for(&self, date: NaiveDate) -> Result<TargetList, ProviderError> {
        let mut schedule = self.load()?;
        match schedule.remove(&date) {
            Some(entry) => Ok(TargetList::new(entry.stocks)),
            None => Err(ProviderError::NoData(date)),
        }
    }
}

#[async_trait]
impl SellSignal for FileSchedule {
    /// Consults the sell list of the current month's block; codes outside
    /// it are never sell-flagged.
    async fn should_sell(&self, code: &str) -> Result<bool, ProviderError> {
        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);

        let schedule = self.load()?;
        Ok(schedule
            .get(&month_start)
            .map(|entry| entry.sell.iter().any(|c| c == code))
            .unwrap_or(false))
    }
}

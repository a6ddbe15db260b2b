//! Report history
//!
//! Every generated report is appended to the history and the whole history
//! is written to its snapshot. Reads return newest first.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared::models::SalesReport;
use tokio_util::sync::CancellationToken;

use crate::stores::collection::check_cancelled;
use crate::stores::{Snapshot, StoreError, StoreResult};

/// Number of reports returned by [`ReportStore::history`]
pub const HISTORY_LIMIT: usize = 10;

pub struct ReportStore {
    reports: RwLock<Vec<SalesReport>>,
    snapshot: Arc<dyn Snapshot<SalesReport>>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStore")
            .field("len", &self.reports.read().len())
            .finish()
    }
}

impl ReportStore {
    pub fn new(snapshot: Arc<dyn Snapshot<SalesReport>>) -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
            snapshot,
            write_lock: Mutex::new(()),
        }
    }

    pub fn load_snapshot(&self) -> StoreResult<usize> {
        let records = self
            .snapshot
            .load()
            .map_err(|e| StoreError::Persistence(format!("failed to load sales reports: {e}")))?;
        let records = records.unwrap_or_else(|| {
            tracing::warn!(entity = "sales_report", "No snapshot found, starting empty");
            Vec::new()
        });
        let count = records.len();
        *self.reports.write() = records;
        Ok(count)
    }

    /// Append a report and persist the history
    ///
    /// The report stays in memory even if the snapshot write fails.
    pub fn record(&self, report: SalesReport) -> StoreResult<()> {
        // serialises writers so snapshots land in append order
        let _guard = self.write_lock.lock();
        let history = {
            let mut reports = self.reports.write();
            reports.push(report);
            reports.clone()
        };
        self.snapshot.save(&history).map_err(|e| {
            tracing::error!(entity = "sales_report", error = %e, "Snapshot write failed");
            StoreError::from(e)
        })
    }

    pub fn latest(&self, cancel: &CancellationToken) -> StoreResult<Option<SalesReport>> {
        check_cancelled(cancel)?;
        Ok(self.reports.read().last().cloned())
    }

    /// Newest-first, at most [`HISTORY_LIMIT`] entries
    pub fn history(&self, cancel: &CancellationToken) -> StoreResult<Vec<SalesReport>> {
        check_cancelled(cancel)?;
        Ok(self
            .reports
            .read()
            .iter()
            .rev()
            .take(HISTORY_LIMIT)
            .cloned()
            .collect())
    }
}

//! 销售报表调度器
//!
//! 按固定间隔生成报表并写入 [`ReportStore`](super::ReportStore)。
//! 第一次生成在一个完整间隔之后，收到关闭信号立即退出。

use std::time::Duration;

use shared::models::SalesReport;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::reports::generate_report;
use crate::stores::StoreResult;

/// 销售报表调度器
pub struct ReportScheduler {
    state: ServerState,
    interval: Duration,
    window: chrono::Duration,
    shutdown: CancellationToken,
}

impl ReportScheduler {
    pub fn new(state: ServerState) -> Self {
        let interval = state.config.report_interval();
        let window = state.config.report_window();
        let shutdown = state.shutdown.clone();
        Self {
            state,
            interval,
            window,
            shutdown,
        }
    }

    /// 覆盖生成间隔 (测试场景)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// 主循环
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            window_hours = self.window.num_hours(),
            "Sales report scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval 的第一次 tick 立即完成
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.generate_once() {
                        Ok(report) => tracing::info!(
                            total_orders = report.total_orders,
                            total_revenue = report.total_revenue,
                            "Sales report generated"
                        ),
                        Err(e) => tracing::error!(error = %e, "Sales report generation failed"),
                    }
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Sales report scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 生成一次并记录
    pub fn generate_once(&self) -> StoreResult<SalesReport> {
        let cancel = self.shutdown.child_token();
        let report = generate_report(&self.state.orders, &self.state.books, self.window, &cancel)?;
        self.state.reports.record(report.clone())?;
        Ok(report)
    }
}

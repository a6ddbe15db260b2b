//! 销售报表
//!
//! - [`generate_report`] - 对时间窗口内的订单做汇总
//! - [`ReportStore`] - 报表历史 (快照持久化)
//! - [`ReportScheduler`] - 定时生成，随关闭令牌退出

pub mod generator;
pub mod scheduler;
pub mod store;

pub use generator::{TOP_SELLING_LIMIT, generate_report, generate_report_between};
pub use scheduler::ReportScheduler;
pub use store::{HISTORY_LIMIT, ReportStore};

//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - 日志、输入校验、请求取消

pub mod cancel;
pub mod error;
pub mod logger;
pub mod validation;

pub use cancel::{Cancellation, request_cancellation};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

//! Bookstore Server - 书店管理后端
//!
//! # 架构概述
//!
//! 图书、作者、客户、订单的 REST 接口，基于角色和权限的访问控制，
//! 以及定时销售报表。
//!
//! - **存储** (`stores`): 每个实体一个带 `RwLock` 的内存 store，JSON 快照持久化
//! - **订单** (`stores::order`): 订单变更与图书库存在同一个原子操作内调整
//! - **认证** (`auth`): JWT + Argon2，角色 / 权限 / 所有权中间件链
//! - **报表** (`reports`): 时间窗口内的订单汇总，后台定时生成
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! bookstore-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限、中间件
//! ├── stores/        # 内存 store 和快照
//! ├── reports/       # 销售报表
//! ├── services/      # 路由装配
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误转换、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod reports;
pub mod services;
pub mod stores;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::build_app;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 安全审计日志，输出到 `security` target
///
/// ```ignore
/// security_log!("WARN", "role_denied", user_id = user.id, uri = %req.uri());
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($fields:tt)*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($fields)*
        );
    };
}

/// 加载 `.env` 并初始化日志
///
/// 日志级别和目录读取 `LOG_LEVEL` / `LOG_DIR`，与 [`Config`] 一致。
pub fn setup_environment() {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(Some(&log_level), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ____              __        __
   / __ )____  ____  / /_______/ /_____  ________
  / __  / __ \/ __ \/ //_/ ___/ __/ __ \/ ___/ _ \
 / /_/ / /_/ / /_/ / ,< (__  ) /_/ /_/ / /  /  __/
/_____/\____/\____/_/|_/____/\__/\____/_/   \___/
    "#
    );
}

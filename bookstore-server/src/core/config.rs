use std::path::PathBuf;
use std::time::Duration;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录，快照位于 `database/` 下 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REPORT_INTERVAL_SECS | 86400 | 销售报表生成间隔 |
/// | REPORT_WINDOW_HOURS | 24 | 销售报表统计窗口 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志目录，设置后按天滚动写文件 |
/// | JWT_* | 见 [`JwtConfig`] | 令牌配置 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/bookstore HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 报表生成间隔 (秒)
    pub report_interval_secs: u64,
    /// 报表统计窗口 (小时)
    pub report_window_hours: i64,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；只有 JWT 配置可能失败。
    pub fn from_env() -> Result<Self, ServerError> {
        Ok(Self {
            jwt: JwtConfig::from_env()?,
            ..Self::defaults_from_env()
        })
    }

    fn defaults_from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::generated(),
            report_interval_secs: std::env::var("REPORT_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(86_400),
            report_window_hours: std::env::var("REPORT_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(24),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景，JWT 使用随机密钥
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::defaults_from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 快照目录 `<work_dir>/database`
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 某个集合的快照文件路径
    pub fn snapshot_path(&self, collection: &str) -> PathBuf {
        self.database_dir().join(format!("{collection}.json"))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn report_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.report_window_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_paths() {
        let config = Config::with_overrides("/tmp/bookstore", 0);
        assert_eq!(
            config.snapshot_path("books"),
            PathBuf::from("/tmp/bookstore/database/books.json")
        );
        assert_eq!(
            config.snapshot_path("sales_reports"),
            PathBuf::from("/tmp/bookstore/database/sales_reports.json")
        );
    }

    #[test]
    fn test_overrides_keep_generated_secret() {
        let config = Config::with_overrides("/tmp/x", 1234);
        assert_eq!(config.http_port, 1234);
        assert!(config.jwt.secret.len() >= 32);
    }
}

use thiserror::Error;

use crate::auth::JwtError;
use crate::stores::StoreError;

/// 启动和运行阶段的错误
///
/// 请求处理中的错误走 [`AppError`](crate::AppError)，这里只覆盖进程级失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("工作目录不可用: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("加载快照失败: {0}")]
    Snapshot(#[from] StoreError),

    #[error("监听端口失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("服务运行失败: {0}")]
    Serve(#[source] std::io::Error),
}

impl From<JwtError> for ServerError {
    fn from(err: JwtError) -> Self {
        ServerError::Config(err.to_string())
    }
}

/// 服务器层的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;

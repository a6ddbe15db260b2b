//! 服务层 - 路由装配与中间件栈

pub mod https;

pub use https::{build_app, build_router};

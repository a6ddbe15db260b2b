//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、当前用户
//! - [`books`] - 图书管理和搜索
//! - [`authors`] - 作者管理
//! - [`customers`] - 客户管理
//! - [`orders`] - 订单管理 (库存联动)
//! - [`reports`] - 销售报表
//!
//! 所有 `/api/*` 路由先经过 `require_auth`，再经过各路由自己的
//! 角色 / 权限 / 所有权检查。

pub mod auth;
pub mod health;

// Catalog
pub mod authors;
pub mod books;

// Sales
pub mod customers;
pub mod orders;
pub mod reports;

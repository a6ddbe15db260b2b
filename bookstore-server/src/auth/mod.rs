//! 认证授权模块
//!
//! 提供 JWT 认证、权限管理和中间件：
//! - [`JwtService`] - JWT 令牌服务 ([`TokenVerifier`] 的默认实现)
//! - [`CurrentUser`] - 当前用户上下文
//! - [`PermissionSet`] - 带通配符的权限集合
//! - [`require_auth`] - 认证中间件
//! - [`require_role`] / [`require_permission`] / [`require_owner_or_admin`] - 授权中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, TokenVerifier};
pub use middleware::{
    require_admin, require_auth, require_owner_or_admin, require_permission, require_role,
};
pub use permissions::{PermissionSet, get_default_permissions};

//! Permission Definitions
//!
//! 权限字符串格式为 `action:resource`，例如 `read:books`、`write:orders`。
//!
//! ## 通配符
//! - `*` 拥有所有权限
//! - `read:all` / `write:all` / `delete:all` 覆盖同一 action 下的所有资源

use std::collections::BTreeSet;

use shared::models::Role;

/// 超级权限
pub const WILDCARD: &str = "*";

/// 管理员默认权限
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &[
    "read:all",
    "write:all",
    "delete:all",
    "manage:users",
    "manage:roles",
    "generate:reports",
];

/// 经理默认权限
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    "read:all",
    "write:books",
    "write:authors",
    "write:orders",
    "generate:reports",
];

/// 员工默认权限
pub const DEFAULT_EMPLOYEE_PERMISSIONS: &[&str] = &["read:all", "write:orders", "write:customers"];

/// 普通用户默认权限
pub const DEFAULT_USER_PERMISSIONS: &[&str] = &["read:books", "read:authors", "write:orders"];

/// Get default permissions for a role
pub fn get_default_permissions(role: Role) -> Vec<String> {
    let permissions = match role {
        Role::Admin => DEFAULT_ADMIN_PERMISSIONS,
        Role::Manager => DEFAULT_MANAGER_PERMISSIONS,
        Role::Employee => DEFAULT_EMPLOYEE_PERMISSIONS,
        Role::User => DEFAULT_USER_PERMISSIONS,
    };
    permissions.iter().map(|s| s.to_string()).collect()
}

/// Set of granted permissions with wildcard implication
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    /// Whether the granted set covers `required`
    ///
    /// 1. `*` covers everything
    /// 2. exact match
    /// 3. `<action>:all` covers `<action>:<anything>`
    pub fn implies(&self, required: &str) -> bool {
        if self.0.contains(WILDCARD) || self.0.contains(required) {
            return true;
        }
        match required.split_once(':') {
            Some((action, _)) => self.0.contains(&format!("{action}:all")),
            None => false,
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

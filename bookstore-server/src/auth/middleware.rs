//! 认证授权中间件
//!
//! 链路顺序固定为：验证令牌 → 角色 / 权限 / 所有权检查 → handler。
//! 每个检查都是独立的中间件，要么放行，要么返回结构化错误。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use futures::future::BoxFuture;
use shared::models::Role;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 无需认证的 API 路由
pub const PUBLIC_API_ROUTES: &[&str] = &["/api/health", "/api/auth/login", "/api/auth/register"];

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取令牌，交给
/// [`TokenVerifier`](crate::auth::TokenVerifier) 校验。成功后将
/// [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - [`PUBLIC_API_ROUTES`]
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 签名 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state, req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 校验 `Authorization` 头并构造 [`CurrentUser`]
///
/// 中间件和 [`CurrentUser`] 提取器共用，失败时记录安全日志。
pub(crate) fn authenticate(
    state: &ServerState,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!("WARN", "auth_missing", uri = %uri);
        return Err(JwtError::MissingToken.into());
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| JwtError::InvalidToken("Invalid authorization header".to_string()))?;

    state
        .token_verifier
        .verify(token)
        .map(CurrentUser::from)
        .map_err(|e| {
            security_log!("WARN", "auth_failed", error = %e, uri = %uri);
            e.into()
        })
}

/// 取出 [`require_auth`] 注入的用户
fn current_user(req: &Request) -> Result<&CurrentUser, AppError> {
    req.extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)
}

type MiddlewareFuture = BoxFuture<'static, Result<Response, AppError>>;

/// 角色检查中间件 - 要求角色在允许列表中
///
/// 管理员总是通过。
///
/// ```ignore
/// Router::new()
///     .route("/", post(handler::create))
///     .route_layer(middleware::from_fn(require_role(&[Role::Manager])));
/// ```
pub fn require_role(roles: &'static [Role]) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = current_user(&req)?;

            if !user.has_any_role(roles) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id,
                    user_role = user.role.as_str()
                );
                return Err(AppError::with_message(
                    shared::ErrorCode::RoleRequired,
                    "Forbidden: insufficient role",
                ));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 权限检查中间件 - 要求特定权限
///
/// # 参数
///
/// - `permission`: 所需权限，如 `"read:books"`, `"write:orders"`
///
/// # 支持的通配符
///
/// - `"*"` 匹配所有权限
/// - `"read:all"` 匹配所有 `read:` 权限
///
/// # 错误
///
/// 无权限返回 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = current_user(&req)?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Forbidden: missing permission {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 管理员中间件 - 要求管理员角色
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = current_user(&req)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            user_role = user.role.as_str()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

/// 所有权检查中间件 - 资源所有者或管理员
///
/// `resolve_owner` 从请求解析资源所属的客户 ID，与当前用户 ID 比较。
/// 无法解析 (返回 `None`) 视为不匹配。管理员不解析直接通过。
///
/// 需要通过 `from_fn_with_state` 挂载。
pub fn require_owner_or_admin<F>(
    resolve_owner: F,
) -> impl Fn(State<ServerState>, Request, Next) -> MiddlewareFuture + Clone
where
    F: Fn(&ServerState, &Request) -> Option<i64> + Clone + Send + Sync + 'static,
{
    move |State(state): State<ServerState>, req: Request, next: Next| {
        let resolve_owner = resolve_owner.clone();
        Box::pin(async move {
            let user = current_user(&req)?;

            if user.is_admin() {
                return Ok(next.run(req).await);
            }

            let owner_id = resolve_owner(&state, &req).unwrap_or(0);
            if !user.owns_or_admin(owner_id) {
                security_log!(
                    "WARN",
                    "ownership_denied",
                    user_id = user.id,
                    owner_id = owner_id,
                    uri = %req.uri()
                );
                return Err(AppError::new(shared::ErrorCode::NotResourceOwner));
            }

            Ok(next.run(req).await)
        })
    }
}

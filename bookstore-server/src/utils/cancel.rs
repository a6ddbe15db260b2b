//! 请求级取消
//!
//! 每个请求拿到服务器关闭令牌的子令牌。服务器关闭或客户端断开
//! (请求 future 被丢弃) 时子令牌被取消，store 操作据此返回 `Cancelled`。

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::utils::AppError;

/// 请求取消令牌
#[derive(Debug, Clone)]
pub struct Cancellation(pub CancellationToken);

/// 为每个请求注入 [`Cancellation`]
///
/// drop guard 与请求 future 同生命周期：future 被丢弃即取消。
pub async fn request_cancellation(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = state.shutdown.child_token();
    req.extensions_mut().insert(Cancellation(token.clone()));
    let guard = token.drop_guard();
    let response = next.run(req).await;
    guard.disarm();
    response
}

impl FromRequestParts<ServerState> for Cancellation {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cancel) = parts.extensions.get::<Cancellation>() {
            return Ok(cancel.clone());
        }
        Ok(Cancellation(state.shutdown.child_token()))
    }
}

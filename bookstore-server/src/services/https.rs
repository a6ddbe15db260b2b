use std::any::Any;

use axum::{Json, Router, middleware, response::IntoResponse};
use http::StatusCode;
use shared::{ApiResponse, ErrorCode};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::utils::request_cancellation;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the API router (without auth layers)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        // Catalog
        .merge(crate::api::books::router())
        .merge(crate::api::authors::router())
        // Sales
        .merge(crate::api::customers::router())
        .merge(crate::api::orders::router(state))
        .merge(crate::api::reports::router())
}

/// Build the complete application with state and middleware stack
///
/// 由内到外：路由级授权 → require_auth → 请求取消 → CORS → 压缩 →
/// 访问日志 → panic 捕获
pub fn build_app(state: ServerState) -> Router {
    let production = state.config.is_production();

    build_router(&state)
        // require_auth 在 Router 级别应用，内部跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_cancellation,
        ))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| panic_response(err, production),
        ))
}

/// 将 handler panic 转为 500 ApiResponse，非生产环境附带 panic 信息
fn panic_response(
    err: Box<dyn Any + Send + 'static>,
    production: bool,
) -> http::Response<axum::body::Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    let mut body = ApiResponse::<()>::error(&shared::AppError::new(ErrorCode::InternalError));
    if !production {
        body.details
            .get_or_insert_with(Default::default)
            .insert("debug".to_string(), detail.into());
    }

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_panic_response_hides_debug_in_production() {
        let response = panic_response(Box::new("boom"), true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 9001);
        assert!(body.get("details").is_none());

        let response = panic_response(Box::new("boom".to_string()), false);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["details"]["debug"], "boom");
    }
}

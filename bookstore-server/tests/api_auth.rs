mod common;

use std::sync::Arc;

use bookstore_server::auth::{Claims, JwtError, TokenVerifier};
use bookstore_server::{Config, ServerState};
use chrono::Utc;
use common::TestApp;
use http::StatusCode;
use serde_json::json;
use shared::models::Role;

/// Accepts exactly one opaque key and maps it to a fixed employee
struct StaticKeyVerifier;

impl TokenVerifier for StaticKeyVerifier {
    fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if token != "shop-floor-key" {
            return Err(JwtError::InvalidSignature);
        }
        Ok(Claims {
            user_id: 7,
            email: "till@example.com".into(),
            name: "Till".into(),
            role: Role::Employee,
            permissions: vec!["read:all".into()],
            iat: 0,
            exp: 0,
            iss: String::new(),
            aud: String::new(),
        })
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/books", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new();
    let config = &app.state.jwt_service.config;
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id: 1,
        email: "old@example.com".into(),
        name: "Old".into(),
        role: Role::Admin,
        permissions: vec!["*".into()],
        iat: now - 7200,
        exp: now - 3600,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };
    let token = app.state.jwt_service.encode_claims(&claims).unwrap();

    let (status, body) = app.send("GET", "/api/books", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new();

    let (status, user) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Grace Hopper",
                "email": "grace@example.com",
                "password": "cobol-forever",
                "role": "employee"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "employee");
    assert!(user.get("password_hash").is_none());

    let (status, _) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Grace Again",
                "email": "GRACE@example.com",
                "password": "another-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "grace@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, login) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "grace@example.com", "password": "cobol-forever"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap().to_string();

    let (status, me) = app.send("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "grace@example.com");
    assert_eq!(me["role"], "employee");
    let permissions: Vec<&str> = me["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(permissions.contains(&"write:customers"));
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Mallory",
                "email": "mallory@example.com",
                "password": "password123",
                "role": "root"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "role");
}

#[tokio::test]
async fn test_custom_token_verifier() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::in_memory(config).with_token_verifier(Arc::new(StaticKeyVerifier));
    let app = TestApp::from_state(state, dir);

    let (status, me) = app.send("GET", "/api/auth/me", Some("shop-floor-key"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], 7);
    assert_eq!(me["role"], "employee");

    let (status, body) = app.send("GET", "/api/books", Some("wrong-key"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    // JWTs from the built-in service are no longer accepted
    let jwt = app.token(1, Role::Admin);
    let (status, _) = app.send("GET", "/api/books", Some(&jwt), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

//! Shared helpers for router-level tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use bookstore_server::auth::get_default_permissions;
use bookstore_server::{Config, ServerState, build_app};
use chrono::Utc;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{Address, Author, Book, Customer, Role};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        Self::from_state(ServerState::in_memory(config), dir)
    }

    /// Wrap an already configured state; `dir` is kept alive with the app
    pub fn from_state(state: ServerState, dir: tempfile::TempDir) -> Self {
        let router = build_app(state.clone());
        Self {
            state,
            router,
            _dir: dir,
        }
    }

    /// Token for `user_id` with the role's default permissions
    pub fn token(&self, user_id: i64, role: Role) -> String {
        self.token_with(user_id, role, &get_default_permissions(role))
    }

    pub fn token_with(&self, user_id: i64, role: Role, permissions: &[String]) -> String {
        self.state
            .jwt_service
            .generate_token(user_id, "tester@example.com", "Tester", role, permissions)
            .unwrap()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub fn seed_author(&self) -> Author {
        self.state
            .authors
            .create(
                Author {
                    id: 0,
                    first_name: "Ursula".into(),
                    last_name: "Le Guin".into(),
                    bio: String::new(),
                },
                &CancellationToken::new(),
            )
            .unwrap()
    }

    pub fn seed_book(&self, author_id: i64, title: &str, stock: i64) -> Book {
        self.state
            .books
            .create(
                Book {
                    id: 0,
                    title: title.into(),
                    author_id,
                    genres: vec!["fantasy".into()],
                    published_at: Utc::now() - chrono::Duration::days(30),
                    price: 12.5,
                    stock,
                },
                &CancellationToken::new(),
            )
            .unwrap()
    }

    pub fn seed_customer(&self, email: &str) -> Customer {
        self.state
            .customers
            .create(
                Customer {
                    id: 0,
                    name: "Ada Lovelace".into(),
                    email: email.into(),
                    address: Address {
                        street: "12 Analytical Row".into(),
                        city: "London".into(),
                        state: "LDN".into(),
                        postal_code: "NW16XE".into(),
                        country: "UK".into(),
                    },
                    created_at: Utc::now(),
                },
                &CancellationToken::new(),
            )
            .unwrap()
    }

    pub fn stock(&self, book_id: i64) -> i64 {
        self.state
            .books
            .get(book_id, &CancellationToken::new())
            .unwrap()
            .stock
    }
}

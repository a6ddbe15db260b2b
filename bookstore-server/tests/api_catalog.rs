mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;
use shared::models::Role;

fn book_body(author_id: i64) -> serde_json::Value {
    json!({
        "title": "The Dispossessed",
        "author_id": author_id,
        "genres": ["scifi"],
        "published_at": "1974-05-01T00:00:00Z",
        "price": 9.5,
        "stock": 4
    })
}

#[tokio::test]
async fn test_read_books_permission_cannot_create() {
    let app = TestApp::new();
    let author = app.seed_author();
    let book = app.seed_book(author.id, "A Wizard of Earthsea", 3);
    let token = app.token_with(42, Role::User, &["read:books".to_string()]);

    let (status, body) = app
        .send("POST", "/api/books", Some(&token), Some(book_body(author.id)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = app
        .send("GET", &format!("/api/books/{}", book.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "A Wizard of Earthsea");
}

#[tokio::test]
async fn test_missing_read_permission_is_forbidden() {
    let app = TestApp::new();
    let token = app.token_with(1, Role::User, &["write:orders".to_string()]);
    let (status, body) = app.send("GET", "/api/books", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);
}

#[tokio::test]
async fn test_manager_creates_and_updates_book() {
    let app = TestApp::new();
    let author = app.seed_author();
    let token = app.token(2, Role::Manager);

    let (status, created) = app
        .send("POST", "/api/books", Some(&token), Some(book_body(author.id)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(id, 1);

    let mut update = book_body(author.id);
    update["price"] = json!(11.0);
    let (status, updated) = app
        .send("PUT", &format!("/api/books/{id}"), Some(&token), Some(update))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["price"], 11.0);

    // only admins delete
    let (status, _) = app
        .send("DELETE", &format!("/api/books/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.token(1, Role::Admin);
    let (status, _) = app
        .send("DELETE", &format!("/api/books/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send("GET", &format!("/api/books/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_book_validation_and_unknown_author() {
    let app = TestApp::new();
    let author = app.seed_author();
    let token = app.token(2, Role::Manager);

    let mut bad = book_body(author.id);
    bad["price"] = json!(0);
    let (status, body) = app.send("POST", "/api/books", Some(&token), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "price");

    let (status, body) = app
        .send("POST", "/api/books", Some(&token), Some(book_body(999)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "author_id");
}

#[tokio::test]
async fn test_search_applies_first_dimension_only() {
    let app = TestApp::new();
    let author = app.seed_author();
    app.seed_book(author.id, "Earthsea", 1);
    app.seed_book(author.id, "Lathe of Heaven", 1);
    let token = app.token(5, Role::User);

    let (status, all) = app.send("GET", "/api/books", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    // title wins over genre
    let (status, found) = app
        .send(
            "GET",
            "/api/books?title=Earthsea&genre=fantasy",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Earthsea");

    let (_, by_author) = app
        .send("GET", "/api/books?author=Ursula", Some(&token), None)
        .await;
    assert_eq!(by_author.as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(
            "GET",
            "/api/books?min_price=20&max_price=10",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "max_price");
}

#[tokio::test]
async fn test_author_with_books_cannot_be_deleted() {
    let app = TestApp::new();
    let author = app.seed_author();
    let book = app.seed_book(author.id, "Earthsea", 1);
    let admin = app.token(1, Role::Admin);

    let (status, body) = app
        .send("DELETE", &format!("/api/authors/{}", author.id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6102);

    app.send("DELETE", &format!("/api/books/{}", book.id), Some(&admin), None)
        .await;
    let (status, _) = app
        .send("DELETE", &format!("/api/authors/{}", author.id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_customer_gates() {
    let app = TestApp::new();
    let body = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "address": {
            "street": "12 Analytical Row",
            "city": "London",
            "state": "LDN",
            "postal_code": "NW16XE",
            "country": "UK"
        }
    });

    let user = app.token(9, Role::User);
    let (status, _) = app
        .send("POST", "/api/customers", Some(&user), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let employee = app.token(3, Role::Employee);
    let (status, created) = app
        .send("POST", "/api/customers", Some(&employee), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, _) = app
        .send("POST", "/api/customers", Some(&employee), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("PUT", &format!("/api/customers/{id}"), Some(&employee), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let manager = app.token(2, Role::Manager);
    let (status, _) = app
        .send("PUT", &format!("/api/customers/{id}"), Some(&manager), Some(body))
        .await;
    assert_eq!(status, StatusCode::OK);
}

//! API integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_server::{
    api::create_router,
    models::Book,
    repository::{memory::MemoryBookStore, BookStore},
    AppState,
};

const ISBN: &str = "123-4-56-678901-2";

/// Router over a store holding the one fixture book
async fn seeded_app() -> Router {
    let store = Arc::new(MemoryBookStore::new());
    store
        .insert(&Book {
            isbn: ISBN.to_string(),
            amazon_url: Some("https://amazon.com/test".to_string()),
            author: Some("Test".to_string()),
            language: Some("English".to_string()),
            pages: Some(500),
            publisher: Some("Testing Publisher".to_string()),
            title: "Test Book".to_string(),
            year: Some(2020),
        })
        .await
        .expect("Failed to seed book");

    create_router(AppState::new(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

fn update_payload() -> Value {
    json!({
        "author": "Test2",
        "language": "English",
        "pages": 800,
        "publisher": "Test Publisher 2",
        "title": "Test Book 2",
        "year": 2022
    })
}

#[tokio::test]
async fn test_list_books() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);

    let books = body["books"].as_array().expect("books is not an array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], ISBN);
    assert_eq!(books[0]["year"], 2020);
}

#[tokio::test]
async fn test_get_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", ISBN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], ISBN);
    assert_eq!(body["book"]["year"], 2020);
}

#[tokio::test]
async fn test_get_missing_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/books/20", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_create_book() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({
            "isbn": "123-4-56-678901-4",
            "amazon_url": "https://amazon.com/test2",
            "author": "Test2",
            "language": "English",
            "pages": 800,
            "publisher": "Test Publisher 2",
            "title": "Test Book 2",
            "year": 2022
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["isbn"], "123-4-56-678901-4");

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["books"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_create_book_without_title() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::POST, "/books", Some(json!({"year": 2000}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = body["details"]
        .as_array()
        .expect("details is not an array")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"title"));
}

#[tokio::test]
async fn test_create_duplicate_isbn() {
    let app = seeded_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"isbn": ISBN, "title": "Duplicate"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = seeded_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .expect("Failed to build request");
    let response = app.oneshot(request).await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::PUT, &format!("/books/{}", ISBN), Some(update_payload())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "Test2");
    assert_eq!(body["book"]["isbn"], ISBN);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", ISBN),
        Some(json!({"author": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "X");
    assert_eq!(body["book"]["title"], "Test Book");
    assert_eq!(body["book"]["pages"], 500);
}

#[tokio::test]
async fn test_update_rejects_unknown_field() {
    let app = seeded_app().await;

    let mut payload = update_payload();
    payload["notAllowed"] = json!("This should not work");

    for isbn in [ISBN, "undefined"] {
        let (status, body) = send(&app, Method::PUT, &format!("/books/{}", isbn), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "notAllowed");
    }

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", ISBN), None).await;
    assert_eq!(body["book"]["author"], "Test");
}

#[tokio::test]
async fn test_update_missing_book() {
    let app = seeded_app().await;

    let (status, _) = send(&app, Method::PUT, "/books/40", Some(json!({"author": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_book() {
    let app = seeded_app().await;

    let (status, _) = send(&app, Method::DELETE, "/books/40", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", ISBN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Book deleted"}));

    let (status, _) = send(&app, Method::GET, &format!("/books/{}", ISBN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["books"], json!([]));
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

/// Runs against a live server.
#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_live_server_roundtrip() {
    const BASE_URL: &str = "http://localhost:3000";
    let client = reqwest::Client::new();
    let isbn = "978-0-00-000000-1";

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({"isbn": isbn, "title": "Live Book", "year": 2021}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["title"], "Live Book");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}

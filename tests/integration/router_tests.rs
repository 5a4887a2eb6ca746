//! HTTP-level tests against the in-process router

use axum::http::{Method, StatusCode};
use chrono::{Datelike, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::common::{app, create, get, send, send_raw, violated_fields};

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Frank Herbert", "publishedYear": 1965})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["available"], true);

    let (status, fetched) = get(&app, &format!("/books/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/books/{id}"),
        Some(json!({"available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["available"], false);
    assert_eq!(updated["title"], "Dune");
    assert_eq!(updated["author"], "Frank Herbert");
    assert_eq!(updated["publishedYear"], 1965);

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = get(&app, &format!("/books/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "", "author": "", "publishedYear": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(violated_fields(&body), ["author", "publishedYear", "title"]);

    let next_year = Utc::now().year() + 1;
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Later", "author": "Someone", "publishedYear": next_year})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violated_fields(&body), ["publishedYear"]);

    for bad in [
        json!({"author": "No Title"}),
        json!({"title": "No Author"}),
        json!({"title": "T", "author": "A", "publishedYear": "1965"}),
        json!({"title": "T", "author": "A", "available": "yes"}),
    ] {
        let (status, _) = send(&app, Method::POST, "/books", Some(bad.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {bad}");
    }

    let (status, _) = send_raw(&app, Method::POST, "/books", Some("{not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, page) = get(&app, "/books").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_list_pagination() {
    let app = app();
    for i in 0..12 {
        create(&app, json!({"title": format!("Book {i}"), "author": "Author"})).await;
    }

    let (status, page) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 10);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 10);
    assert_eq!(page["total"], 12);
    assert_eq!(page["totalPages"], 2);

    let (_, page) = get(&app, "/books?page=3&limit=5").await;
    let data = page["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["title"], "Book 10");
    assert_eq!(page["totalPages"], 3);

    let (_, page) = get(&app, "/books?page=7&limit=5").await;
    assert!(page["data"].as_array().unwrap().is_empty());
    assert_eq!(page["total"], 12);
    assert_eq!(page["totalPages"], 3);
}

#[tokio::test]
async fn test_list_page_far_past_the_end() {
    let app = app();
    for i in 0..3 {
        create(&app, json!({"title": format!("Book {i}"), "author": "Author"})).await;
    }

    let (status, page) = get(&app, "/books?page=9223372036854775807&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page["data"].as_array().unwrap().is_empty());
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], i64::MAX);
    assert_eq!(page["totalPages"], 1);

    let (status, page) = get(&app, "/books/search?author=author&page=9223372036854775807&limit=100").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page["data"].as_array().unwrap().is_empty());
    assert_eq!(page["total"], 3);
}

#[tokio::test]
async fn test_list_rejects_invalid_pagination() {
    let app = app();

    for query in ["page=0", "limit=0", "limit=101", "page=-2", "page=abc", "limit=1.5"] {
        let (status, body) = get(&app, &format!("/books?{query}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {query}");
        assert_eq!(body["error"], "BadValue");
    }

    let (status, body) = get(&app, "/books/search?limit=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violated_fields(&body), ["limit"]);

    let (status, _) = get(&app, "/books?limit=100").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_search() {
    let app = app();
    create(&app, json!({"title": "To Kill a Mockingbird", "author": "Harper Lee", "genre": "Fiction"})).await;
    create(&app, json!({"title": "Murder on the Orient Express", "author": "Agatha Christie", "genre": "Mystery"})).await;
    create(&app, json!({"title": "Go Set a Watchman", "author": "Harper Lee", "genre": "Literary Fiction"})).await;

    let (status, page) = get(&app, "/books/search?author=lee").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert!(page["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["author"] == "Harper Lee"));

    let (_, page) = get(&app, "/books/search?author=LEE&genre=literary").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["title"], "Go Set a Watchman");

    let (_, page) = get(&app, "/books/search?genre=poetry").await;
    assert_eq!(page["total"], 0);
    assert_eq!(page["totalPages"], 0);

    let (_, page) = get(&app, "/books/search?author=lee&limit=1&page=2").await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["totalPages"], 2);

    // No criteria behaves like a plain listing
    let (_, searched) = get(&app, "/books/search?limit=2").await;
    let (_, listed) = get(&app, "/books?limit=2").await;
    assert_eq!(searched, listed);
    assert_eq!(searched["total"], 3);
}

#[tokio::test]
async fn test_search_matches_wildcards_literally() {
    let app = app();
    create(&app, json!({"title": "Percentages", "author": "100% Press"})).await;
    create(&app, json!({"title": "Other", "author": "1000 Press"})).await;

    let (_, page) = get(&app, "/books/search?author=100%25").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["author"], "100% Press");

    let (_, page) = get(&app, "/books/search?author=.*").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = app();
    let missing = Uuid::new_v4().to_string();

    for id in [missing.as_str(), "not-a-valid-id", "507f1f77bcf86cd799439011"] {
        let uri = format!("/books/{id}");

        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains(id));

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"title": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // Updating a missing id never creates it
    let (_, page) = get(&app, "/books").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = app();
    let id = create(&app, json!({"title": "Emma", "author": "Jane Austen"})).await;
    let uri = format!("/books/{id}");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update() {
    let app = app();
    let id = create(
        &app,
        json!({"title": "Dune", "author": "Frank Herbert", "genre": "Science Fiction", "publishedYear": 1965}),
    )
    .await;
    let uri = format!("/books/{id}");
    let (_, original) = get(&app, &uri).await;

    let (status, unchanged) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, original);

    let (status, retitled) = send(&app, Method::PUT, &uri, Some(json!({"title": "Dune Messiah"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(retitled["title"], "Dune Messiah");
    assert_eq!(retitled["genre"], "Science Fiction");
    assert_eq!(retitled["id"], original["id"]);

    let (status, cleared) = send(&app, Method::PUT, &uri, Some(json!({"genre": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["genre"].is_null());
    assert_eq!(cleared["publishedYear"], 1965);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": null, "publishedYear": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violated_fields(&body), ["publishedYear", "title"]);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"author": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = get(&app, &uri).await;
    assert_eq!(current, cleared);
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/books/search"].is_object());
}

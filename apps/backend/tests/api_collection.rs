//! Collection API tests.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{Reply, TestContext};

#[tokio::test]
async fn test_save_and_get_card() {
    let ctx = TestContext::new(Reply::Text(String::new())).await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/collection")
        .json(&json!({
            "word": "chat",
            "question": "Le <b>chat</b> dort",
            "translation": "the cat sleeps",
            "answer": "cat"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "id": 1 }));
    assert_eq!(ctx.store.cards.lock().len(), 1);

    let response = server.get("/collection/1").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["word"], "chat");
    assert_eq!(body["phrase"], "Le <b>chat</b> dort");
    assert_eq!(body["has_word_audio"], false);
}

/// Missing card fields default to empty strings.
#[tokio::test]
async fn test_save_partial_card() {
    let ctx = TestContext::new(Reply::Text(String::new())).await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/collection")
        .json(&json!({ "word": "chien" }))
        .await;

    response.assert_status_ok();
    let cards = ctx.store.cards.lock();
    assert_eq!(cards[0].word, "chien");
    assert_eq!(cards[0].translation, "");
}

#[tokio::test]
async fn test_save_empty_card_rejected() {
    let ctx = TestContext::new(Reply::Text(String::new())).await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.post("/collection").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.store.cards.lock().is_empty());
}

#[tokio::test]
async fn test_get_missing_card() {
    let ctx = TestContext::new(Reply::Text(String::new())).await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/collection/42").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Without a datastore the collection is unavailable.
#[tokio::test]
async fn test_collection_without_datastore() {
    let ctx = TestContext::without_datastore().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/collection")
        .json(&json!({ "word": "chat" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["kind"], "unavailable");
}

//! Integration tests for the generation API.
//!
//! These tests require a running backend HTTP server.
//! Set TEST_BASE_URL to the server URL and TEST_SESSION_TOKEN to a
//! session token minted with the server's SESSION_JWT_SECRET.
//!
//! Example:
//! ```sh
//! export TEST_BASE_URL="http://127.0.0.1:8080"
//! export TEST_SESSION_TOKEN="..."
//! cargo test --test api_tests -- --ignored
//! ```
//!
//! Note: These tests are marked with #[ignore] because they require
//! a running HTTP server and live provider credentials.

use std::env;

use reqwest::Client;
use serde_json::{json, Value};

fn base_url() -> String {
    env::var("TEST_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".into())
}

fn session_token() -> String {
    env::var("TEST_SESSION_TOKEN").unwrap_or_default()
}

#[tokio::test]
#[ignore]
async fn health_endpoint_responds() {
    let resp = Client::new()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("request failed");

    assert!(resp.status().is_success());
}

#[tokio::test]
#[ignore]
async fn generation_requires_auth() {
    let resp = Client::new()
        .post(format!("{}/api/ai/generate-blog-title", base_url()))
        .json(&json!({ "prompt": "rust blogs" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn empty_prompt_is_rejected() {
    let resp = Client::new()
        .post(format!("{}/api/ai/generate-blog-title", base_url()))
        .bearer_auth(session_token())
        .json(&json!({ "prompt": "   " }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn article_generation_round_trip() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/ai/generate-article", base_url()))
        .bearer_auth(session_token())
        .json(&json!({ "prompt": "Write about the borrow checker", "length": 400 }))
        .send()
        .await
        .expect("request failed");
    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["success"], true, "unexpected response: {body}");
    assert!(body["content"].as_str().is_some_and(|c| !c.is_empty()));

    // The creation must show up in the owner's dashboard listing
    let resp = client
        .get(format!("{}/api/user/get-user-creations", base_url()))
        .bearer_auth(session_token())
        .send()
        .await
        .expect("request failed");
    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["success"], true);
    let creations = body["creations"].as_array().expect("creations array");
    assert!(!creations.is_empty());
    assert_eq!(creations[0]["type"], "article");
}

#[tokio::test]
#[ignore]
async fn published_feed_lists_only_published_creations() {
    let resp = Client::new()
        .get(format!("{}/api/user/get-published-creations", base_url()))
        .bearer_auth(session_token())
        .send()
        .await
        .expect("request failed");

    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["success"], true);
    for creation in body["creations"].as_array().expect("creations array") {
        assert_eq!(creation["publish"], true);
    }
}

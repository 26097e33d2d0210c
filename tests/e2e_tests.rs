//! End-to-end tests against a running instance.
//!
//! These are ignored by default. Start the service (and the auth backend
//! it points at), optionally set `TEST_BASE_URL`, then run:
//!
//! ```text
//! cargo test --test e2e_tests -- --ignored
//! ```

use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("TEST_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3001".to_string())
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

const TOKEN: &str = "e2e-test-token";

#[tokio::test]
#[ignore]
async fn health_endpoint_responds() {
    let response = client()
        .get(format!("{}/api/health", base_url()))
        .send()
        .await
        .expect("health request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("health body");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn gig_can_be_created_published_and_listed() {
    let client = client();
    let base = base_url();

    let response = client
        .post(format!("{base}/api/venue/gigs"))
        .bearer_auth(TOKEN)
        .json(&json!({"title": "E2E serata di prova", "payAmount": 75.0}))
        .send()
        .await
        .expect("create request");
    assert_eq!(response.status().as_u16(), 201);
    let gig: Value = response.json().await.expect("gig body");
    let id = gig["id"].as_u64().expect("gig id");

    let response = client
        .post(format!("{base}/api/venue/gigs/{id}/publish"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .expect("publish request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{base}/api/gigs"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .expect("board request");
    assert!(response.status().is_success());
    let board: Vec<Value> = response.json().await.expect("board body");
    assert!(board.iter().any(|g| g["id"].as_u64() == Some(id)));

    // Clean up
    let response = client
        .delete(format!("{base}/api/venue/gigs/{id}"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .expect("delete request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn protected_routes_reject_anonymous_calls() {
    let response = client()
        .get(format!("{}/api/venue/gigs", base_url()))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[ignore]
async fn openapi_document_is_served() {
    let response = client()
        .get(format!("{}/api/openapi.json", base_url()))
        .send()
        .await
        .expect("openapi request");

    assert!(response.status().is_success());
    let doc: Value = response.json().await.expect("openapi body");
    assert!(doc["paths"]["/api/venue/gigs"].is_object());
}

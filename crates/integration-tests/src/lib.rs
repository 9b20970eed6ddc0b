//! Integration tests for Storepulse.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p storepulse-cli -- migrate
//!
//! # Start the API server
//! cargo run -p storepulse-api
//!
//! # Run integration tests
//! cargo test -p storepulse-integration-tests -- --ignored
//! ```
//!
//! All tests are `#[ignore]`d by default because they need a running server
//! (override the address with `API_BASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{Value, json};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A unique email address per call, so tests can re-run against the same
/// database without tripping the unique constraint.
#[must_use]
pub fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{tag}-{nanos}-{seq}@integration.test")
}

/// A signed-up account with its bearer token.
#[derive(Debug)]
pub struct TestAccount {
    pub id: i64,
    pub email: String,
    pub token: String,
}

/// Sign up a fresh account with the given role and return its token.
///
/// # Panics
///
/// Panics when the server is unreachable or signup fails; these helpers run
/// only inside `#[ignore]`d tests.
pub async fn signup(client: &Client, tag: &str, role: &str) -> TestAccount {
    let email = unique_email(tag);
    let resp = client
        .post(format!("{}/api/auth/signup", base_url()))
        .json(&json!({
            "name": format!("Integration {tag}"),
            "email": email,
            "password": "Sup3r$ecret",
            "address": "1 Test Lane",
            "role": role,
        }))
        .send()
        .await
        .expect("signup request failed");

    assert_eq!(resp.status(), 201, "signup should return 201");
    let body: Value = resp.json().await.expect("signup response not JSON");

    TestAccount {
        id: body["id"].as_i64().expect("signup response missing id"),
        email,
        token: body["token"]
            .as_str()
            .expect("signup response missing token")
            .to_owned(),
    }
}

/// GET a JSON endpoint with a bearer token.
pub async fn get_json(client: &Client, path: &str, token: &str) -> (u16, Value) {
    let resp = client
        .get(format!("{}{path}", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("request failed");
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

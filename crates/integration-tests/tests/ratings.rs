//! Integration tests for rating submission and upsert semantics.
//!
//! Run with: cargo test -p storepulse-integration-tests -- --ignored

use reqwest::Client;
use serde_json::{Value, json};

use storepulse_integration_tests::{base_url, get_json, signup};

/// Create a store owned by a fresh store owner, returning its ID.
async fn create_store(client: &Client) -> i64 {
    let owner = signup(client, "rating-owner", "Store Owner").await;

    let resp = client
        .post(format!("{}/api/stores", base_url()))
        .bearer_auth(&owner.token)
        .json(&json!({
            "name": "Rated Store",
            "email": "rated@integration.test",
            "address": "9 Rating Rd",
        }))
        .send()
        .await
        .expect("store creation failed");
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("store response not JSON");
    body["id"].as_i64().expect("store response missing id")
}

async fn submit_rating(client: &Client, token: &str, store_id: i64, score: i64) -> u16 {
    client
        .post(format!("{}/api/ratings", base_url()))
        .bearer_auth(token)
        .json(&json!({ "storeId": store_id, "score": score }))
        .send()
        .await
        .expect("rating request failed")
        .status()
        .as_u16()
}

/// Find a store entry in the public listing by ID.
fn find_store(listing: &Value, store_id: i64) -> Value {
    listing
        .as_array()
        .expect("listing should be an array")
        .iter()
        .find(|s| s["id"].as_i64() == Some(store_id))
        .cloned()
        .expect("store missing from listing")
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_resubmit_updates_instead_of_duplicating() {
    let client = Client::new();
    let store_id = create_store(&client).await;
    let rater = signup(&client, "rater", "Normal User").await;

    assert_eq!(submit_rating(&client, &rater.token, store_id, 5).await, 200);

    let (status, listing) = get_json(&client, "/api/public/stores", &rater.token).await;
    assert_eq!(status, 200);
    let entry = find_store(&listing, store_id);
    assert_eq!(entry["myRating"].as_i64(), Some(5));
    assert_eq!(entry["ratingCount"].as_i64(), Some(1));

    // Re-submitting replaces the score; the count must not grow.
    assert_eq!(submit_rating(&client, &rater.token, store_id, 3).await, 200);

    let (_, listing) = get_json(&client, "/api/public/stores", &rater.token).await;
    let entry = find_store(&listing, store_id);
    assert_eq!(entry["myRating"].as_i64(), Some(3));
    assert_eq!(entry["ratingCount"].as_i64(), Some(1));
    assert_eq!(entry["rating"].as_f64(), Some(3.0));
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_average_is_mean_rounded_to_one_decimal() {
    let client = Client::new();
    let store_id = create_store(&client).await;

    let first = signup(&client, "avg1", "Normal User").await;
    let second = signup(&client, "avg2", "Normal User").await;
    let third = signup(&client, "avg3", "Normal User").await;

    submit_rating(&client, &first.token, store_id, 5).await;
    submit_rating(&client, &second.token, store_id, 4).await;
    submit_rating(&client, &third.token, store_id, 4).await;

    let (_, listing) = get_json(&client, "/api/public/stores", &first.token).await;
    let entry = find_store(&listing, store_id);

    // (5 + 4 + 4) / 3 = 4.333... -> 4.3
    assert_eq!(entry["rating"].as_f64(), Some(4.3));
    assert_eq!(entry["ratingCount"].as_i64(), Some(3));
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_out_of_range_score_is_400() {
    let client = Client::new();
    let store_id = create_store(&client).await;
    let rater = signup(&client, "range", "Normal User").await;

    assert_eq!(submit_rating(&client, &rater.token, store_id, 0).await, 400);
    assert_eq!(submit_rating(&client, &rater.token, store_id, 6).await, 400);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_missing_store_is_404() {
    let client = Client::new();
    let rater = signup(&client, "ghost", "Normal User").await;

    assert_eq!(
        submit_rating(&client, &rater.token, 999_999_999, 4).await,
        404
    );
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_guest_listing_has_no_personal_rating() {
    let client = Client::new();
    let store_id = create_store(&client).await;

    let resp = client
        .get(format!("{}/api/guest/stores", base_url()))
        .send()
        .await
        .expect("guest listing failed");
    assert_eq!(resp.status(), 200);

    let listing: Value = resp.json().await.expect("guest listing not JSON");
    let entry = find_store(&listing, store_id);
    assert!(entry.get("myRating").is_none());
    assert!(entry["rating"].is_number());
}

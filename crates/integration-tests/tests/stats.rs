//! Integration tests for the three dashboards.
//!
//! Run with: cargo test -p storepulse-integration-tests -- --ignored

use reqwest::Client;
use serde_json::json;

use storepulse_integration_tests::{base_url, get_json, signup};

#[tokio::test]
#[ignore = "Requires a freshly migrated, empty database and a running API server"]
async fn test_admin_stats_on_fresh_database_are_zero() {
    let client = Client::new();
    let admin = signup(&client, "fresh-admin", "System Administrator").await;

    let (status, body) = get_json(&client, "/api/stats/admin", &admin.token).await;
    assert_eq!(status, 200);

    // The admin created above is the only row anywhere.
    assert_eq!(body["totalUsers"].as_i64(), Some(1));
    assert_eq!(body["totalStores"].as_i64(), Some(0));
    assert_eq!(body["totalRatings"].as_i64(), Some(0));
    assert_eq!(body["activeUsers"].as_i64(), Some(0));
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_admin_stats_requires_admin_role() {
    let client = Client::new();
    let user = signup(&client, "stats-user", "Normal User").await;

    let (status, _) = get_json(&client, "/api/stats/admin", &user.token).await;
    assert_eq!(status, 401);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_user_stats_zero_without_ratings() {
    let client = Client::new();
    let user = signup(&client, "no-ratings", "Normal User").await;

    let (status, body) = get_json(&client, "/api/stats/user", &user.token).await;
    assert_eq!(status, 200);
    assert_eq!(body["totalReviewsGiven"].as_i64(), Some(0));
    assert_eq!(body["averageRatingGiven"].as_f64(), Some(0.0));
    assert!(body["memberSince"].is_string());
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_store_stats_histogram_and_reviews() {
    let client = Client::new();
    let owner = signup(&client, "stats-owner", "Store Owner").await;

    let resp = client
        .post(format!("{}/api/stores", base_url()))
        .bearer_auth(&owner.token)
        .json(&json!({
            "name": "Stats Store",
            "email": "stats@integration.test",
            "address": "3 Stats St",
        }))
        .send()
        .await
        .expect("store creation failed");
    let store: serde_json::Value = resp.json().await.expect("store response not JSON");
    let store_id = store["id"].as_i64().expect("missing id");

    for (tag, score) in [("h1", 5), ("h2", 5), ("h3", 2)] {
        let rater = signup(&client, tag, "Normal User").await;
        let resp = client
            .post(format!("{}/api/ratings", base_url()))
            .bearer_auth(&rater.token)
            .json(&json!({ "storeId": store_id, "score": score }))
            .send()
            .await
            .expect("rating request failed");
        assert_eq!(resp.status(), 200);
    }

    let (status, body) = get_json(&client, "/api/stats/store", &owner.token).await;
    assert_eq!(status, 200);

    let entry = body["stores"]
        .as_array()
        .expect("stores should be an array")
        .iter()
        .find(|s| s["id"].as_i64() == Some(store_id))
        .cloned()
        .expect("store missing from dashboard");

    assert_eq!(entry["totalRatings"].as_i64(), Some(3));
    // (5 + 5 + 2) / 3 = 4.0
    assert_eq!(entry["averageRating"].as_f64(), Some(4.0));
    assert_eq!(entry["ratingCounts"]["5"].as_i64(), Some(2));
    assert_eq!(entry["ratingCounts"]["2"].as_i64(), Some(1));
    assert_eq!(entry["ratingCounts"]["1"].as_i64(), Some(0));
    assert_eq!(
        entry["reviews"].as_array().map(Vec::len),
        Some(3),
        "reviews list should carry one entry per rating"
    );
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_store_stats_empty_for_non_owner() {
    let client = Client::new();
    let user = signup(&client, "owns-nothing", "Normal User").await;

    let (status, body) = get_json(&client, "/api/stats/store", &user.token).await;
    assert_eq!(status, 200);
    assert_eq!(body["stores"].as_array().map(Vec::len), Some(0));
}

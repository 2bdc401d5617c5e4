//! Live API integration tests.
//!
//! Run against a running server with: cargo test --test drones_test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("DRONES_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn unique(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

/// Category → drone → pilot → competition, then clean up.
#[tokio::test]
#[ignore]
async fn test_competition_lifecycle() {
    let client = Client::new();
    let base = base_url();
    let category_name = unique("Category");
    let drone_name = unique("Drone");
    let pilot_name = unique("Pilot");

    let resp = client
        .post(format!("{}/drone-categories", base))
        .json(&json!({ "name": category_name }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), 201);
    let category: Value = resp.json().await.unwrap();
    let category_pk = category["pk"].as_i64().unwrap();

    let resp = client
        .post(format!("{}/drones", base))
        .json(&json!({
            "name": drone_name,
            "drone_category": category_name,
            "manufacturing_date": "2020-01-01",
            "has_it_competed": false
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let drone: Value = resp.json().await.unwrap();
    assert_eq!(drone["drone_category"].as_str(), Some(category_name.as_str()));

    let resp = client
        .post(format!("{}/pilots", base))
        .json(&json!({ "name": pilot_name, "gender": "F", "races_count": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let pilot: Value = resp.json().await.unwrap();
    let pilot_url = pilot["url"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{}/competitions", base))
        .json(&json!({
            "distance_in_feet": 1500,
            "distance_achievement_date": "2021-02-03",
            "pilot": pilot_name,
            "drone": drone_name
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let pilot: Value = client.get(&pilot_url).send().await.unwrap().json().await.unwrap();
    let competitions = pilot["competitions"].as_array().unwrap();
    assert_eq!(competitions.len(), 1);
    assert_eq!(competitions[0]["drone"]["name"].as_str(), Some(drone_name.as_str()));

    let resp = client
        .delete(format!("{}/drone-categories/{}", base, category_pk))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client.delete(&pilot_url).send().await.unwrap();
    assert_eq!(resp.status(), 204);
}

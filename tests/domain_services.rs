//! Domain service contracts: validation, persistence, auth, and the
//! order lifecycle.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn created_product_reads_back_unchanged() {
    let addr = common::spawn_product_service().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/"))
        .json(&json!({ "name": "kettle", "price": 35.0, "stock": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let fetched: Value = client
        .get(format!("http://{addr}/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "kettle");
    assert_eq!(fetched["price"], 35.0);
    assert_eq!(fetched["stock"], 4);
}

#[tokio::test]
async fn create_missing_fields_is_400_and_persists_nothing() {
    let addr = common::spawn_product_service().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/"))
        .json(&json!({ "description": "no name, no price" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_fields");

    let all: Vec<Value> = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn update_merges_partial_fields_and_restamps() {
    let addr = common::spawn_product_service().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("http://{addr}/"))
        .json(&json!({ "name": "kettle", "price": 35.0, "stock": 4 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let updated: Value = client
        .put(format!("http://{addr}/{id}"))
        .json(&json!({ "price": 29.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["price"], 29.0);
    assert_eq!(updated["name"], "kettle");
    assert_eq!(updated["stock"], 4);
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let addr = common::spawn_product_service().await;
    let client = reqwest::Client::new();

    // Unknown id: 404 on both attempts.
    for _ in 0..2 {
        let res = client
            .delete(format!("http://{addr}/999"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 404);
    }

    let created: Value = client
        .post(format!("http://{addr}/"))
        .json(&json!({ "name": "gone", "price": 1.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let first = client
        .delete(format!("http://{addr}/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 204);

    let second = client
        .delete(format!("http://{addr}/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 404);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let addr = common::spawn_auth_service().await;
    let client = reqwest::Client::new();
    let payload = json!({ "email": "a@example.com", "password": "hunter2" });

    let first = client
        .post(format!("http://{addr}/register"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("http://{addr}/register"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 400);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_email");

    // User count unchanged after the rejected attempt.
    let health: Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["documents"], 1);
}

#[tokio::test]
async fn wrong_password_gets_401_and_no_token() {
    let addr = common::spawn_auth_service().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/register"))
        .json(&json!({ "email": "a@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("http://{addr}/login"))
        .json(&json!({ "email": "a@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn login_returns_signed_token() {
    let addr = common::spawn_auth_service().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/register"))
        .json(&json!({ "email": "a@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("http://{addr}/login"))
        .json(&json!({ "email": "a@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "a@example.com");
    // Three dot-separated JWT segments.
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn order_total_is_fixed_at_creation() {
    let addr = common::spawn_order_service().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/"))
        .json(&json!({
            "user_email": "a@example.com",
            "items": [
                { "price": 10.0, "quantity": 2 },
                { "price": 5.0, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["total"], 25.0);
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn order_status_transitions_are_validated() {
    let addr = common::spawn_order_service().await;
    let client = reqwest::Client::new();

    let order: Value = client
        .post(format!("http://{addr}/"))
        .json(&json!({
            "user_email": "a@example.com",
            "items": [{ "price": 10.0, "quantity": 1 }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = order["id"].as_str().unwrap();

    // pending → completed is not reachable directly.
    let res = client
        .patch(format!("http://{addr}/{id}/status"))
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_transition");

    // Unknown status string.
    let res = client
        .patch(format!("http://{addr}/{id}/status"))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_status");

    // Legal chain: pending → processing → completed.
    let res = client
        .patch(format!("http://{addr}/{id}/status"))
        .json(&json!({ "status": "processing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .patch(format!("http://{addr}/{id}/status"))
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn health_reports_memory_backend() {
    let addr = common::spawn_product_service().await;
    let health: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["service"], "product");
    assert_eq!(health["storage"], "memory");
}

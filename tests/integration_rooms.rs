use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_create_room_returns_valid_code_and_expiry() {
    let app = common::spawn_app(common::get_test_config()).await;

    let room = app.create_room().await;

    let code = room["room_code"].as_str().expect("room_code missing");
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()), "bad code: {code}");

    let created_at = room["created_at"].as_str().expect("created_at missing");
    let expires_at = room["expires_at"].as_str().expect("expires_at missing");
    // RFC 3339 strings with the same offset compare chronologically.
    assert!(expires_at > created_at);
}

#[tokio::test]
async fn test_get_room_is_case_insensitive() {
    let app = common::spawn_app(common::get_test_config()).await;

    let room = app.create_room().await;
    let code = room["room_code"].as_str().expect("room_code missing");

    let resp = app
        .client
        .get(format!("{}/rooms/{}", app.server_url, code.to_ascii_lowercase()))
        .send()
        .await
        .expect("get room failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("invalid JSON");
    assert_eq!(body["room_code"].as_str(), Some(code));
    assert_eq!(body["id"], room["id"]);
}

#[tokio::test]
async fn test_get_unknown_room_returns_404() {
    let app = common::spawn_app(common::get_test_config()).await;

    let resp = app.client.get(format!("{}/rooms/ZZZZZ0", app.server_url)).send().await.expect("request failed");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_malformed_code_returns_400() {
    let app = common::spawn_app(common::get_test_config()).await;

    for bad in ["abc", "TOOLONG1", "AB-12D"] {
        let resp = app.client.get(format!("{}/rooms/{bad}", app.server_url)).send().await.expect("request failed");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "code {bad:?} should be rejected");
    }
}

#[tokio::test]
async fn test_get_expired_room_returns_410_before_sweep() {
    let app = common::spawn_app(common::get_test_config()).await;

    let (_, code) = app.insert_expired_room().await;

    let resp = app.client.get(format!("{}/rooms/{code}", app.server_url)).send().await.expect("request failed");

    assert_eq!(resp.status(), StatusCode::GONE);
    let body: serde_json::Value = resp.json().await.expect("invalid JSON");
    assert!(body["error"].as_str().expect("error message missing").contains("expired"));
}

#[tokio::test]
async fn test_delete_room_then_404() {
    let app = common::spawn_app(common::get_test_config()).await;

    let room = app.create_room().await;
    let code = room["room_code"].as_str().expect("room_code missing");

    let resp = app.client.delete(format!("{}/rooms/{code}", app.server_url)).send().await.expect("delete failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("invalid JSON");
    assert_eq!(body["success"], serde_json::json!(true));

    let resp = app.client.get(format!("{}/rooms/{code}", app.server_url)).send().await.expect("get failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Deleting again reports not found rather than failing oddly.
    let resp = app.client.delete(format!("{}/rooms/{code}", app.server_url)).send().await.expect("delete failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_created_codes_are_unique_among_active_rooms() {
    let app = common::spawn_app(common::get_test_config()).await;

    let mut codes = std::collections::HashSet::new();
    for _ in 0..10 {
        let room = app.create_room().await;
        let code = room["room_code"].as_str().expect("room_code missing").to_string();
        assert!(codes.insert(code.clone()), "duplicate code issued: {code}");
    }
}

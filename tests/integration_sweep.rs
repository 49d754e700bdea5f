use reqwest::StatusCode;
use time::OffsetDateTime;
use uuid::Uuid;

mod common;

async fn file_row_count(pool: &sqlx::PgPool, room_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM files WHERE room_id = $1")
        .bind(room_id)
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

// Single test so intermediate sweep counts are not perturbed by parallel
// test threads inserting their own expired rooms.
#[tokio::test]
async fn test_sweep_reaps_expired_rooms_only_and_is_idempotent() {
    let app = common::spawn_app(common::get_test_config()).await;

    // Expired room with a dangling file row. The backing object is absent,
    // which the teardown must tolerate.
    let (expired_id, expired_code) = app.insert_expired_room().await;
    sqlx::query("INSERT INTO files (id, room_id, file_name, file_path, uploaded_at) VALUES ($1, $2, $3, $4, $5)")
        .bind(Uuid::new_v4())
        .bind(expired_id)
        .bind("old.png")
        .bind(format!("rooms/{expired_id}/0_old.png"))
        .bind(OffsetDateTime::now_utc())
        .execute(&app.pool)
        .await
        .expect("failed to insert file row");

    // Active room with a real upload.
    let active = app.create_room().await;
    let active_code = active["room_code"].as_str().expect("room_code missing");
    let active_id: Uuid = active["id"].as_str().expect("id missing").parse().expect("invalid uuid");
    let resp = app.upload_file(active_code, "keep.png", "image/png", vec![0u8; 128]).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // First sweep reaps the expired room and everything it owned.
    let resp = app.client.post(format!("{}/cleanup", app.server_url)).send().await.expect("cleanup failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("invalid JSON");
    assert!(body["deleted"].as_u64().expect("deleted missing") >= 1);

    let resp = app.client.get(format!("{}/rooms/{expired_code}", app.server_url)).send().await.expect("get failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(file_row_count(&app.pool, expired_id).await, 0);

    // The active room and its file survive untouched.
    let resp = app.client.get(format!("{}/rooms/{active_code}", app.server_url)).send().await.expect("get failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(file_row_count(&app.pool, active_id).await, 1);
    let resp = app
        .client
        .get(format!("{}/rooms/{active_code}/files", app.server_url))
        .send()
        .await
        .expect("list failed");
    let files: Vec<serde_json::Value> = resp.json().await.expect("invalid JSON");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["file_name"].as_str(), Some("keep.png"));

    // Second sweep with nothing newly expired is a no-op, not an error.
    let resp = app.client.post(format!("{}/cleanup", app.server_url)).send().await.expect("cleanup failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("invalid JSON");
    assert_eq!(body["deleted"].as_u64(), Some(0));
}

//! Per-user progress and favorites through the HTTP router.

use anitrack::config::Config;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!(
        "anitrack-tracking-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = anitrack::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    anitrack::api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn login_as(app: &Router, username: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "correct-horse",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "correct-horse" })),
    )
    .await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    (user_id, token)
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> i64 {
    let (status, body) = send(app, "POST", uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_first_read_creates_default_progress() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "watcher").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Monster" })).await;
    let uri = format!("/anime/{anime_id}/progress/{user_id}");

    let (status, first) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["data"]["episodes_watched"], 0);
    assert_eq!(first["data"]["status"], "Plan to Watch");
    assert_eq!(first["data"]["score"], Value::Null);

    let (status, second) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["id"], first["data"]["id"]);

    let (_, list) = send(&app, "GET", &format!("/users/{user_id}/progress"), Some(&token), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeated_upsert_keeps_one_row_with_latest_values() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "watcher").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Planetes" })).await;
    let uri = format!("/anime/{anime_id}/progress");

    let (status, first) = send(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "user_id": user_id, "episodes_watched": 3, "status": "Watching", "score": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["data"]["episodes_watched"], 3);
    assert_eq!(first["data"]["status"], "Watching");

    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, second) = send(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "user_id": user_id, "episodes_watched": 26, "status": "Completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["episodes_watched"], 26);
    assert_eq!(second["data"]["status"], "Completed");
    // Omitted fields keep their stored value.
    assert_eq!(second["data"]["score"], 7);

    let first_updated =
        chrono::DateTime::parse_from_rfc3339(first["data"]["last_updated"].as_str().unwrap()).unwrap();
    let second_updated =
        chrono::DateTime::parse_from_rfc3339(second["data"]["last_updated"].as_str().unwrap()).unwrap();
    assert!(second_updated > first_updated);

    // An explicit null clears the score.
    let (_, cleared) = send(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "user_id": user_id, "score": null })),
    )
    .await;
    assert_eq!(cleared["data"]["score"], Value::Null);

    let (_, list) = send(&app, "GET", &format!("/users/{user_id}/progress"), Some(&token), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_progress_rejects_out_of_range_values() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "watcher").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Mononoke" })).await;
    let uri = format!("/anime/{anime_id}/progress");

    for body in [
        json!({ "user_id": user_id, "score": 11 }),
        json!({ "user_id": user_id, "score": 0 }),
        json!({ "user_id": user_id, "episodes_watched": -1 }),
    ] {
        let (status, _) = send(&app, "POST", &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "user_id": user_id, "status": "Rewatching" })),
    )
    .await;
    assert!(status.is_client_error());

    let (status, body) = send(
        &app,
        "POST",
        "/anime/999/progress",
        Some(&token),
        Some(json!({ "user_id": user_id, "episodes_watched": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Anime 999"));
}

#[tokio::test]
async fn test_cannot_touch_another_users_tracking() {
    let app = spawn_app().await;
    let (alice, alice_token) = login_as(&app, "alice").await;
    let (bob, _) = login_as(&app, "bob").await;
    let anime_id = create(&app, &alice_token, "/anime", json!({ "title": "Haikyuu" })).await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/anime/{anime_id}/progress/{bob}"),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/anime/{anime_id}/progress"),
        Some(&alice_token),
        Some(json!({ "user_id": bob, "episodes_watched": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &format!("/users/{bob}/favorites"), Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/users/{bob}/favorites"),
        Some(&alice_token),
        Some(json!({ "anime_id": anime_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &format!("/users/{alice}/favorites"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorites_have_one_target_and_no_duplicates() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "fan").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Nichijou" })).await;
    let character = create(&app, &token, "/characters", json!({ "name": "Nano" })).await;
    let uri = format!("/users/{user_id}/favorites");

    let (status, first) = send(&app, "POST", &uri, Some(&token), Some(json!({ "anime_id": anime_id }))).await;
    assert_eq!(status, StatusCode::CREATED, "{first}");
    assert_eq!(first["data"]["target"]["kind"], "anime");

    let (status, again) = send(&app, "POST", &uri, Some(&token), Some(json!({ "anime_id": anime_id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(again["data"]["id"], first["data"]["id"]);

    let (status, fav) = send(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "character_id": character })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(fav["data"]["target"]["kind"], "character");
    assert_eq!(fav["data"]["target"]["name"], "Nano");

    for body in [
        json!({ "anime_id": anime_id, "character_id": character }),
        json!({}),
    ] {
        let (status, _) = send(&app, "POST", &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    let (status, body) = send(&app, "POST", &uri, Some(&token), Some(json!({ "character_id": 4040 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Character 4040"));

    let (_, list) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let favorite_id = first["data"]["id"].as_i64().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("{uri}/{favorite_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("{uri}/{favorite_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleting_anime_removes_tracking_rows() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "fan").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Toradora" })).await;

    send(
        &app,
        "POST",
        &format!("/anime/{anime_id}/progress"),
        Some(&token),
        Some(json!({ "user_id": user_id, "episodes_watched": 5 })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(&token),
        Some(json!({ "anime_id": anime_id })),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/anime/{anime_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, progress) = send(&app, "GET", &format!("/users/{user_id}/progress"), Some(&token), None).await;
    assert_eq!(progress["data"], json!([]));
    let (_, favorites) = send(&app, "GET", &format!("/users/{user_id}/favorites"), Some(&token), None).await;
    assert_eq!(favorites["data"], json!([]));
}

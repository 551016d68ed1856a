//! Catalog, association and auth flows through the HTTP router.

use anitrack::config::Config;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashSet;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("anitrack-api-test-{}.db", uuid::Uuid::new_v4()));

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

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    (user_id, token)
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> i64 {
    let (status, body) = send(app, "POST", uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {body}");
    body["data"]["id"].as_i64().unwrap()
}

fn ids(list: &Value) -> HashSet<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_writes_require_bearer_token() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "POST", "/anime", None, Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/users/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Reads of the catalog are public.
    let (status, _) = send(&app, "GET", "/anime", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_me_logout() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64(), Some(user_id));
    assert_eq!(body["data"]["username"], "alice");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": "alice", "email": "other@example.com", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = spawn_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": "bob", "email": "bob@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_anime_with_genres_reads_back_links() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;

    let action = create(&app, &token, "/genres", json!({ "name": "Action" })).await;
    let drama = create(&app, &token, "/genres", json!({ "name": "Drama" })).await;
    let studio = create(
        &app,
        &token,
        "/studios",
        json!({ "name": "Bones", "country": "Japan", "founded_year": 1998 }),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/anime",
        Some(&token),
        Some(json!({
            "title": "Fullmetal Alchemist",
            "type": "TV",
            "status": "Finished",
            "studio_id": studio,
            "genres": [action, drama, action],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["type"], "TV");
    assert_eq!(body["data"]["studio"]["name"], "Bones");
    assert_eq!(ids(&body["data"]["genres"]), HashSet::from([action, drama]));
    let anime_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/anime/{anime_id}/genres"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]), HashSet::from([action, drama]));
}

#[tokio::test]
async fn test_create_anime_with_unknown_genre_writes_nothing() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;

    let (status, body) = send(
        &app,
        "POST",
        "/anime",
        Some(&token),
        Some(json!({ "title": "Ghost", "genres": [999] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Genre 999"));

    let (_, body) = send(&app, "GET", "/anime", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_update_anime_replaces_genres_only_when_supplied() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;

    let action = create(&app, &token, "/genres", json!({ "name": "Action" })).await;
    let comedy = create(&app, &token, "/genres", json!({ "name": "Comedy" })).await;
    let anime_id = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "Gintama", "genres": [action] }),
    )
    .await;

    let uri = format!("/anime/{anime_id}");
    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "synopsis": "Samurai" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["synopsis"], "Samurai");
    assert_eq!(ids(&body["data"]["genres"]), HashSet::from([action]));

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "genres": [comedy] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["genres"]), HashSet::from([comedy]));

    let (status, _) = send(&app, "PUT", "/anime/4242", Some(&token), Some(json!({ "title": "Nope" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_filters_and_pagination() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;

    let (status, body) = send(&app, "GET", "/anime", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let mecha = create(&app, &token, "/genres", json!({ "name": "Mecha" })).await;
    let eva = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "Neon Genesis Evangelion", "status": "Finished", "genres": [mecha] }),
    )
    .await;
    let gurren = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "Gurren Lagann", "status": "Finished", "genres": [mecha] }),
    )
    .await;
    let frieren = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "Frieren", "status": "Airing" }),
    )
    .await;

    let (_, body) = send(&app, "GET", "/anime?search=GENESIS", None, None).await;
    assert_eq!(ids(&body["data"]), HashSet::from([eva]));

    let (_, body) = send(&app, "GET", "/anime?genre_name=Mecha", None, None).await;
    assert_eq!(ids(&body["data"]), HashSet::from([eva, gurren]));

    // Genre names match exactly.
    let (_, body) = send(&app, "GET", "/anime?genre_name=mecha", None, None).await;
    assert_eq!(body["data"], json!([]));

    let (_, body) = send(&app, "GET", "/anime?status=Airing", None, None).await;
    assert_eq!(ids(&body["data"]), HashSet::from([frieren]));

    let (_, body) = send(&app, "GET", "/anime?search=%25", None, None).await;
    assert_eq!(body["data"], json!([]));

    let (_, body) = send(&app, "GET", "/anime?skip=1&limit=1", None, None).await;
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"].as_i64(), Some(gurren));

    let (status, _) = send(&app, "GET", "/anime?limit=5000", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_entities_are_named() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;

    let (status, body) = send(&app, "GET", "/anime/77", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Anime 77"));

    let anime_id = create(&app, &token, "/anime", json!({ "title": "Mushishi" })).await;
    let (status, body) = send(
        &app,
        "POST",
        &format!("/anime/{anime_id}/characters/55?role=Main"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Character 55"));

    let (status, _) = send(&app, "GET", "/anime/0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_episodes_are_ordered_and_numbers_unique() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Cowboy Bebop" })).await;

    for number in [3, 1, 2] {
        create(
            &app,
            &token,
            "/episodes",
            json!({ "anime_id": anime_id, "episode_number": number, "title": format!("Session {number}") }),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", &format!("/episodes/anime/{anime_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ep| ep["episode_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let (status, _) = send(
        &app,
        "POST",
        "/episodes",
        Some(&token),
        Some(json!({ "anime_id": anime_id, "episode_number": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/episodes",
        Some(&token),
        Some(json!({ "anime_id": 9999, "episode_number": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, alias) = send(&app, "GET", &format!("/anime/{anime_id}/episodes"), None, None).await;
    assert_eq!(alias["data"], body["data"]);
}

#[tokio::test]
async fn test_genre_link_is_idempotent() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let genre = create(&app, &token, "/genres", json!({ "name": "Slice of Life" })).await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Yuru Camp" })).await;
    let uri = format!("/anime/{anime_id}/genres/{genre}");

    for _ in 0..2 {
        let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["genre_id"].as_i64(), Some(genre));
    }

    let (_, body) = send(&app, "GET", &format!("/anime/{anime_id}/genres"), None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    // Removing a link that is not there is not an error.
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &format!("/anime/{anime_id}/genres"), None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_character_link_conflicts_until_unlinked() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Steins;Gate" })).await;
    let character = create(&app, &token, "/characters", json!({ "name": "Okabe Rintarou" })).await;
    let uri = format!("/anime/{anime_id}/characters/{character}?role=Main");

    let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "Main");

    let (status, _) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/anime/{anime_id}/characters/{character}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/anime/{anime_id}/characters/{character}?role=Supporting"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", &format!("/anime/{anime_id}/characters"), None, None).await;
    let linked = body["data"].as_array().unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0]["role"], "Supporting");
    assert_eq!(linked[0]["name"], "Okabe Rintarou");

    let (_, body) = send(&app, "GET", &format!("/characters/{character}/anime"), None, None).await;
    assert_eq!(body["data"][0]["anime"]["id"].as_i64(), Some(anime_id));
}

#[tokio::test]
async fn test_voice_actor_link_updates_language() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let character = create(&app, &token, "/characters", json!({ "name": "Spike Spiegel" })).await;
    let actor = create(
        &app,
        &token,
        "/voice-actors",
        json!({ "name": "Koichi Yamadera", "nationality": "Japanese" }),
    )
    .await;

    let base = format!("/characters/{character}/voice-actors/{actor}");
    let (status, _) = send(&app, "POST", &format!("{base}?language=Japanese"), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", &format!("{base}?language=English"), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", &format!("/characters/{character}/voice-actors"), None, None).await;
    let actors = body["data"].as_array().unwrap();
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0]["language"], "English");

    let (_, body) = send(&app, "GET", &format!("/voice-actors/{actor}/characters"), None, None).await;
    assert_eq!(body["data"][0]["id"].as_i64(), Some(character));

    let (status, _) = send(&app, "POST", &format!("{base}?language=%20"), Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_anime_cascades_links_and_episodes() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let genre = create(&app, &token, "/genres", json!({ "name": "Horror" })).await;
    let anime_id = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "Another", "genres": [genre] }),
    )
    .await;
    let character = create(&app, &token, "/characters", json!({ "name": "Mei Misaki" })).await;
    send(
        &app,
        "POST",
        &format!("/anime/{anime_id}/characters/{character}?role=Main"),
        Some(&token),
        None,
    )
    .await;
    create(
        &app,
        &token,
        "/episodes",
        json!({ "anime_id": anime_id, "episode_number": 1 }),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/anime/{anime_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/anime/{anime_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/characters/{character}/anime"), None, None).await;
    assert_eq!(body["data"], json!([]));

    // The genre itself survives.
    let (status, _) = send(&app, "GET", &format!("/genres/{genre}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_studio_detaches_anime() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let studio = create(&app, &token, "/studios", json!({ "name": "Gainax" })).await;
    let anime_id = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "FLCL", "studio_id": studio }),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/studios/{studio}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/anime/{anime_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["studio_id"], Value::Null);

    let (status, _) = send(&app, "POST", "/studios", Some(&token), Some(json!({ "name": "Trigger" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/studios", Some(&token), Some(json!({ "name": "Trigger" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_search_folds_ascii_case_only() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "POKÉMON Origins" })).await;

    let (_, body) = send(&app, "GET", "/anime?search=pok%C3%89mon", None, None).await;
    assert_eq!(ids(&body["data"]), HashSet::from([anime_id]));

    let (_, body) = send(&app, "GET", "/anime?search=origins", None, None).await;
    assert_eq!(ids(&body["data"]), HashSet::from([anime_id]));
}

#[tokio::test]
async fn test_delete_character_cascades_links_and_favorites() {
    let app = spawn_app().await;
    let (user_id, token) = login_as(&app, "curator").await;
    let anime_id = create(&app, &token, "/anime", json!({ "title": "Berserk" })).await;
    let character = create(&app, &token, "/characters", json!({ "name": "Guts" })).await;
    let actor = create(&app, &token, "/voice-actors", json!({ "name": "Hiroaki Iwanaga" })).await;

    send(
        &app,
        "POST",
        &format!("/anime/{anime_id}/characters/{character}?role=Main"),
        Some(&token),
        None,
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/characters/{character}/voice-actors/{actor}?language=Japanese"),
        Some(&token),
        None,
    )
    .await;
    create(
        &app,
        &token,
        &format!("/users/{user_id}/favorites"),
        json!({ "character_id": character }),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/characters/{character}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/characters/{character}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/anime/{anime_id}/characters"), None, None).await;
    assert_eq!(body["data"], json!([]));
    let (_, body) = send(&app, "GET", &format!("/voice-actors/{actor}/characters"), None, None).await;
    assert_eq!(body["data"], json!([]));
    let (_, body) = send(&app, "GET", &format!("/users/{user_id}/favorites"), Some(&token), None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(&app, "DELETE", &format!("/characters/{character}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_genre_removes_its_links() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let genre = create(&app, &token, "/genres", json!({ "name": "Sports" })).await;
    let kept = create(&app, &token, "/genres", json!({ "name": "Comedy" })).await;
    let anime_id = create(
        &app,
        &token,
        "/anime",
        json!({ "title": "Ping Pong", "genres": [genre, kept] }),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/genres/{genre}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &format!("/anime/{anime_id}/genres"), None, None).await;
    assert_eq!(ids(&body["data"]), HashSet::from([kept]));

    let (_, body) = send(&app, "GET", "/anime?genre_name=Sports", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_delete_voice_actor_removes_its_links() {
    let app = spawn_app().await;
    let (_, token) = login_as(&app, "curator").await;
    let character = create(&app, &token, "/characters", json!({ "name": "Edward Elric" })).await;
    let actor = create(&app, &token, "/voice-actors", json!({ "name": "Romi Park" })).await;

    send(
        &app,
        "POST",
        &format!("/characters/{character}/voice-actors/{actor}?language=Japanese"),
        Some(&token),
        None,
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/voice-actors/{actor}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/voice-actors/{actor}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &format!("/characters/{character}/voice-actors"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

//! HTTP-level integration tests for the public activity endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get, patch_json_auth, post_json, post_json_auth,
    token_for,
};
use nachbar_core::roles::UserRole;
use sqlx::PgPool;

/// Create an activity through the API and return its JSON detail.
async fn create_activity(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/activities", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn activity_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Gemeinsam durch den Park",
        "category": "OUTDOOR",
        "plz": "63073",
    })
}

async fn list(pool: &PgPool, query: &str) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/activities{query}")).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_returns_detail_with_images(pool: PgPool) {
    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&user);

    let mut body = activity_body("Morning walk");
    body["imageUrls"] = serde_json::json!([
        "https://cdn.example.com/first.jpg",
        "https://cdn.example.com/second.jpg",
    ]);
    body["startAt"] = serde_json::json!("2026-03-01T09:00:00Z");
    let json = create_activity(&pool, &token, body).await;

    assert_eq!(json["title"], "Morning walk");
    assert_eq!(json["category"], "OUTDOOR");
    assert_eq!(json["startAt"], "2026-03-01T09:00:00Z");
    assert_eq!(json["createdBy"]["id"], user.id.to_string());
    assert_eq!(json["createdBy"]["displayName"], "Neighbor");
    assert_eq!(json["thumbnailUrl"], "https://cdn.example.com/first.jpg");
    assert_eq!(json["images"].as_array().unwrap().len(), 2);
    assert_eq!(json["images"][1]["sortOrder"], 1);
    assert_eq!(json["images"][0]["alt"], "Morning walk");

    let id = json["id"].as_str().unwrap();
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/activities/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["description"], "Gemeinsam durch den Park");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_requires_auth_and_valid_input(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/activities",
        activity_body("Morning walk"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&user);

    let mut bad_plz = activity_body("Morning walk");
    bad_plz["plz"] = serde_json::json!("6307");
    let mut bad_category = activity_body("Morning walk");
    bad_category["category"] = serde_json::json!("PARTY");
    let mut too_many_images = activity_body("Morning walk");
    too_many_images["imageUrls"] =
        serde_json::json!(vec!["https://cdn.example.com/a.jpg"; 6]);

    for body in [activity_body("ab"), bad_plz, bad_category, too_many_images] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/activities", &token, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_pages_through_newest_first(pool: PgPool) {
    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&user);
    let a3 = create_activity(&pool, &token, activity_body("Third oldest")).await;
    let a2 = create_activity(&pool, &token, activity_body("Second oldest")).await;
    let a1 = create_activity(&pool, &token, activity_body("Newest one")).await;

    let (status, first) = list(&pool, "?take=2").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&serde_json::Value> = first["items"].as_array().unwrap().iter().map(|i| &i["id"]).collect();
    assert_eq!(ids, vec![&a1["id"], &a2["id"]]);
    assert_eq!(first["nextCursor"], a2["id"]);

    let cursor = first["nextCursor"].as_str().unwrap();
    let (_, second) = list(&pool, &format!("?take=2&cursor={cursor}")).await;
    assert_eq!(second["items"].as_array().unwrap().len(), 1);
    assert_eq!(second["items"][0]["id"], a3["id"]);
    assert!(second["nextCursor"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_cursor_handling(pool: PgPool) {
    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    create_activity(&pool, &token_for(&user), activity_body("Morning walk")).await;

    let (status, json) = list(&pool, "?cursor=a2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let unknown = uuid::Uuid::new_v4();
    let (status, json) = list(&pool, &format!("?cursor={unknown}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["items"].as_array().unwrap().is_empty());
    assert!(json["nextCursor"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_take_beyond_integer_range_is_clamped(pool: PgPool) {
    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&user);
    create_activity(&pool, &token, activity_body("Morning walk")).await;
    create_activity(&pool, &token, activity_body("Evening walk")).await;

    let (status, json) = list(&pool, "?take=99999999999999999999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);

    let (status, json) = list(&pool, "?take=-99999999999999999999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert!(json["nextCursor"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_id_uses_error_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/activities/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_filters(pool: PgPool) {
    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&user);

    let mut social = activity_body("Kaffee und Kuchen");
    social["category"] = serde_json::json!("SOCIAL");
    social["plz"] = serde_json::json!("01067");
    create_activity(&pool, &token, social).await;
    create_activity(&pool, &token, activity_body("Morning walk")).await;

    let (_, by_category) = list(&pool, "?category=SOCIAL").await;
    assert_eq!(by_category["items"].as_array().unwrap().len(), 1);
    assert_eq!(by_category["items"][0]["title"], "Kaffee und Kuchen");

    let (_, by_plz) = list(&pool, "?plz=63073").await;
    assert_eq!(by_plz["items"].as_array().unwrap().len(), 1);
    assert_eq!(by_plz["items"][0]["title"], "Morning walk");

    let (_, by_text) = list(&pool, "?q=kuchen").await;
    assert_eq!(by_text["items"].as_array().unwrap().len(), 1);

    let (_, by_owner) = list(&pool, &format!("?createdById={}", user.id)).await;
    assert_eq!(by_owner["items"].as_array().unwrap().len(), 2);

    let (status, _) = list(&pool, "?plz=123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = list(&pool, "?startFrom=someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_date_range_uses_schedule(pool: PgPool) {
    let user = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&user);

    let mut inside = activity_body("Scheduled in range");
    inside["startAt"] = serde_json::json!("2026-01-15T18:00:00Z");
    let mut outside = activity_body("Scheduled later");
    outside["startAt"] = serde_json::json!("2026-05-01T18:00:00Z");
    create_activity(&pool, &token, inside).await;
    create_activity(&pool, &token, outside).await;

    let (_, json) = list(&pool, "?startFrom=2026-01-01&startTo=2026-02-01").await;
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Scheduled in range");
}

// ---------------------------------------------------------------------------
// Owner writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_by_owner_replaces_images(pool: PgPool) {
    let owner = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&owner);
    let mut body = activity_body("Morning walk");
    body["imageUrls"] = serde_json::json!(["https://cdn.example.com/old.jpg"]);
    let created = create_activity(&pool, &token, body).await;
    let id = created["id"].as_str().unwrap();

    let patch = serde_json::json!({ "imageUrls": ["https://cdn.example.com/new.jpg"], "plz": "01067" });
    let response = patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/activities/{id}"),
        &token,
        patch,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Morning walk");
    assert_eq!(json["plz"], "01067");
    assert_eq!(json["thumbnailUrl"], "https://cdn.example.com/new.jpg");
    assert_eq!(json["images"][0]["alt"], "Activity image");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_owner_cannot_modify(pool: PgPool) {
    let owner = create_user(&pool, "owner@example.com", UserRole::User).await;
    let other = create_user(&pool, "other@example.com", UserRole::User).await;
    let created = create_activity(&pool, &token_for(&owner), activity_body("Morning walk")).await;
    let uri = format!("/api/v1/activities/{}", created["id"].as_str().unwrap());

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token_for(&other),
        serde_json::json!({ "title": "Hijacked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(common::build_test_app(pool), &uri, &token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_hides_activity(pool: PgPool) {
    let owner = create_user(&pool, "owner@example.com", UserRole::User).await;
    let token = token_for(&owner);
    let created = create_activity(&pool, &token, activity_body("Morning walk")).await;
    let uri = format!("/api/v1/activities/{}", created["id"].as_str().unwrap());

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], true);

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (_, feed) = list(&pool, "").await;
    assert!(feed["items"].as_array().unwrap().is_empty());

    // Archived activities are gone for their owner too.
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = patch_json_auth(
        common::build_test_app(pool),
        &uri,
        &token,
        serde_json::json!({ "title": "Back again" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! HTTP-level integration tests for signup, login, the auth extractor and
//! role gates.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get, get_auth, get_cookie, post_json, token_for, TEST_PASSWORD,
};
use nachbar_core::roles::UserRole;
use nachbar_db::repositories::{ProfileRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_creates_account_and_profile(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "email": "  Julia@Example.DE ",
        "password": "long-enough",
        "displayName": "Julia S.",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["email"], "julia@example.de");
    assert!(json["id"].is_string());
    assert!(json.get("passwordHash").is_none());

    let user = UserRepo::find_by_email(&pool, "julia@example.de")
        .await
        .unwrap()
        .unwrap();
    let profile = ProfileRepo::find_by_user(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Julia S."));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_duplicate_email_is_conflict(pool: PgPool) {
    create_user(&pool, "taken@example.com", UserRole::User).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "TAKEN@example.com", "password": "long-enough" });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Email already in use");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_validation(pool: PgPool) {
    let cases = [
        serde_json::json!({ "email": "not-an-email", "password": "long-enough" }),
        serde_json::json!({ "email": "a@example.com", "password": "short" }),
        serde_json::json!({ "email": "a@example.com", "password": "long-enough", "displayName": "J" }),
    ];

    for body in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/auth/signup", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_returns_token_and_touches_last_active(pool: PgPool) {
    let user = create_user(&pool, "login@example.com", UserRole::User).await;
    assert!(user.last_active_at.is_none());
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "login@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["accessToken"].is_string());

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(user.last_active_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_bad_credentials(pool: PgPool) {
    create_user(&pool, "login@example.com", UserRole::User).await;

    let wrong_password = serde_json::json!({ "email": "login@example.com", "password": "nope-nope" });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        wrong_password,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown = serde_json::json!({ "email": "ghost@example.com", "password": TEST_PASSWORD });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/login", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_banned_user_is_forbidden(pool: PgPool) {
    let user = create_user(&pool, "banned@example.com", UserRole::User).await;
    UserRepo::set_ban(&pool, user.id, true, Some("spam")).await.unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "banned@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Auth extractor
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_bearer_and_cookie(pool: PgPool) {
    let user = create_user(&pool, "me@example.com", UserRole::Moderator).await;
    let token = token_for(&user);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["userId"], user.id.to_string());
    assert_eq!(json["email"], "me@example.com");
    assert_eq!(json["role"], "MODERATOR");

    let response = get_cookie(common::build_test_app(pool), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_rejects_missing_and_invalid_tokens(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/auth/me",
        "not.a.token",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_banned_user_token_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "later-banned@example.com", UserRole::User).await;
    let token = token_for(&user);
    UserRepo::set_ban(&pool, user.id, true, None).await.unwrap();

    let response = get_auth(common::build_test_app(pool), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_is_read_from_database(pool: PgPool) {
    let user = create_user(&pool, "promoted@example.com", UserRole::User).await;
    let token = token_for(&user);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/admin/ping", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    UserRepo::set_role(&pool, user.id, UserRole::Admin).await.unwrap();

    let response = get_auth(common::build_test_app(pool), "/api/v1/admin/ping", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["role"], "ADMIN");
}

// ---------------------------------------------------------------------------
// Role gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_require_admin(pool: PgPool) {
    let user = create_user(&pool, "user@example.com", UserRole::User).await;
    let moderator = create_user(&pool, "mod@example.com", UserRole::Moderator).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/admin/users").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    for who in [&user, &moderator] {
        let response = get_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/admin/activities",
            &token_for(who),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_moderator_ping_allows_staff_only(pool: PgPool) {
    let user = create_user(&pool, "user@example.com", UserRole::User).await;
    let moderator = create_user(&pool, "mod@example.com", UserRole::Moderator).await;
    let admin = create_user(&pool, "admin@example.com", UserRole::Admin).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/moderator/ping",
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    for (who, role) in [(&moderator, "MODERATOR"), (&admin, "ADMIN")] {
        let response = get_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/moderator/ping",
            &token_for(who),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["role"], role);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase REST client tests against a mocked PostgREST endpoint.

use peptalk_buddy::db::SupabaseDb;
use peptalk_buddy::models::{NewUser, NotificationFrequency, Quote, Settings, UserRole};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_upsert_user_merges_on_open_id() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(query_param("on_conflict", "openId"))
        .and(header("Prefer", "resolution=merge-duplicates"))
        .and(header("apikey", "service-key"))
        .and(body_partial_json(serde_json::json!({
            "openId": "open-1",
            "role": "user"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    db.upsert_user(&NewUser::new("open-1")).await.unwrap();
}

#[tokio::test]
async fn test_owner_open_id_is_promoted_to_admin() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_partial_json(serde_json::json!({
            "openId": "the-owner",
            "role": "admin"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "the-owner");
    db.upsert_user(&NewUser::new("the-owner")).await.unwrap();
}

#[tokio::test]
async fn test_explicit_role_wins_over_promotion() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_partial_json(serde_json::json!({"role": "user"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "the-owner");
    let user = NewUser {
        role: Some(UserRole::User),
        ..NewUser::new("the-owner")
    };
    db.upsert_user(&user).await.unwrap();
}

#[tokio::test]
async fn test_upsert_failure_is_a_database_error() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key"))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    let err = db.upsert_user(&NewUser::new("open-1")).await.unwrap_err();
    assert!(err.to_string().contains("duplicate key"));
}

#[tokio::test]
async fn test_get_user_by_open_id() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("openId", "eq.open-1"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 7,
            "openId": "open-1",
            "name": "Sam",
            "email": null,
            "loginMethod": "google",
            "role": "user",
            "createdAt": "2026-01-01T00:00:00.000Z",
            "updatedAt": "2026-01-02T00:00:00.000Z",
            "lastSignedIn": "2026-01-02T00:00:00.000Z"
        }])))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    let user = db.get_user_by_open_id("open-1").await.unwrap().unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.name.as_deref(), Some("Sam"));
    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn test_get_user_degrades_to_none_on_failure() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    assert!(db.get_user_by_open_id("open-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_user_absent_row() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    assert!(db.get_user_by_open_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_quote_inserts_row() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/quotes"))
        .and(body_partial_json(serde_json::json!({
            "user_id": "u-1",
            "text": "Stay hungry, stay foolish.",
            "author": "Stewart Brand"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    db.save_quote("u-1", &Quote::new("Stay hungry, stay foolish.", "Stewart Brand", 1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_quote_history_is_ordered_and_limited() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/quotes"))
        .and(query_param("user_id", "eq.u-1"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": "q-2",
                "user_id": "u-1",
                "text": "newer",
                "author": "a",
                "is_favorite": true,
                "created_at": "2026-01-02T00:00:00.000Z"
            },
            {
                "id": "q-1",
                "user_id": "u-1",
                "text": "older",
                "author": "a",
                "is_favorite": false,
                "created_at": "2026-01-01T00:00:00.000Z"
            }
        ])))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    let history = db.get_quote_history("u-1", 50).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "newer");
    assert!(history[0].is_favorite);
}

#[tokio::test]
async fn test_quote_history_degrades_to_empty_on_failure() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/quotes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    assert!(db.get_quote_history("u-1", 50).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_quote_favorite_patches_one_row() {
    let mock = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/quotes"))
        .and(query_param("id", "eq.q-1"))
        .and(body_partial_json(serde_json::json!({"is_favorite": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    db.set_quote_favorite("q-1", true).await.unwrap();
}

#[tokio::test]
async fn test_get_user_settings_row() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_settings"))
        .and(query_param("user_id", "eq.u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "s-1",
            "user_id": "u-1",
            "notification_frequency": "custom",
            "custom_times": ["09:00", "18:30"],
            "calendar_integration_enabled": true,
            "google_calendar_connected": true,
            "apple_calendar_connected": false,
            "notifications_enabled": true,
            "created_at": "2026-01-01T00:00:00.000Z",
            "updated_at": "2026-01-02T00:00:00.000Z"
        }])))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    let record = db.get_user_settings("u-1").await.unwrap().unwrap();

    assert_eq!(record.notification_frequency, NotificationFrequency::Custom);
    assert_eq!(record.custom_times, vec!["09:00", "18:30"]);
    assert!(record.google_calendar_connected);
}

#[tokio::test]
async fn test_get_user_settings_absent_row() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock)
        .await;

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    assert!(db.get_user_settings("u-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_user_settings_merges_on_user_id() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/user_settings"))
        .and(query_param("on_conflict", "user_id"))
        .and(header("Prefer", "resolution=merge-duplicates"))
        .and(body_partial_json(serde_json::json!({
            "user_id": "u-1",
            "notification_frequency": "twice_daily",
            "custom_times": ["12:00", "18:00"],
            "notifications_enabled": true
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    let mut settings = Settings::default();
    settings.change_frequency(NotificationFrequency::TwiceDaily);

    let db = SupabaseDb::new(&mock.uri(), "service-key", "");
    db.upsert_user_settings("u-1", &settings).await.unwrap();
}

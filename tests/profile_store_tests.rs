// Profile store client tests against a mocked REST backend

use std::time::Duration;

use medmatch_groups::services::{ProfileStoreClient, ProfileStoreError, StoreTables};
use mockito::{Matcher, Server};
use serde_json::json;

const PROFILES_PATH: &str = "/rest/v1/profiles";

fn client(url: String) -> ProfileStoreClient {
    ProfileStoreClient::new(url, "test-key".to_string(), StoreTables::default(), Duration::from_secs(5))
        .unwrap()
}

#[tokio::test]
async fn test_get_profile_parses_nested_rows() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "eq.u1".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .match_header("apikey", "test-key")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": "u1",
                "first_name": "Sara",
                "last_name": "Al-Harbi",
                "specialty": "Cardiology",
                "city": "Riyadh",
                "region": "Riyadh Province",
                "country": "Saudi Arabia",
                "age": 34,
                "experience_years": 7,
                "interests": [
                    { "type": "sport", "value": "padel" },
                    { "kind": "food", "value": "coffee" }
                ],
                "preferences": { "preferred_group_size": 4, "min_compatibility": 60 }
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let profile = client(server.url()).get_profile("u1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(profile.id, "u1");
    assert_eq!(profile.state.as_deref(), Some("Riyadh Province"));
    assert_eq!(profile.years_experience, Some(7));
    assert_eq!(profile.interests.len(), 2);
    assert_eq!(profile.interests[0].kind, "sport");

    let prefs = profile.preferences.unwrap();
    assert_eq!(prefs.preferred_group_size, Some(4));
    assert_eq!(prefs.min_compatibility, Some(60));
}

#[tokio::test]
async fn test_get_profile_empty_result_is_not_found() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let err = client(server.url()).get_profile("ghost").await.unwrap_err();

    assert!(matches!(err, ProfileStoreError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_rejected_key_is_unauthorized() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"Invalid API key"}"#)
        .create_async()
        .await;

    let err = client(server.url()).get_profile("u1").await.unwrap_err();

    assert!(matches!(err, ProfileStoreError::Unauthorized), "got {:?}", err);
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = client(server.url()).query_candidates("u1", 10).await.unwrap_err();

    assert!(matches!(err, ProfileStoreError::ApiError(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_query_candidates_applies_eligibility_filters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("is_verified".into(), "eq.true".into()),
            Matcher::UrlEncoded("is_banned".into(), "eq.false".into()),
            Matcher::UrlEncoded("onboarding_completed".into(), "eq.true".into()),
            Matcher::UrlEncoded("id".into(), "neq.u1".into()),
            Matcher::UrlEncoded("order".into(), "id.asc".into()),
            Matcher::UrlEncoded("limit".into(), "200".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "id": "a", "first_name": "Ali", "specialty": "Cardiology" },
                { "first_name": "No id" },
                { "id": "b", "first_name": "Lina", "age": 41 }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let candidates = client(server.url()).query_candidates("u1", 200).await.unwrap();

    mock.assert_async().await;
    // The row without an id is skipped
    let ids: Vec<&str> = candidates.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_one_to_many_preferences_embed() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::UrlEncoded("id".into(), "eq.u1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": "u1",
                "preferences": [
                    { "preferred_group_size": 2, "min_compatibility": 70 },
                    { "preferred_group_size": 4, "min_compatibility": 40 }
                ]
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let profile = client(server.url()).get_profile("u1").await.unwrap();

    let prefs = profile.preferences.unwrap();
    assert_eq!(prefs.preferred_group_size, Some(2));
    assert_eq!(prefs.min_compatibility, Some(70));
}

#[tokio::test]
async fn test_bad_numeric_field_keeps_candidate() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", PROFILES_PATH)
        .match_query(Matcher::UrlEncoded("id".into(), "neq.u1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "id": "a", "age": -1, "years_experience": 4 },
                { "id": "b", "age": 512 }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let candidates = client(server.url()).query_candidates("u1", 10).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].age, None);
    assert_eq!(candidates[0].years_experience, Some(4));
    assert_eq!(candidates[1].age, None);
}

#[tokio::test]
async fn test_unreachable_store_is_connection_failure() {
    // Nothing listens on port 9 locally
    let store = client("http://127.0.0.1:9".to_string());

    let err = store.get_profile("u1").await.unwrap_err();

    assert!(matches!(err, ProfileStoreError::ConnectionFailed(_)), "got {:?}", err);
    assert!(!store.health_check().await);
}

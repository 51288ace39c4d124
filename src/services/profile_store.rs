use crate::models::Profile;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the profile store
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProfileStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ProfileStoreError::ConnectionFailed(err.to_string())
        } else {
            ProfileStoreError::RequestError(err)
        }
    }
}

/// Table names in the hosted store
#[derive(Debug, Clone)]
pub struct StoreTables {
    pub profiles: String,
    pub interests: String,
    pub preferences: String,
}

impl Default for StoreTables {
    fn default() -> Self {
        Self {
            profiles: "profiles".to_string(),
            interests: "profile_interests".to_string(),
            preferences: "matching_preferences".to_string(),
        }
    }
}

/// Profile store API client
///
/// Reads profiles from the hosted relational backend through its REST
/// interface:
/// - Fetching the requester with nested interests and preferences
/// - Querying the eligible candidate pool
pub struct ProfileStoreClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: StoreTables,
}

impl ProfileStoreClient {
    /// Create a new profile store client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: StoreTables,
        timeout: Duration,
    ) -> Result<Self, ProfileStoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    /// Embedded select: all profile columns plus interests and preferences
    fn select_clause(&self) -> String {
        format!(
            "*,interests:{}(kind,value),preferences:{}(preferred_group_size,min_compatibility)",
            self.tables.interests, self.tables.preferences
        )
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.tables.profiles
        )
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Value>, ProfileStoreError> {
        let url = format!("{}?{}", self.table_url(), query);

        tracing::debug!("Querying profile store: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProfileStoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Profile store returned {}: {}", status, body);
            return Err(ProfileStoreError::ApiError(format!(
                "Profile store returned {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(ProfileStoreError::InvalidResponse("Expected a JSON array of rows".into())),
        }
    }

    /// Get a single profile, with interests and preferences, by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, ProfileStoreError> {
        let query = format!(
            "select={}&id=eq.{}&limit=1",
            urlencoding::encode(&self.select_clause()),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let row = self
            .fetch_rows(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProfileStoreError::NotFound(format!("Profile not found for user {}", user_id)))?;

        serde_json::from_value(row)
            .map_err(|e| ProfileStoreError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    /// Query the candidate pool for a user
    ///
    /// Only verified, non-banned profiles that completed onboarding are
    /// returned, never the requester, ordered by id and capped at `limit`.
    pub async fn query_candidates(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        let query = [
            format!("select={}", urlencoding::encode(&self.select_clause())),
            "is_verified=eq.true".to_string(),
            "is_banned=eq.false".to_string(),
            "onboarding_completed=eq.true".to_string(),
            format!("id=neq.{}", urlencoding::encode(user_id)),
            "order=id.asc".to_string(),
            format!("limit={}", limit),
        ]
        .join("&");

        let rows = self.fetch_rows(&query).await?;
        let total = rows.len();

        let profiles: Vec<Profile> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Profile>(row) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping malformed candidate row: {}", e);
                    None
                }
            })
            .filter(|p| p.id != user_id)
            .take(limit)
            .collect();

        tracing::debug!("Queried {} candidates ({} rows)", profiles.len(), total);

        Ok(profiles)
    }

    /// Cheap reachability probe used by the health endpoint
    pub async fn health_check(&self) -> bool {
        self.fetch_rows("select=id&limit=1").await.is_ok()
    }
}

use serde::{Deserialize, Serialize};
use crate::services::CacheStats;
use crate::models::domain::{CareerStage, GroupMatch, ScoreBreakdown};

/// Envelope wrapping every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// Error details inside a failed envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Response for the find groups endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindGroupsResponse {
    pub groups: Vec<GroupMatch>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
    pub group_size: u8,
    pub min_compatibility: u8,
    pub week_start: chrono::NaiveDate,
    #[serde(default)]
    pub cached: bool,
}

/// Stored suggestions for a week
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestGroupsResponse {
    pub user_id: String,
    pub week_start: chrono::NaiveDate,
    pub groups: Vec<GroupMatch>,
}

/// Pairwise compatibility with per-dimension points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResponse {
    pub user_id: String,
    pub target_user_id: String,
    pub user_stage: CareerStage,
    pub target_stage: CareerStage,
    pub breakdown: ScoreBreakdown,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub persistence: bool,
    pub cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

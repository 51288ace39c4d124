use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to assemble groups for a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindGroupsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 2, max = 4))]
    #[serde(default, alias = "group_size", rename = "groupSize")]
    pub group_size: Option<u8>,
    #[validate(range(max = 100))]
    #[serde(default, alias = "min_compatibility", rename = "minCompatibility")]
    pub min_compatibility: Option<u8>,
    /// Store the result as this week's suggestions
    #[serde(default)]
    pub persist: bool,
}

/// Request to score one pair of profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Query for the latest stored suggestions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LatestGroupsQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

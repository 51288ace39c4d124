use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{career_stage, GroupAssembler};
use crate::error::AppError;
use crate::models::{
    ApiResponse, CompatibilityRequest, CompatibilityResponse, FindGroupsRequest,
    FindGroupsResponse, HealthResponse, LatestGroupsQuery, LatestGroupsResponse, MatchingPolicy,
};
use crate::services::{week_start, CacheKey, CacheManager, PostgresClient, ProfileStoreClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProfileStoreClient>,
    pub cache: Arc<CacheManager>,
    /// Suggestion persistence; `None` when no database is configured
    pub postgres: Option<Arc<PostgresClient>>,
    pub assembler: GroupAssembler,
    pub matching: MatchingSettings,
}

/// Configure all group-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/groups/find", web::post().to(find_groups))
        .route("/groups/latest", web::get().to(latest_groups))
        .route("/compatibility", web::post().to(compatibility));
}

fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|errors| AppError::Validation(errors.to_string()))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_healthy = state.store.health_check().await;
    let db_healthy = match &state.postgres {
        Some(pg) => pg.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if store_healthy && db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        persistence: state.postgres.is_some(),
        cache: state.cache.stats(),
        timestamp: chrono::Utc::now(),
    }))
}

/// Find groups endpoint
///
/// POST /api/v1/groups/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "groupSize": 3,
///   "minCompatibility": 50,
///   "persist": false
/// }
/// ```
async fn find_groups(
    state: web::Data<AppState>,
    req: web::Json<FindGroupsRequest>,
) -> Result<HttpResponse, AppError> {
    validate(&*req)?;

    let user_id = &req.user_id;
    let week = week_start(chrono::Utc::now().date_naive());

    let requester = state.store.get_profile(user_id).await?;

    let policy = MatchingPolicy::resolve(
        req.group_size,
        req.min_compatibility,
        requester.preferences.as_ref(),
        state.matching.default_policy(),
        state.matching.max_group_size,
    );

    tracing::info!(
        "Finding groups for user: {}, group size: {}, min compatibility: {}",
        user_id,
        policy.group_size,
        policy.min_compatibility
    );

    let cache_key = CacheKey::groups(user_id, policy.group_size, policy.min_compatibility, week);

    let cached = match state.cache.get::<FindGroupsResponse>(&cache_key).await {
        Ok(hit) => hit,
        Err(e) => {
            tracing::warn!("Cache read failed for {}: {}", cache_key, e);
            None
        }
    };

    let response = match cached {
        Some(hit) => FindGroupsResponse { cached: true, ..hit },
        None => {
            let candidates = state
                .store
                .query_candidates(user_id, state.matching.candidate_limit)
                .await?;

            tracing::debug!("Found {} candidates for {}", candidates.len(), user_id);

            let result = state.assembler.assemble(&requester, &candidates, &policy);

            let response = FindGroupsResponse {
                groups: result.groups,
                total_candidates: result.total_candidates,
                eligible_candidates: result.eligible_candidates,
                group_size: policy.group_size,
                min_compatibility: policy.min_compatibility,
                week_start: week,
                cached: false,
            };

            if let Err(e) = state.cache.set(&cache_key, &response).await {
                tracing::warn!("Failed to cache groups for {}: {}", user_id, e);
            }

            response
        }
    };

    if req.persist {
        match &state.postgres {
            Some(pg) => {
                if let Err(e) = pg.save_suggestions(user_id, week, &response.groups).await {
                    tracing::error!("Failed to store suggestions for {}: {}", user_id, e);
                }
            }
            None => tracing::warn!("Persist requested for {} but no database is configured", user_id),
        }
    }

    tracing::info!(
        "Returning {} groups for user {} ({} of {} candidates eligible)",
        response.groups.len(),
        user_id,
        response.eligible_candidates,
        response.total_candidates
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// Latest stored suggestions
///
/// GET /api/v1/groups/latest?userId={userId}
async fn latest_groups(
    state: web::Data<AppState>,
    query: web::Query<LatestGroupsQuery>,
) -> Result<HttpResponse, AppError> {
    validate(&*query)?;

    let pg = state.postgres.as_ref().ok_or(AppError::PersistenceDisabled)?;

    let (week, suggestions) = pg
        .latest_suggestions(&query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No stored groups for user {}", query.user_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(LatestGroupsResponse {
        user_id: query.user_id.clone(),
        week_start: week,
        groups: suggestions.into_iter().map(|s| s.group).collect(),
    })))
}

/// Pairwise compatibility endpoint
///
/// POST /api/v1/compatibility
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string"
/// }
/// ```
async fn compatibility(
    state: web::Data<AppState>,
    req: web::Json<CompatibilityRequest>,
) -> Result<HttpResponse, AppError> {
    validate(&*req)?;

    let (user, target) = tokio::try_join!(
        state.store.get_profile(&req.user_id),
        state.store.get_profile(&req.target_user_id),
    )?;

    let breakdown = state.assembler.breakdown(&user, &target);

    tracing::debug!(
        "Compatibility {} -> {}: {}",
        req.user_id,
        req.target_user_id,
        breakdown.score
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CompatibilityResponse {
        user_id: user.id.clone(),
        target_user_id: target.id.clone(),
        user_stage: career_stage(&user),
        target_stage: career_stage(&target),
        breakdown,
    })))
}

use crate::models::GroupMatch;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// One stored group suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSuggestion {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub week_start: NaiveDate,
    pub rank: i32,
    pub group: GroupMatch,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - chrono::Days::new(offset)
}

/// PostgreSQL client for weekly group suggestions
///
/// Each user has at most one suggestion set per week; saving a week again
/// replaces the previous set.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Replace a user's suggestions for one week, keeping rank order
    pub async fn save_suggestions(
        &self,
        user_id: &str,
        week_start: NaiveDate,
        groups: &[GroupMatch],
    ) -> Result<(), PostgresError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM group_suggestions WHERE user_id = $1 AND week_start = $2")
            .bind(user_id)
            .bind(week_start)
            .execute(&mut *tx)
            .await?;

        let insert = r#"
            INSERT INTO group_suggestions (id, user_id, week_start, rank, payload, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
        "#;

        for (rank, group) in groups.iter().enumerate() {
            sqlx::query(insert)
                .bind(uuid::Uuid::new_v4())
                .bind(user_id)
                .bind(week_start)
                .bind(rank as i32)
                .bind(Json(group))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Stored {} group suggestions for {} (week of {})",
            groups.len(),
            user_id,
            week_start
        );

        Ok(())
    }

    /// Suggestions of the most recent stored week, in rank order
    pub async fn latest_suggestions(
        &self,
        user_id: &str,
    ) -> Result<Option<(NaiveDate, Vec<GroupSuggestion>)>, PostgresError> {
        let query = r#"
            SELECT id, user_id, week_start, rank, payload, created_at
            FROM group_suggestions
            WHERE user_id = $1
              AND week_start = (SELECT MAX(week_start) FROM group_suggestions WHERE user_id = $1)
            ORDER BY rank ASC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let suggestions = rows
            .iter()
            .map(|row| {
                let Json(group): Json<GroupMatch> = row.try_get("payload")?;
                Ok(GroupSuggestion {
                    id: row.try_get("id")?,
                    user_id: row.try_get("user_id")?,
                    week_start: row.try_get("week_start")?,
                    rank: row.try_get("rank")?,
                    group,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let week = suggestions.first().map(|first| first.week_start);
        Ok(week.map(|week| (week, suggestions)))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

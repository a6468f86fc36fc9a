//! Postgres repository implementation using Diesel.
//!
//! Stores subject exam settings in the `subject_exam_settings` table created
//! by the embedded migrations.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task;
use tracing::warn;

use crate::db::models::{NewSubjectExamSetting, ScheduleChange, SettingId, SubjectExamSetting};
use crate::db::repository::{
    ErrorContext, ExamScheduleRepository, RepositoryError, RepositoryResult,
    SubjectSettingsRepository,
};
use crate::models::SubjectCode;

mod models;
mod schema;

use models::*;
use schema::subject_exam_settings;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    /// - `PG_MAX_RETRIES`: Maximum retry attempts (default: 3)
    /// - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run `f` on a pooled connection in a blocking task.
    ///
    /// Retryable failures (connection errors, timeouts, serialization
    /// failures) are retried up to `max_retries` times with exponential
    /// backoff. Transactions inside `f` are re-run from the start.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    warn!(attempt, delay_ms = retry_delay.as_millis() as u64, "Retrying Postgres operation");
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn rows_to_settings(rows: Vec<SubjectExamSettingRow>) -> Vec<SubjectExamSetting> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            let code = row.subject_code.clone();
            let setting = row.into_setting();
            if setting.is_none() {
                warn!(id, subject_code = %code, "Skipping stored row with unknown subject code");
            }
            setting
        })
        .collect()
}

/// Update every row of `change.subject_code`, returning the row count.
fn update_code(
    conn: &mut PgConnection,
    change: &ScheduleChange,
    updated_at: DateTime<Utc>,
) -> RepositoryResult<usize> {
    diesel::update(
        subject_exam_settings::table
            .filter(subject_exam_settings::subject_code.eq(change.subject_code.as_str())),
    )
    .set(ScheduleChangeset::from_change(change, updated_at))
    .execute(conn)
    .map_err(map_diesel_error)
}

#[async_trait]
impl SubjectSettingsRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn fetch_representative_settings(&self) -> RepositoryResult<Vec<SubjectExamSetting>> {
        let (rows, latest) = self
            .with_conn(|conn| {
                let rows = subject_exam_settings::table
                    .distinct_on(subject_exam_settings::subject_code)
                    .order_by((
                        subject_exam_settings::subject_code,
                        subject_exam_settings::id,
                    ))
                    .select(SubjectExamSettingRow::as_select())
                    .load::<SubjectExamSettingRow>(conn)
                    .map_err(map_diesel_error)?;

                let latest = subject_exam_settings::table
                    .group_by(subject_exam_settings::subject_code)
                    .select((
                        subject_exam_settings::subject_code,
                        max(subject_exam_settings::updated_at),
                    ))
                    .load::<(String, Option<DateTime<Utc>>)>(conn)
                    .map_err(map_diesel_error)?;

                Ok((rows, latest))
            })
            .await
            .map_err(|e| e.with_operation("fetch_representative_settings"))?;

        let latest: HashMap<String, DateTime<Utc>> = latest
            .into_iter()
            .filter_map(|(code, at)| at.map(|at| (code, at)))
            .collect();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if let Some(at) = latest.get(&row.subject_code) {
                    row.updated_at = *at;
                }
                row
            })
            .collect();

        Ok(rows_to_settings(rows))
    }

    async fn fetch_settings_for_code(
        &self,
        code: SubjectCode,
    ) -> RepositoryResult<Vec<SubjectExamSetting>> {
        let rows = self
            .with_conn(move |conn| {
                subject_exam_settings::table
                    .filter(subject_exam_settings::subject_code.eq(code.as_str()))
                    .order(subject_exam_settings::id)
                    .select(SubjectExamSettingRow::as_select())
                    .load::<SubjectExamSettingRow>(conn)
                    .map_err(map_diesel_error)
            })
            .await
            .map_err(|e| e.with_operation("fetch_settings_for_code"))?;

        Ok(rows_to_settings(rows))
    }

    async fn insert_setting(&self, setting: NewSubjectExamSetting) -> RepositoryResult<SettingId> {
        let row = NewSubjectExamSettingRow::from(setting);
        self.with_conn(move |conn| {
            diesel::insert_into(subject_exam_settings::table)
                .values(&row)
                .returning(subject_exam_settings::id)
                .get_result::<i64>(conn)
                .map(SettingId)
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl ExamScheduleRepository for PostgresRepository {
    async fn apply_schedule_changes(&self, changes: &[ScheduleChange]) -> RepositoryResult<usize> {
        let changes = changes.to_vec();
        self.with_conn(move |conn| {
            conn.transaction::<usize, RepositoryError, _>(|tx| {
                let updated_at = Utc::now();
                let mut total = 0;

                for change in &changes {
                    if change.due_time <= change.starting_time {
                        return Err(RepositoryError::validation_with_context(
                            change.due_before_start_message(),
                            ErrorContext::new("apply_schedule_changes")
                                .with_entity("subject_exam_setting")
                                .with_entity_id(change.subject_code),
                        ));
                    }

                    if let Some(token) = change.if_unmodified_since {
                        let newer: i64 = subject_exam_settings::table
                            .filter(
                                subject_exam_settings::subject_code
                                    .eq(change.subject_code.as_str()),
                            )
                            .filter(subject_exam_settings::updated_at.gt(token))
                            .count()
                            .get_result(tx)
                            .map_err(map_diesel_error)?;
                        if newer > 0 {
                            return Err(RepositoryError::conflict_with_context(
                                change.conflict_message(),
                                ErrorContext::new("apply_schedule_changes")
                                    .with_entity("subject_exam_setting")
                                    .with_entity_id(change.subject_code)
                                    .with_details(format!("newer_rows={}", newer)),
                            ));
                        }
                    }

                    total += update_code(tx, change, updated_at)?;
                }

                Ok(total)
            })
        })
        .await
    }

    async fn update_schedule_for_code(&self, change: &ScheduleChange) -> RepositoryResult<usize> {
        let change = change.clone();
        self.with_conn(move |conn| update_code(conn, &change, Utc::now()))
            .await
            .map_err(|e| e.with_operation("update_schedule_for_code"))
    }
}

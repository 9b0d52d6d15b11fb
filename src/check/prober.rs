use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use crate::error::ProbeError;
use crate::util::env as env_util;

/// Thin read-only query layer the checks are written against.
///
/// One attempt per call; nothing here retries.
#[async_trait]
pub trait SchemaProber: Send + Sync {
    /// Open (or re-verify) the connection. Never errors: any failure is `false`.
    async fn connect(&mut self) -> bool;

    async fn table_exists(&self, name: &str) -> Result<bool, ProbeError>;

    async fn index_exists(&self, name: &str) -> Result<bool, ProbeError>;

    /// Single row, single text column. SQL NULL comes back as `None`.
    async fn scalar_text(&self, sql: &str) -> Result<Option<String>, ProbeError>;

    /// Single row, single bigint column (e.g. `count(*)`).
    async fn scalar_count(&self, sql: &str) -> Result<i64, ProbeError>;

    /// Zero or more rows of a single text column.
    async fn column(&self, sql: &str) -> Result<Vec<String>, ProbeError>;
}

/// Postgres-backed prober holding a single connection for the process lifetime.
pub struct PgProber {
    dsn: String,
    pool: Option<PgPool>,
}

impl PgProber {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            pool: None,
        }
    }

    fn pool(&self) -> Result<&PgPool, ProbeError> {
        self.pool.as_ref().ok_or(ProbeError::NotConnected)
    }

    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    async fn open(&self) -> Result<PgPool, ProbeError> {
        let url = env_util::normalize_dsn(&self.dsn)?;
        // PgBouncer txn mode safe
        let connect_opts = PgConnectOptions::from_str(&url)?.statement_cache_capacity(0);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    if let Err(e) = sqlx::query("SET application_name = 'check_database'")
                        .persistent(false)
                        .execute(conn)
                        .await
                    {
                        debug!(error = %e, "could not set application_name");
                    }
                    Ok(())
                })
            })
            .connect_with(connect_opts)
            .await?;

        sqlx::query("SELECT 1").persistent(false).execute(&pool).await?;
        Ok(pool)
    }
}

#[async_trait]
impl SchemaProber for PgProber {
    #[instrument(skip(self))]
    async fn connect(&mut self) -> bool {
        if let Some(pool) = &self.pool {
            return sqlx::query("SELECT 1")
                .persistent(false)
                .execute(pool)
                .await
                .is_ok();
        }
        match self.open().await {
            Ok(pool) => {
                debug!(dsn = %env_util::redact_dsn(&self.dsn), "connected to db");
                self.pool = Some(pool);
                true
            }
            Err(e) => {
                warn!(dsn = %env_util::redact_dsn(&self.dsn), error = %e, "database connection failed");
                false
            }
        }
    }

    async fn table_exists(&self, name: &str) -> Result<bool, ProbeError> {
        let n: i64 = sqlx::query_scalar("SELECT count(*) FROM pg_tables WHERE tablename = $1")
            .bind(name)
            .persistent(false)
            .fetch_one(self.pool()?)
            .await?;
        debug!(table = name, exists = n > 0, "table probe");
        Ok(n > 0)
    }

    async fn index_exists(&self, name: &str) -> Result<bool, ProbeError> {
        let n: i64 = sqlx::query_scalar("SELECT count(*) FROM pg_indexes WHERE indexname = $1")
            .bind(name)
            .persistent(false)
            .fetch_one(self.pool()?)
            .await?;
        debug!(index = name, exists = n > 0, "index probe");
        Ok(n > 0)
    }

    async fn scalar_text(&self, sql: &str) -> Result<Option<String>, ProbeError> {
        debug!(sql, "scalar query");
        let v: Option<String> = sqlx::query_scalar(sql)
            .persistent(false)
            .fetch_one(self.pool()?)
            .await?;
        Ok(v)
    }

    async fn scalar_count(&self, sql: &str) -> Result<i64, ProbeError> {
        debug!(sql, "count query");
        let v: i64 = sqlx::query_scalar(sql)
            .persistent(false)
            .fetch_one(self.pool()?)
            .await?;
        Ok(v)
    }

    async fn column(&self, sql: &str) -> Result<Vec<String>, ProbeError> {
        debug!(sql, "column query");
        let rows: Vec<String> = sqlx::query_scalar(sql)
            .persistent(false)
            .fetch_all(self.pool()?)
            .await?;
        Ok(rows)
    }
}

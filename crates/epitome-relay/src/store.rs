//! Postgres-backed job log.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

use crate::error::{RelayError, Result};

const CREATE_JOBS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS jobs (
        id SERIAL PRIMARY KEY,
        prompt TEXT NOT NULL,
        task TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
";

/// A recorded submission.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Job {
    /// Row id.
    pub id: i32,
    /// Submitted prompt.
    pub prompt: String,
    /// Submitted task name.
    pub task: String,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

/// Connection-pooled access to the jobs table.
pub struct JobStore {
    pool: Pool,
}

impl JobStore {
    /// Builds a connection pool for the given database URL.
    pub fn connect(database_url: &str) -> Result<Self> {
        let pg_config = tokio_postgres::Config::from_str(database_url)
            .map_err(|e| RelayError::Config(format!("invalid database URL: {e}")))?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(16)
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build pool: {e}")))?;

        Ok(Self { pool })
    }

    /// Creates the jobs table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client.execute(CREATE_JOBS_TABLE, &[]).await?;
        Ok(())
    }

    /// Records a submission, returning its row id.
    pub async fn insert(&self, prompt: &str, task: &str) -> Result<i32> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO jobs (prompt, task) VALUES ($1, $2) RETURNING id",
                &[&prompt, &task],
            )
            .await?;
        Ok(row.get(0))
    }

    /// Returns the most recent submissions, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Job>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, prompt, task, created_at FROM jobs ORDER BY id DESC LIMIT $1",
                &[&limit],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Job {
                id: row.get(0),
                prompt: row.get(1),
                task: row.get(2),
                created_at: row.get(3),
            })
            .collect())
    }
}

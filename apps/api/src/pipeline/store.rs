use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::resume::{NewResume, ResumeDetail, ResumeRow, ResumeSummary};

const MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Durable home of processed résumés. Rows are appended once and never mutated.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Idempotently creates the backing table.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Appends one row and returns its storage-assigned id.
    async fn append_record(&self, record: NewResume) -> Result<i32, StoreError>;

    /// Newest upload first.
    async fn list_summaries(&self) -> Result<Vec<ResumeSummary>, StoreError>;

    async fn get_detail(&self, id: i32) -> Result<Option<ResumeDetail>, StoreError>;
}

/// PostgreSQL-backed store over the `resumes_v2` table.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    /// Opens the connection pool. Fails startup if the database is unreachable.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes_v2 (
                id SERIAL PRIMARY KEY,
                filename TEXT NOT NULL,
                uploaded_at TIMESTAMPTZ NOT NULL,
                name TEXT,
                email TEXT,
                phone TEXT,
                extracted_data JSONB,
                llm_analysis JSONB
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Table resumes_v2 is ready");
        Ok(())
    }

    async fn append_record(&self, record: NewResume) -> Result<i32, StoreError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO resumes_v2
                (filename, uploaded_at, name, email, phone, extracted_data, llm_analysis)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&record.filename)
        .bind(record.uploaded_at)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.extracted_data)
        .bind(&record.llm_analysis)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!("Insert into resumes_v2 failed: {e}");
            StoreError::from(e)
        })?;

        Ok(id)
    }

    async fn list_summaries(&self) -> Result<Vec<ResumeSummary>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeSummary>(
            "SELECT id, filename, name, email, phone FROM resumes_v2 ORDER BY uploaded_at DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_detail(&self, id: i32) -> Result<Option<ResumeDetail>, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, filename, uploaded_at, name, email, phone, extracted_data, llm_analysis
            FROM resumes_v2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ResumeDetail::from))
    }
}

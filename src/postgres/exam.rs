//! `PostgreSQL` implementation of [`ExamSessionRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::map_db_error;
use crate::error::AdminError;
use crate::repository::{CreateExamSession, ExamSession, ExamSessionRepository};

const COLUMNS: &str = "id, level, exam_date, capacity, available_slots, created_at, updated_at";

/// PostgreSQL-backed exam session repository.
#[derive(Clone)]
pub struct PostgresExamSessionRepository {
    pool: PgPool,
}

impl PostgresExamSessionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ExamSessionRecord {
    id: i64,
    level: String,
    exam_date: DateTime<Utc>,
    capacity: i32,
    available_slots: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ExamSessionRecord> for ExamSession {
    fn from(row: ExamSessionRecord) -> Self {
        ExamSession {
            id: row.id,
            level: row.level,
            exam_date: row.exam_date,
            capacity: row.capacity,
            available_slots: row.available_slots,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ExamSessionRepository for PostgresExamSessionRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateExamSession) -> Result<ExamSession, AdminError> {
        let row: ExamSessionRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO exam_sessions (level, exam_date, capacity, available_slots)
            VALUES ($1, $2, $3, $3)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&data.level)
        .bind(data.exam_date)
        .bind(data.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("create_exam_session", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<ExamSession>, AdminError> {
        let row: Option<ExamSessionRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM exam_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("find_exam_session_by_id", e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn reserve_slot(&self, id: i64) -> Result<bool, AdminError> {
        // conditional decrement with a floor of zero; a read-then-write
        // here would oversell the session under concurrent registrations
        let result = sqlx::query(
            r"
            UPDATE exam_sessions
            SET available_slots = available_slots - 1, updated_at = NOW()
            WHERE id = $1 AND available_slots > 0
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("reserve_exam_slot", e))?;

        Ok(result.rows_affected() == 1)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn release_slot(&self, id: i64) -> Result<(), AdminError> {
        sqlx::query(
            r"
            UPDATE exam_sessions
            SET available_slots = available_slots + 1, updated_at = NOW()
            WHERE id = $1 AND available_slots < capacity
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("release_exam_slot", e))?;

        Ok(())
    }
}

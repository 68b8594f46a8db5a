//! `PostgreSQL` implementation of [`AuditLogRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::map_db_error;
use crate::error::AdminError;
use crate::repository::{
    AuditAction, AuditLogEntry, AuditLogRepository, AuditTable, NewAuditEntry, Page,
};

const COLUMNS: &str = "id, table_name, action, record_id, user_id, changes, created_at";

/// PostgreSQL-backed audit log. Insert-only; no update or delete path
/// exists on this type.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AuditLogRecord {
    id: i64,
    table_name: String,
    action: String,
    record_id: String,
    user_id: String,
    changes: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRecord> for AuditLogEntry {
    type Error = AdminError;

    fn try_from(row: AuditLogRecord) -> Result<Self, AdminError> {
        let table_name = AuditTable::from_str(&row.table_name).ok_or_else(|| {
            AdminError::DatabaseError(format!("unknown audit table for entry {}", row.id))
        })?;
        let action = AuditAction::from_str(&row.action).ok_or_else(|| {
            AdminError::DatabaseError(format!("unknown audit action for entry {}", row.id))
        })?;

        Ok(AuditLogEntry {
            id: row.id,
            table_name,
            action,
            record_id: row.record_id,
            user_id: row.user_id,
            changes: row.changes,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, AdminError> {
        let row: AuditLogRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO audit_logs (table_name, action, record_id, user_id, changes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(entry.table_name.as_str())
        .bind(entry.action.as_str())
        .bind(&entry.record_id)
        .bind(&entry.user_id)
        .bind(&entry.changes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("record_audit_entry", e))?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list(&self, page: Page) -> Result<Vec<AuditLogEntry>, AdminError> {
        let rows: Vec<AuditLogRecord> = sqlx::query_as(&format!(
            r"
            SELECT {COLUMNS} FROM audit_logs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list_audit_entries", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

//! `PostgreSQL` implementation of [`InvitationRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{map_db_error, store_error_kind};
use crate::error::AdminError;
use crate::repository::{CreateInvitation, Invitation, InvitationRepository, Page};
use crate::roles::StaffRole;
use crate::sanitize::StoreErrorKind;

const COLUMNS: &str =
    "id, email, role, token_hash, invited_by, expires_at, accepted_at, created_at";

/// PostgreSQL-backed invitation repository.
///
/// The single-pending-invitation-per-email invariant is enforced by a
/// partial unique index on unaccepted rows; `create` clears expired
/// unaccepted rows for the email first so a stale invitation never
/// blocks a fresh one.
#[derive(Clone)]
pub struct PostgresInvitationRepository {
    pool: PgPool,
}

impl PostgresInvitationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InvitationRecord {
    id: i64,
    email: String,
    role: String,
    token_hash: String,
    invited_by: String,
    expires_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvitationRecord> for Invitation {
    type Error = AdminError;

    fn try_from(row: InvitationRecord) -> Result<Self, AdminError> {
        let role = StaffRole::from_str(&row.role).ok_or_else(|| {
            AdminError::DatabaseError(format!("unknown role for invitation {}", row.id))
        })?;

        Ok(Invitation {
            id: row.id,
            email: row.email,
            role,
            token_hash: row.token_hash,
            invited_by: row.invited_by,
            expires_at: row.expires_at,
            accepted_at: row.accepted_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateInvitation) -> Result<Invitation, AdminError> {
        // an expired unaccepted row would trip the partial unique index
        sqlx::query(
            r"
            DELETE FROM staff_invitations
            WHERE lower(email) = lower($1) AND accepted_at IS NULL AND expires_at <= NOW()
            ",
        )
        .bind(&data.email)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("clear_expired_invitations", e))?;

        let row: InvitationRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO staff_invitations (email, role, token_hash, invited_by, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&data.email)
        .bind(data.role.as_str())
        .bind(&data.token_hash)
        .bind(&data.invited_by)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if store_error_kind(&e) == StoreErrorKind::UniqueViolation {
                return AdminError::InvitationPending;
            }
            map_db_error("create_invitation", e)
        })?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Invitation>, AdminError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM staff_invitations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("find_invitation_by_id", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Invitation>, AdminError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM staff_invitations WHERE token_hash = $1"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("find_invitation_by_token_hash", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_active_by_email(&self, email: &str) -> Result<Option<Invitation>, AdminError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            r"
            SELECT {COLUMNS} FROM staff_invitations
            WHERE lower(email) = lower($1) AND accepted_at IS NULL AND expires_at > NOW()
            "
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("find_active_invitation_by_email", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn accept_pending(&self, token_hash: &str) -> Result<Option<Invitation>, AdminError> {
        // single conditional update: the row is claimed only if still
        // pending and unexpired, so concurrent acceptances cannot both win
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            r"
            UPDATE staff_invitations SET accepted_at = NOW()
            WHERE token_hash = $1 AND accepted_at IS NULL AND expires_at > NOW()
            RETURNING {COLUMNS}
            "
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("accept_invitation", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: i64) -> Result<(), AdminError> {
        let result = sqlx::query("DELETE FROM staff_invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("delete_invitation", e))?;

        if result.rows_affected() == 0 {
            return Err(AdminError::NotFound);
        }

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list(&self, page: Page) -> Result<Vec<Invitation>, AdminError> {
        let rows: Vec<InvitationRecord> = sqlx::query_as(&format!(
            r"
            SELECT {COLUMNS} FROM staff_invitations
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list_invitations", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_expired(&self) -> Result<u64, AdminError> {
        let result = sqlx::query(
            "DELETE FROM staff_invitations WHERE accepted_at IS NULL AND expires_at < NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("delete_expired_invitations", e))?;

        Ok(result.rows_affected())
    }
}

//! `PostgreSQL` implementation of [`ProfileRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{map_db_error, store_error_kind};
use crate::error::AdminError;
use crate::repository::{CreateProfile, Page, Profile, ProfileRepository, UpsertProfile};
use crate::roles::StaffRole;
use crate::sanitize::StoreErrorKind;

const COLUMNS: &str = "id, email, full_name, role, invited_by, is_active, created_at, updated_at";

/// PostgreSQL-backed profile repository.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProfileRecord {
    id: String,
    email: String,
    full_name: String,
    role: String,
    invited_by: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = AdminError;

    fn try_from(row: ProfileRecord) -> Result<Self, AdminError> {
        let role = StaffRole::from_str(&row.role).ok_or_else(|| {
            AdminError::DatabaseError(format!("unknown role for profile {}", row.id))
        })?;

        Ok(Profile {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role,
            invited_by: row.invited_by,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateProfile) -> Result<Profile, AdminError> {
        let row: ProfileRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO profiles (id, email, full_name, role, invited_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&data.id)
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(data.role.as_str())
        .bind(&data.invited_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if store_error_kind(&e) == StoreErrorKind::UniqueViolation {
                return AdminError::EmailTaken;
            }
            map_db_error("create_profile", e)
        })?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AdminError> {
        let row: Option<ProfileRecord> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM profiles WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_db_error("find_profile_by_id", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AdminError> {
        let row: Option<ProfileRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("find_profile_by_email", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn upsert_self(&self, data: UpsertProfile) -> Result<Profile, AdminError> {
        // new rows start as officer; the conflict arm never touches role
        // or active state
        let row: ProfileRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO profiles (id, email, full_name, role)
            VALUES ($1, $2, $3, 'officer')
            ON CONFLICT (id) DO UPDATE
                SET full_name = EXCLUDED.full_name,
                    email = EXCLUDED.email,
                    updated_at = NOW()
            RETURNING {COLUMNS}
            "
        ))
        .bind(&data.id)
        .bind(&data.email)
        .bind(&data.full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("upsert_profile", e))?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update_role(&self, id: &str, role: StaffRole) -> Result<Profile, AdminError> {
        let row: ProfileRecord = sqlx::query_as(&format!(
            r"
            UPDATE profiles SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AdminError::NotFound,
            _ => map_db_error("update_profile_role", e),
        })?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Profile, AdminError> {
        let row: ProfileRecord = sqlx::query_as(&format!(
            r"
            UPDATE profiles SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AdminError::NotFound,
            _ => map_db_error("set_profile_active", e),
        })?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: &str) -> Result<(), AdminError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("delete_profile", e))?;

        if result.rows_affected() == 0 {
            return Err(AdminError::NotFound);
        }

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list(&self, page: Page) -> Result<Vec<Profile>, AdminError> {
        let rows: Vec<ProfileRecord> = sqlx::query_as(&format!(
            r"
            SELECT {COLUMNS} FROM profiles
            ORDER BY created_at ASC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list_profiles", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// A scheduled exam session with bounded capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: i64,
    /// Exam level label (e.g. "HSK 3").
    pub level: String,
    pub exam_date: DateTime<Utc>,
    pub capacity: i32,
    pub available_slots: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateExamSession {
    pub level: String,
    pub exam_date: DateTime<Utc>,
    pub capacity: i32,
}

#[async_trait]
pub trait ExamSessionRepository: Send + Sync {
    async fn create(&self, data: CreateExamSession) -> Result<ExamSession, AdminError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ExamSession>, AdminError>;

    /// Atomically reserves one slot as a conditional decrement with a
    /// floor of zero. Returns `false` when the session is full (or
    /// missing). Implementations must not read-modify-write: under
    /// concurrent registrations that pattern oversells the session.
    async fn reserve_slot(&self, id: i64) -> Result<bool, AdminError>;

    /// Returns one slot, bounded above by `capacity` (a double release
    /// never creates phantom capacity).
    async fn release_slot(&self, id: i64) -> Result<(), AdminError>;
}

#[async_trait]
impl<T: ExamSessionRepository + ?Sized> ExamSessionRepository for std::sync::Arc<T> {
    async fn create(&self, data: CreateExamSession) -> Result<ExamSession, AdminError> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ExamSession>, AdminError> {
        (**self).find_by_id(id).await
    }

    async fn reserve_slot(&self, id: i64) -> Result<bool, AdminError> {
        (**self).reserve_slot(id).await
    }

    async fn release_slot(&self, id: i64) -> Result<(), AdminError> {
        (**self).release_slot(id).await
    }
}

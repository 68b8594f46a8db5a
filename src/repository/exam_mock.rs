use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::{CreateExamSession, ExamSession, ExamSessionRepository};
use crate::error::AdminError;

/// In-memory exam session repository for tests.
///
/// Slot accounting happens under a single lock, matching the atomic
/// conditional decrement of the real backend.
#[derive(Default)]
pub struct MockExamSessionRepository {
    pub sessions: Mutex<Vec<ExamSession>>,
    next_id: Mutex<i64>,
}

impl MockExamSessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(vec![]),
            next_id: Mutex::new(1),
        }
    }
}

#[async_trait]
impl ExamSessionRepository for MockExamSessionRepository {
    async fn create(&self, data: CreateExamSession) -> Result<ExamSession, AdminError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let now = Utc::now();
        let session = ExamSession {
            id,
            level: data.level,
            exam_date: data.exam_date,
            capacity: data.capacity,
            available_slots: data.capacity,
            created_at: now,
            updated_at: now,
        };

        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(session.clone());
        drop(sessions);

        Ok(session)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ExamSession>, AdminError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn reserve_slot(&self, id: i64) -> Result<bool, AdminError> {
        let mut sessions = self.sessions.lock().unwrap();

        // conditional decrement under the lock; floor at zero
        if let Some(session) = sessions
            .iter_mut()
            .find(|s| s.id == id && s.available_slots > 0)
        {
            session.available_slots -= 1;
            session.updated_at = Utc::now();
            return Ok(true);
        }

        Ok(false)
    }

    async fn release_slot(&self, id: i64) -> Result<(), AdminError> {
        let mut sessions = self.sessions.lock().unwrap();

        if let Some(session) = sessions
            .iter_mut()
            .find(|s| s.id == id && s.available_slots < s.capacity)
        {
            session.available_slots += 1;
            session.updated_at = Utc::now();
        }

        Ok(())
    }
}

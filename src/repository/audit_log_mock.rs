use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::{AuditLogEntry, AuditLogRepository, NewAuditEntry, Page};
use crate::error::AdminError;

/// In-memory audit log for tests.
///
/// Set `fail_writes` to exercise the best-effort path: writes error but
/// the primary operation must still succeed.
#[derive(Default)]
pub struct MockAuditLogRepository {
    pub entries: Mutex<Vec<AuditLogEntry>>,
    pub fail_writes: Mutex<bool>,
    next_id: Mutex<i64>,
}

impl MockAuditLogRepository {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(vec![]),
            fail_writes: Mutex::new(false),
            next_id: Mutex::new(1),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, AdminError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AdminError::DatabaseError("audit write failed".to_owned()));
        }

        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let entry = AuditLogEntry {
            id,
            table_name: entry.table_name,
            action: entry.action,
            record_id: entry.record_id,
            user_id: entry.user_id,
            changes: entry.changes,
            created_at: Utc::now(),
        };

        let mut entries = self.entries.lock().unwrap();
        entries.push(entry.clone());
        drop(entries);

        Ok(entry)
    }

    async fn list(&self, page: Page) -> Result<Vec<AuditLogEntry>, AdminError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .rev()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }
}

//! Best-effort audit recording.
//!
//! Audit logging is observability, not a transactional guarantee: by the
//! time an entry is written the mutation it describes has already
//! succeeded, so a failed write is logged at error level and swallowed.

use crate::repository::{AuditAction, AuditLogRepository, AuditTable, NewAuditEntry};

/// Wraps an [`AuditLogRepository`] with swallow-on-failure semantics.
pub struct AuditRecorder<A>
where
    A: AuditLogRepository,
{
    repo: A,
}

impl<A: AuditLogRepository> AuditRecorder<A> {
    pub fn new(repo: A) -> Self {
        Self { repo }
    }

    /// Appends an audit entry. Never fails the caller.
    pub async fn record(
        &self,
        table_name: AuditTable,
        action: AuditAction,
        record_id: &str,
        user_id: &str,
        changes: impl Into<String>,
    ) {
        let entry = NewAuditEntry {
            table_name,
            action,
            record_id: record_id.to_owned(),
            user_id: user_id.to_owned(),
            changes: changes.into(),
        };

        if let Err(e) = self.repo.record(entry).await {
            log::error!(
                target: "atrio_admin",
                "msg=\"failed to write audit entry\", table=\"{}\", action=\"{}\", record_id=\"{record_id}\", error=\"{e}\"",
                table_name.as_str(),
                action.as_str()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockAuditLogRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_appends_entry() {
        let repo = Arc::new(MockAuditLogRepository::new());
        let recorder = AuditRecorder::new(Arc::clone(&repo));

        recorder
            .record(
                AuditTable::Invitations,
                AuditAction::Insert,
                "42",
                "subj-owner",
                "invited new@staff.org as officer",
            )
            .await;

        assert_eq!(repo.entry_count(), 1);
        let entries = repo.entries.lock().unwrap();
        assert_eq!(entries[0].record_id, "42");
        assert_eq!(entries[0].action, AuditAction::Insert);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let repo = Arc::new(MockAuditLogRepository::new());
        repo.fail_writes(true);
        let recorder = AuditRecorder::new(Arc::clone(&repo));

        // must not panic or propagate
        recorder
            .record(
                AuditTable::Profiles,
                AuditAction::Delete,
                "subj-gone",
                "subj-owner",
                "deleted profile",
            )
            .await;

        assert_eq!(repo.entry_count(), 0);
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;
use crate::error::AdminError;

/// Tables whose mutations are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditTable {
    Profiles,
    Invitations,
    Classes,
    Events,
    TeamMembers,
    ExamSessions,
    Inquiries,
}

impl AuditTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Invitations => "invitations",
            Self::Classes => "classes",
            Self::Events => "events",
            Self::TeamMembers => "team_members",
            Self::ExamSessions => "exam_sessions",
            Self::Inquiries => "inquiries",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "profiles" => Some(Self::Profiles),
            "invitations" => Some(Self::Invitations),
            "classes" => Some(Self::Classes),
            "events" => Some(Self::Events),
            "team_members" => Some(Self::TeamMembers),
            "exam_sessions" => Some(Self::ExamSessions),
            "inquiries" => Some(Self::Inquiries),
            _ => None,
        }
    }
}

/// The mutation kind being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// An append-only audit record. Never mutated or deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub table_name: AuditTable,
    pub action: AuditAction,
    pub record_id: String,
    /// Subject of the acting profile.
    pub user_id: String,
    /// Free-form description of the delta.
    pub changes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub table_name: AuditTable,
    pub action: AuditAction,
    pub record_id: String,
    pub user_id: String,
    pub changes: String,
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, AdminError>;

    /// Most recent entries first.
    async fn list(&self, page: Page) -> Result<Vec<AuditLogEntry>, AdminError>;
}

#[async_trait]
impl<T: AuditLogRepository + ?Sized> AuditLogRepository for std::sync::Arc<T> {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, AdminError> {
        (**self).record(entry).await
    }

    async fn list(&self, page: Page) -> Result<Vec<AuditLogEntry>, AdminError> {
        (**self).list(page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip() {
        for action in [AuditAction::Insert, AuditAction::Update, AuditAction::Delete] {
            assert_eq!(AuditAction::from_str(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::from_str("TRUNCATE"), None);
    }

    #[test]
    fn test_table_roundtrip() {
        for table in [
            AuditTable::Profiles,
            AuditTable::Invitations,
            AuditTable::Classes,
            AuditTable::Events,
            AuditTable::TeamMembers,
            AuditTable::ExamSessions,
            AuditTable::Inquiries,
        ] {
            assert_eq!(AuditTable::from_str(table.as_str()), Some(table));
        }
        assert_eq!(AuditTable::from_str("sessions"), None);
    }
}

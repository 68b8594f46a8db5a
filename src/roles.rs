//! Role hierarchy and the resource permission table.
//!
//! Roles form a total order (owner > admin > officer). Resources and
//! actions are closed enums, so an unknown resource/action name is a
//! compile-time error rather than a silent deny; the permission table
//! itself is a static match, immutable after startup.

use serde::{Deserialize, Serialize};

/// A staff role, ordered owner(3) > admin(2) > officer(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Owner,
    Admin,
    Officer,
}

impl StaffRole {
    /// Convert to string for storage and wire formats.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Officer => "officer",
        }
    }

    /// Parse from a stored string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "officer" => Some(Self::Officer),
            _ => None,
        }
    }

    /// Numeric rank backing the total order.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Officer => 1,
        }
    }

    /// True iff this role meets or exceeds `required`.
    pub fn has_permission(&self, required: StaffRole) -> bool {
        self.rank() >= required.rank()
    }

    /// True iff this role strictly outranks `target`.
    ///
    /// Strict: a role can never manage an equal or higher role, including
    /// itself — an owner cannot manage another owner.
    pub fn can_manage(&self, target: StaffRole) -> bool {
        self.rank() > target.rank()
    }

    /// True iff this role may create an invitation granting `target`.
    ///
    /// Owner may invite admin or officer; admin may invite officer only;
    /// officer may invite no one. The owner role is never grantable by
    /// invitation.
    pub fn can_invite(&self, target: StaffRole) -> bool {
        match target {
            StaffRole::Owner => false,
            StaffRole::Admin | StaffRole::Officer => self.can_manage(target),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protected resource of the administrative backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Classes,
    Events,
    Team,
    Users,
    Hsk,
    Inquiries,
    AuditLogs,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Events => "events",
            Self::Team => "team",
            Self::Users => "users",
            Self::Hsk => "hsk",
            Self::Inquiries => "inquiries",
            Self::AuditLogs => "audit_logs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "classes" => Some(Self::Classes),
            "events" => Some(Self::Events),
            "team" => Some(Self::Team),
            "users" => Some(Self::Users),
            "hsk" => Some(Self::Hsk),
            "inquiries" => Some(Self::Inquiries),
            "audit_logs" => Some(Self::AuditLogs),
            _ => None,
        }
    }
}

/// An action that can be performed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceAction {
    View,
    Create,
    Edit,
    Delete,
}

impl ResourceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Self::View),
            "create" => Some(Self::Create),
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

const ALL: &[StaffRole] = &[StaffRole::Owner, StaffRole::Admin, StaffRole::Officer];
const ADMIN_UP: &[StaffRole] = &[StaffRole::Owner, StaffRole::Admin];
const OWNER_ONLY: &[StaffRole] = &[StaffRole::Owner];
const NONE: &[StaffRole] = &[];

/// Roles allowed to perform `action` on `resource`.
///
/// Content resources (classes, events, team, hsk, inquiries) are editable
/// by any staff role; deletion requires admin. User management is
/// admin-and-up with owner-only deletion. Audit logs are owner-only and
/// read-only from everyone's perspective.
pub fn allowed_roles(resource: Resource, action: ResourceAction) -> &'static [StaffRole] {
    use Resource::*;
    use ResourceAction::*;

    match (resource, action) {
        (Classes | Events | Team | Hsk | Inquiries, View | Create | Edit) => ALL,
        (Classes | Events | Team | Hsk | Inquiries, Delete) => ADMIN_UP,
        (Users, View | Create | Edit) => ADMIN_UP,
        (Users, Delete) => OWNER_ONLY,
        (AuditLogs, View) => OWNER_ONLY,
        (AuditLogs, Create | Edit | Delete) => NONE,
    }
}

/// Pure membership lookup into the permission table.
pub fn has_resource_permission(role: StaffRole, resource: Resource, action: ResourceAction) -> bool {
    allowed_roles(resource, action).contains(&role)
}

//! Principal model - authenticated actors and their roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::OrgNode;

/// Role kind codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    SystemAdmin,
    EntityUser,
    Teacher,
    Student,
    Parent,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::SystemAdmin => "system_admin",
            RoleKind::EntityUser => "entity_user",
            RoleKind::Teacher => "teacher",
            RoleKind::Student => "student",
            RoleKind::Parent => "parent",
        }
    }

    /// Parse a role code. Unknown codes return None and the caller denies.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system_admin" => Some(RoleKind::SystemAdmin),
            "entity_user" => Some(RoleKind::EntityUser),
            "teacher" => Some(RoleKind::Teacher),
            "student" => Some(RoleKind::Student),
            "parent" => Some(RoleKind::Parent),
            _ => None,
        }
    }
}

/// Principal entity.
///
/// Principals are deactivated, never hard-deleted, so audit records keep a
/// resolvable actor. school_id/branch_id are the direct associations used
/// for view-own checks by teachers, students, and parents; they are not
/// administrative scope.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Principal {
    pub principal_id: Uuid,
    pub subject_id: String,
    pub role_code: String,
    pub school_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub active_flag: bool,
    pub created_utc: DateTime<Utc>,
}

impl Principal {
    /// Create a new principal with no node association.
    pub fn new(subject_id: String, role: RoleKind) -> Self {
        Self {
            principal_id: Uuid::new_v4(),
            subject_id,
            role_code: role.as_str().to_string(),
            school_id: None,
            branch_id: None,
            active_flag: true,
            created_utc: Utc::now(),
        }
    }

    /// Get role as enum. None for unrecognized codes.
    pub fn role(&self) -> Option<RoleKind> {
        RoleKind::parse(&self.role_code)
    }

    /// Check if principal is active.
    pub fn is_active(&self) -> bool {
        self.active_flag
    }

    /// Check whether a node falls under this principal's own school or
    /// branch association (the node itself or one of its descendants).
    pub fn is_associated_with(&self, node: &OrgNode) -> bool {
        let school_match = self.school_id.is_some() && self.school_id == node.school_id;
        let branch_match = self.branch_id.is_some() && self.branch_id == node.branch_id;
        school_match || branch_match
    }
}

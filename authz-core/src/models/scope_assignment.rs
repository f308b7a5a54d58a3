//! Scope assignment model - entity-user → org-node administration junctions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Scope assignment entity.
///
/// Only meaningful for school_admin/branch_admin levels (and entity-level
/// users without the company admin flag). Created and removed by company
/// admins managing staff; every write bumps the directory version counter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScopeAssignment {
    pub assignment_id: Uuid,
    pub principal_id: Uuid,
    pub node_id: Uuid,
    pub created_utc: DateTime<Utc>,
}

impl ScopeAssignment {
    /// Create a new assignment.
    pub fn new(principal_id: Uuid, node_id: Uuid) -> Self {
        Self {
            assignment_id: Uuid::new_v4(),
            principal_id,
            node_id,
            created_utc: Utc::now(),
        }
    }
}

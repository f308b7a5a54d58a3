//! Entity user model - company staff with an administrative level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Administrative level codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    EntityAdmin,
    SubEntityAdmin,
    SchoolAdmin,
    BranchAdmin,
    None,
}

impl AdminLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminLevel::EntityAdmin => "entity_admin",
            AdminLevel::SubEntityAdmin => "sub_entity_admin",
            AdminLevel::SchoolAdmin => "school_admin",
            AdminLevel::BranchAdmin => "branch_admin",
            AdminLevel::None => "none",
        }
    }

    /// Parse an admin level code. Unknown codes fall back to None.
    pub fn parse(s: &str) -> Self {
        match s {
            "entity_admin" => AdminLevel::EntityAdmin,
            "sub_entity_admin" => AdminLevel::SubEntityAdmin,
            "school_admin" => AdminLevel::SchoolAdmin,
            "branch_admin" => AdminLevel::BranchAdmin,
            _ => AdminLevel::None,
        }
    }

    /// Check if this level is entity-wide (as opposed to node-scoped).
    pub fn is_entity_wide(&self) -> bool {
        matches!(self, AdminLevel::EntityAdmin | AdminLevel::SubEntityAdmin)
    }
}

/// Entity user entity. One entity user belongs to exactly one company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntityUser {
    pub principal_id: Uuid,
    pub company_id: Uuid,
    pub admin_level_code: String,
    pub is_company_admin: bool,
    pub active_flag: bool,
    pub created_utc: DateTime<Utc>,
}

impl EntityUser {
    /// Create a new entity user.
    pub fn new(
        principal_id: Uuid,
        company_id: Uuid,
        admin_level: AdminLevel,
        is_company_admin: bool,
    ) -> Self {
        Self {
            principal_id,
            company_id,
            admin_level_code: admin_level.as_str().to_string(),
            is_company_admin,
            active_flag: true,
            created_utc: Utc::now(),
        }
    }

    /// Get admin level as enum.
    pub fn admin_level(&self) -> AdminLevel {
        AdminLevel::parse(&self.admin_level_code)
    }

    /// Check if entity user is active.
    pub fn is_active(&self) -> bool {
        self.active_flag
    }

    /// Check whether this user administers the whole company subtree.
    /// Entity-wide levels without the company admin flag fall back to their
    /// explicit scope assignments.
    pub fn has_company_wide_authority(&self) -> bool {
        self.admin_level().is_entity_wide() && self.is_company_admin
    }
}

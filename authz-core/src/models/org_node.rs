//! Org node model - the Company → School → Branch → Department tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Node kind codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Company,
    School,
    Branch,
    Department,
    ClassSection,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Company => "company",
            NodeKind::School => "school",
            NodeKind::Branch => "branch",
            NodeKind::Department => "department",
            NodeKind::ClassSection => "class_section",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "company" => Some(NodeKind::Company),
            "school" => Some(NodeKind::School),
            "branch" => Some(NodeKind::Branch),
            "department" => Some(NodeKind::Department),
            "class_section" => Some(NodeKind::ClassSection),
            _ => None,
        }
    }
}

/// Org node entity.
///
/// company_id/school_id/branch_id are denormalized ancestor columns: every
/// node carries the id of the company it sits under, plus the school and
/// branch where applicable (a school carries its own id in school_id, a
/// branch its own id in branch_id). Scope checks match against these columns
/// directly, so no tree walk happens per check. Invariant: company_id always
/// equals the id of the root company node.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrgNode {
    pub node_id: Uuid,
    pub node_kind_code: String,
    pub node_label: String,
    pub parent_node_id: Option<Uuid>,
    pub company_id: Uuid,
    pub school_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub active_flag: bool,
    pub created_utc: DateTime<Utc>,
}

impl OrgNode {
    /// Create a root company node.
    pub fn company(node_label: String) -> Self {
        let node_id = Uuid::new_v4();
        Self {
            node_id,
            node_kind_code: NodeKind::Company.as_str().to_string(),
            node_label,
            parent_node_id: None,
            company_id: node_id,
            school_id: None,
            branch_id: None,
            active_flag: true,
            created_utc: Utc::now(),
        }
    }

    /// Create a school under a company.
    pub fn school(company: &OrgNode, node_label: String) -> Self {
        let node_id = Uuid::new_v4();
        Self {
            node_id,
            node_kind_code: NodeKind::School.as_str().to_string(),
            node_label,
            parent_node_id: Some(company.node_id),
            company_id: company.company_id,
            school_id: Some(node_id),
            branch_id: None,
            active_flag: true,
            created_utc: Utc::now(),
        }
    }

    /// Create a branch under a school.
    pub fn branch(school: &OrgNode, node_label: String) -> Self {
        let node_id = Uuid::new_v4();
        Self {
            node_id,
            node_kind_code: NodeKind::Branch.as_str().to_string(),
            node_label,
            parent_node_id: Some(school.node_id),
            company_id: school.company_id,
            school_id: school.school_id,
            branch_id: Some(node_id),
            active_flag: true,
            created_utc: Utc::now(),
        }
    }

    /// Create a department under a branch.
    pub fn department(branch: &OrgNode, node_label: String) -> Self {
        Self::leaf(branch, NodeKind::Department, node_label)
    }

    /// Create a class section under a branch.
    pub fn class_section(branch: &OrgNode, node_label: String) -> Self {
        Self::leaf(branch, NodeKind::ClassSection, node_label)
    }

    fn leaf(parent: &OrgNode, kind: NodeKind, node_label: String) -> Self {
        Self {
            node_id: Uuid::new_v4(),
            node_kind_code: kind.as_str().to_string(),
            node_label,
            parent_node_id: Some(parent.node_id),
            company_id: parent.company_id,
            school_id: parent.school_id,
            branch_id: parent.branch_id,
            active_flag: true,
            created_utc: Utc::now(),
        }
    }

    /// Get node kind as enum.
    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::parse(&self.node_kind_code)
    }

    /// Check if this is a root node.
    pub fn is_root(&self) -> bool {
        self.parent_node_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_is_its_own_root() {
        let company = OrgNode::company("Acme Education".to_string());
        assert!(company.is_root());
        assert_eq!(company.company_id, company.node_id);
    }

    #[test]
    fn descendants_inherit_ancestor_columns() {
        let company = OrgNode::company("Acme Education".to_string());
        let school = OrgNode::school(&company, "North School".to_string());
        let branch = OrgNode::branch(&school, "Main Campus".to_string());
        let dept = OrgNode::department(&branch, "Mathematics".to_string());

        assert_eq!(school.company_id, company.node_id);
        assert_eq!(school.school_id, Some(school.node_id));
        assert_eq!(branch.school_id, Some(school.node_id));
        assert_eq!(branch.branch_id, Some(branch.node_id));
        assert_eq!(dept.company_id, company.node_id);
        assert_eq!(dept.school_id, Some(school.node_id));
        assert_eq!(dept.branch_id, Some(branch.node_id));
        assert_eq!(dept.kind(), Some(NodeKind::Department));
    }
}

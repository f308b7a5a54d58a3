//! Scope sets - the organizational reach of a principal's authority.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NodeKind, OrgNode};

/// The set of organizational nodes a principal may administer.
///
/// Subtrees are represented by their roots: holding a school id means the
/// school and everything under it. Containment is decided against a node's
/// denormalized ancestor columns, so membership never requires a tree walk
/// and never leaks sideways to siblings or upward to ancestors. The `all`
/// sentinel is the universal scope of an active system administrator.
///
/// The per-level id sets are public so batch list queries can pre-filter
/// rows by scope instead of running one decision per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSet {
    pub all: bool,
    pub company_ids: HashSet<Uuid>,
    pub school_ids: HashSet<Uuid>,
    pub branch_ids: HashSet<Uuid>,
    pub department_ids: HashSet<Uuid>,
}

impl ScopeSet {
    /// The empty scope. Fail-closed resolutions return this.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The universal scope sentinel.
    pub fn universal() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn is_universal(&self) -> bool {
        self.all
    }

    pub fn is_empty(&self) -> bool {
        !self.all
            && self.company_ids.is_empty()
            && self.school_ids.is_empty()
            && self.branch_ids.is_empty()
            && self.department_ids.is_empty()
    }

    /// Add a subtree rooted at the given node.
    pub fn insert_root(&mut self, node: &OrgNode) {
        match node.kind() {
            Some(NodeKind::Company) => {
                self.company_ids.insert(node.node_id);
            }
            Some(NodeKind::School) => {
                self.school_ids.insert(node.node_id);
            }
            Some(NodeKind::Branch) => {
                self.branch_ids.insert(node.node_id);
            }
            Some(NodeKind::Department) | Some(NodeKind::ClassSection) => {
                self.department_ids.insert(node.node_id);
            }
            None => {}
        }
    }

    /// Check whether a node is inside the scope: equal to a held root or a
    /// descendant of one, per the node's denormalized ancestor columns.
    pub fn contains_node(&self, node: &OrgNode) -> bool {
        if self.all {
            return true;
        }
        if self.company_ids.contains(&node.company_id) {
            return true;
        }
        if let Some(school_id) = node.school_id {
            if self.school_ids.contains(&school_id) {
                return true;
            }
        }
        if let Some(branch_id) = node.branch_id {
            if self.branch_ids.contains(&branch_id) {
                return true;
            }
        }
        self.department_ids.contains(&node.node_id)
    }
}

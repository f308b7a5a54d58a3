//! In-memory directory store.
//!
//! Backs the test suite and single-process embeddings. Mutators mirror what
//! provisioning workflows do against the real directory, including bumping
//! the assignment version counter on scope writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{AdminLevel, EntityUser, OrgNode, Principal, ScopeAssignment};
use crate::services::error::AuthzError;

use super::DirectoryStore;

/// In-memory directory store.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    principals: RwLock<HashMap<Uuid, Principal>>,
    entity_users: RwLock<HashMap<Uuid, EntityUser>>,
    nodes: RwLock<HashMap<Uuid, OrgNode>>,
    assignments: RwLock<Vec<ScopeAssignment>>,
    version: AtomicU64,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_principal(&self, principal: Principal) {
        write(&self.principals).insert(principal.principal_id, principal);
    }

    pub fn insert_entity_user(&self, entity_user: EntityUser) {
        write(&self.entity_users).insert(entity_user.principal_id, entity_user);
    }

    pub fn insert_node(&self, node: OrgNode) {
        write(&self.nodes).insert(node.node_id, node);
    }

    /// Grant a principal administrative scope over a node.
    pub fn assign_scope(&self, principal_id: Uuid, node_id: Uuid) -> ScopeAssignment {
        let assignment = ScopeAssignment::new(principal_id, node_id);
        write(&self.assignments).push(assignment.clone());
        self.version.fetch_add(1, Ordering::SeqCst);
        assignment
    }

    /// Remove a principal's scope over a node.
    pub fn revoke_scope(&self, principal_id: Uuid, node_id: Uuid) {
        write(&self.assignments)
            .retain(|a| !(a.principal_id == principal_id && a.node_id == node_id));
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_principal_active(&self, principal_id: Uuid, active: bool) {
        if let Some(p) = write(&self.principals).get_mut(&principal_id) {
            p.active_flag = active;
        }
    }

    pub fn set_admin_level(&self, principal_id: Uuid, level: AdminLevel, is_company_admin: bool) {
        if let Some(eu) = write(&self.entity_users).get_mut(&principal_id) {
            eu.admin_level_code = level.as_str().to_string();
            eu.is_company_admin = is_company_admin;
        }
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn find_principal(&self, principal_id: Uuid) -> Result<Option<Principal>, AuthzError> {
        Ok(read(&self.principals).get(&principal_id).cloned())
    }

    async fn find_entity_user(
        &self,
        principal_id: Uuid,
    ) -> Result<Option<EntityUser>, AuthzError> {
        Ok(read(&self.entity_users).get(&principal_id).cloned())
    }

    async fn find_org_node(&self, node_id: Uuid) -> Result<Option<OrgNode>, AuthzError> {
        Ok(read(&self.nodes).get(&node_id).cloned())
    }

    async fn scope_assignments(
        &self,
        principal_id: Uuid,
    ) -> Result<Vec<ScopeAssignment>, AuthzError> {
        Ok(read(&self.assignments)
            .iter()
            .filter(|a| a.principal_id == principal_id)
            .cloned()
            .collect())
    }

    async fn assignment_version(&self) -> Result<u64, AuthzError> {
        Ok(self.version.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleKind;

    #[tokio::test]
    async fn scope_writes_bump_the_version_counter() {
        let dir = MemoryDirectory::new();
        let principal = Principal::new("subj".to_string(), RoleKind::EntityUser);
        let pid = principal.principal_id;
        dir.insert_principal(principal);
        let company = OrgNode::company("Acme".to_string());
        let school = OrgNode::school(&company, "North".to_string());
        let node_id = school.node_id;
        dir.insert_node(company);
        dir.insert_node(school);

        let v0 = dir.assignment_version().await.unwrap();
        dir.assign_scope(pid, node_id);
        let v1 = dir.assignment_version().await.unwrap();
        dir.revoke_scope(pid, node_id);
        let v2 = dir.assignment_version().await.unwrap();

        assert!(v1 > v0);
        assert!(v2 > v1);
        assert!(dir.scope_assignments(pid).await.unwrap().is_empty());
    }
}

//! Scope resolver - computes the organizational reach of a principal.

use std::sync::Arc;

use uuid::Uuid;

use crate::directory::DirectoryStore;
use crate::models::{RoleKind, ScopeSet};

use super::context::RequestContext;
use super::error::AuthzError;

/// Resolves the set of org nodes a principal holds authority over.
///
/// Fail-closed: a missing or inactive principal, an unknown role code, or
/// any directory error resolves to the empty scope. This never raises to
/// the caller.
#[derive(Clone)]
pub struct ScopeResolver {
    directory: Arc<dyn DirectoryStore>,
}

impl ScopeResolver {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }

    /// Resolve the scope set for a principal, memoized for the request.
    ///
    /// The cache key includes the directory's assignment version counter, so
    /// a scope-assignment write shows up on the next resolution without any
    /// explicit invalidation.
    pub async fn resolve(&self, ctx: &mut RequestContext, principal_id: Uuid) -> ScopeSet {
        let version = match self.directory.assignment_version().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    principal_id = %principal_id,
                    "assignment version read failed, returning empty scope"
                );
                return ScopeSet::empty();
            }
        };

        if let Some(cached) = ctx.cached_scope(principal_id, version) {
            return cached.clone();
        }

        let scope = match self.resolve_uncached(principal_id).await {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    principal_id = %principal_id,
                    "scope resolution failed, returning empty scope"
                );
                ScopeSet::empty()
            }
        };

        ctx.store_scope(principal_id, version, scope.clone());
        scope
    }

    async fn resolve_uncached(&self, principal_id: Uuid) -> Result<ScopeSet, AuthzError> {
        let principal = match self.directory.find_principal(principal_id).await? {
            Some(p) => p,
            None => return Ok(ScopeSet::empty()),
        };
        if !principal.is_active() {
            return Ok(ScopeSet::empty());
        }

        match principal.role() {
            Some(RoleKind::SystemAdmin) => Ok(ScopeSet::universal()),
            Some(RoleKind::EntityUser) => self.resolve_entity_user(principal_id).await,
            Some(RoleKind::Teacher) | Some(RoleKind::Student) | Some(RoleKind::Parent) => {
                // Own-association singleton, for view-own checks only.
                let mut scope = ScopeSet::empty();
                if let Some(school_id) = principal.school_id {
                    scope.school_ids.insert(school_id);
                }
                if let Some(branch_id) = principal.branch_id {
                    scope.branch_ids.insert(branch_id);
                }
                Ok(scope)
            }
            None => Ok(ScopeSet::empty()),
        }
    }

    async fn resolve_entity_user(&self, principal_id: Uuid) -> Result<ScopeSet, AuthzError> {
        let entity_user = match self.directory.find_entity_user(principal_id).await? {
            Some(eu) => eu,
            None => return Ok(ScopeSet::empty()),
        };
        if !entity_user.is_active() {
            return Ok(ScopeSet::empty());
        }

        if entity_user.has_company_wide_authority() {
            // The full company subtree, represented by its root. Containment
            // resolves against the denormalized company_id column, so no
            // subtree enumeration happens here.
            let mut scope = ScopeSet::empty();
            scope.company_ids.insert(entity_user.company_id);
            return Ok(scope);
        }

        // Node-scoped admins: union of subtrees rooted at assigned nodes.
        let mut scope = ScopeSet::empty();
        for assignment in self.directory.scope_assignments(principal_id).await? {
            match self.directory.find_org_node(assignment.node_id).await? {
                Some(node) => {
                    // Tenant isolation: an assignment pointing outside the
                    // user's own company contributes nothing.
                    if node.company_id == entity_user.company_id {
                        scope.insert_root(&node);
                    } else {
                        tracing::warn!(
                            principal_id = %principal_id,
                            node_id = %node.node_id,
                            "scope assignment crosses company boundary, ignoring"
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        principal_id = %principal_id,
                        node_id = %assignment.node_id,
                        "scope assignment references missing node, ignoring"
                    );
                }
            }
        }
        Ok(scope)
    }
}

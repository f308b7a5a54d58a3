//! Directory store - the elevated, non-recursive read path.
//!
//! Every identity and scope lookup the engine makes goes through
//! [`DirectoryStore`]. Implementations read the directory tables directly
//! and hold no reference back into the evaluator, so answering "is this
//! user an admin" can never re-enter the authorization layer on its own
//! supporting data. Only resource-layer checks route through the ordinary
//! protected path, on the caller's side of the boundary.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryDirectory;
pub use postgres::{create_pool, health_check, run_migrations, PostgresAuditSink, PostgresDirectory};

use crate::models::{EntityUser, OrgNode, Principal, ScopeAssignment};
use crate::services::error::AuthzError;

/// Read-only access to principal, role, and scope data.
///
/// All lookups are single indexed reads; implementations must not perform
/// permission checks of their own.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Find a principal by id.
    async fn find_principal(&self, principal_id: Uuid) -> Result<Option<Principal>, AuthzError>;

    /// Find the entity-user record for a principal.
    async fn find_entity_user(&self, principal_id: Uuid)
        -> Result<Option<EntityUser>, AuthzError>;

    /// Find an org node by id.
    async fn find_org_node(&self, node_id: Uuid) -> Result<Option<OrgNode>, AuthzError>;

    /// Scope assignments held by a principal.
    async fn scope_assignments(&self, principal_id: Uuid)
        -> Result<Vec<ScopeAssignment>, AuthzError>;

    /// Monotonic counter bumped by every scope-assignment write.
    ///
    /// Reading it is O(1); it keys the request-scoped scope cache so a
    /// write invalidates cached scope sets without any messaging.
    async fn assignment_version(&self) -> Result<u64, AuthzError>;
}

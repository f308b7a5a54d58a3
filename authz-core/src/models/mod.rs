pub mod audit_record;
pub mod decision;
pub mod entity_user;
pub mod impersonation;
pub mod org_node;
pub mod principal;
pub mod resource;
pub mod scope_assignment;
pub mod scope_set;

pub use audit_record::AuditRecord;
pub use decision::{AllowReason, Decision, DenyReason};
pub use entity_user::{AdminLevel, EntityUser};
pub use impersonation::{ImpersonationSession, SessionState};
pub use org_node::{NodeKind, OrgNode};
pub use principal::{Principal, RoleKind};
pub use resource::{Action, ResourceDescriptor, ResourceKind};
pub use scope_assignment::ScopeAssignment;
pub use scope_set::ScopeSet;

//! Access-control decision core for the multi-tenant education platform.
//!
//! Given a principal and a requested operation on a resource, the engine
//! decides allow or deny by composing the principal's role with its
//! organizational scope (Company → School → Branch → Department/Class
//! Section). It also provides time-boxed test mode impersonation for system
//! administrators, with every impersonated decision audited.
//!
//! The engine is a synchronous-per-request decision core: no transport, no
//! policy DSL. Callers thread a [`services::RequestContext`] through each
//! request so scope resolution happens once per request, then enforce the
//! returned decision before touching the resource.
//!
//! ```no_run
//! use std::sync::Arc;
//! use authz_core::config::TestModeConfig;
//! use authz_core::directory::MemoryDirectory;
//! use authz_core::models::{Action, ResourceDescriptor, ResourceKind};
//! use authz_core::services::{CapabilityEvaluator, RequestContext, TracingAuditSink};
//! # use uuid::Uuid;
//!
//! # async fn demo(principal_id: Uuid, resource_id: Uuid, node_id: Uuid) {
//! let directory = Arc::new(MemoryDirectory::new());
//! let audit = Arc::new(TracingAuditSink);
//! let evaluator =
//!     CapabilityEvaluator::new(directory, audit, &TestModeConfig::default());
//!
//! let mut ctx = RequestContext::new();
//! let resource = ResourceDescriptor::new(ResourceKind::Question, resource_id, node_id);
//! let decision = evaluator
//!     .can(&mut ctx, principal_id, Action::Read, &resource)
//!     .await
//!     .expect("well-formed descriptor");
//! if decision.is_allowed() {
//!     // perform the operation
//! }
//! # }
//! ```

pub mod config;
pub mod directory;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::AuthzConfig;
pub use directory::{DirectoryStore, MemoryDirectory, PostgresAuditSink, PostgresDirectory};
pub use models::{
    Action, AdminLevel, AllowReason, AuditRecord, Decision, DenyReason, EntityUser,
    ImpersonationSession, NodeKind, OrgNode, Principal, ResourceDescriptor, ResourceKind,
    RoleKind, ScopeAssignment, ScopeSet, SessionState,
};
pub use services::{
    AuditSink, AuthzError, CapabilityEvaluator, MemoryAuditSink, RequestContext, ScopeResolver,
    TracingAuditSink,
};

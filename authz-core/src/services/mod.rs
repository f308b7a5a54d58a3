//! Services layer for the authorization engine.
//!
//! Provides the scope resolver, the capability evaluator, the impersonation
//! overlay, and the audit sink interface.

pub mod audit;
mod context;
mod evaluator;
pub mod error;
mod impersonation;
pub mod metrics;
mod scope;

pub use audit::{AuditSink, FailingAuditSink, MemoryAuditSink, TracingAuditSink};
pub use context::RequestContext;
pub use error::AuthzError;
pub use evaluator::CapabilityEvaluator;
pub use scope::ScopeResolver;

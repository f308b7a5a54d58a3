//! Request context - per-request evaluation state.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{ImpersonationSession, ScopeSet};

struct CachedScope {
    version: u64,
    scope: ScopeSet,
}

/// Per-request evaluation context.
///
/// Created at request start and dropped at request end. Holds the
/// request-scoped scope memo (so a request evaluates scope once, not once
/// per row), the impersonation overlay, and the caller's elevated-audit
/// flag. No state here crosses a request boundary: read-your-writes within
/// one request is all correctness requires.
#[derive(Default)]
pub struct RequestContext {
    scope_cache: HashMap<Uuid, CachedScope>,
    impersonation: Option<ImpersonationSession>,
    expiry_recorded: bool,
    audit_elevated: bool,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an impersonation session for this request.
    pub fn set_impersonation(&mut self, session: ImpersonationSession) {
        self.impersonation = Some(session);
        self.expiry_recorded = false;
    }

    pub fn impersonation(&self) -> Option<&ImpersonationSession> {
        self.impersonation.as_ref()
    }

    /// Remove and return the current session.
    pub fn clear_impersonation(&mut self) -> Option<ImpersonationSession> {
        self.impersonation.take()
    }

    /// Ask the engine to audit non-impersonated decisions made in this
    /// request (e.g. direct system-admin writes).
    pub fn record_elevated(&mut self, enabled: bool) {
        self.audit_elevated = enabled;
    }

    pub fn audit_elevated(&self) -> bool {
        self.audit_elevated
    }

    pub(crate) fn expiry_recorded(&self) -> bool {
        self.expiry_recorded
    }

    pub(crate) fn mark_expiry_recorded(&mut self) {
        self.expiry_recorded = true;
    }

    /// Cached scope for a principal, valid only at the given directory
    /// version.
    pub(crate) fn cached_scope(&self, principal_id: Uuid, version: u64) -> Option<&ScopeSet> {
        self.scope_cache
            .get(&principal_id)
            .filter(|c| c.version == version)
            .map(|c| &c.scope)
    }

    pub(crate) fn store_scope(&mut self, principal_id: Uuid, version: u64, scope: ScopeSet) {
        self.scope_cache
            .insert(principal_id, CachedScope { version, scope });
    }
}

//! Capability evaluator - role + scope → allow/deny.
//!
//! One ordered decision list drives every resource check; there is no
//! per-resource-table rule set. Identity and scope lookups go through the
//! directory store's elevated read path, so evaluating "is this user an
//! admin" cannot re-enter this evaluator on the directory's own rows.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::TestModeConfig;
use crate::directory::DirectoryStore;
use crate::models::{
    Action, AllowReason, AuditRecord, Decision, DenyReason, ImpersonationSession, OrgNode,
    Principal, ResourceDescriptor, RoleKind, ScopeSet,
};

use super::audit::{record_or_warn, AuditSink};
use super::context::RequestContext;
use super::error::AuthzError;
use super::impersonation::resolve_overlay;
use super::metrics;
use super::scope::ScopeResolver;

/// The authorization decision engine.
///
/// Stateless across requests; all per-request state lives in the
/// [`RequestContext`] the caller threads through.
#[derive(Clone)]
pub struct CapabilityEvaluator {
    directory: Arc<dyn DirectoryStore>,
    resolver: ScopeResolver,
    audit: Arc<dyn AuditSink>,
    test_mode_ttl: chrono::Duration,
}

impl CapabilityEvaluator {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        audit: Arc<dyn AuditSink>,
        test_mode: &TestModeConfig,
    ) -> Self {
        Self {
            resolver: ScopeResolver::new(directory.clone()),
            directory,
            audit,
            test_mode_ttl: test_mode.ttl(),
        }
    }

    /// Decide whether `principal_id` may perform `action` on `resource`.
    ///
    /// Lookup problems resolve to deny, never to an error: the caller only
    /// ever reports "forbidden", not "internal error". The one exception is
    /// a structurally malformed descriptor, which is a caller bug and is
    /// surfaced as `Err`. Calling twice with identical inputs and no
    /// intervening directory writes yields the identical decision.
    pub async fn can(
        &self,
        ctx: &mut RequestContext,
        principal_id: Uuid,
        action: Action,
        resource: &ResourceDescriptor,
    ) -> Result<Decision, AuthzError> {
        resource.validate()?;

        let now = Utc::now();
        let overlay = resolve_overlay(ctx, principal_id, now, &self.audit).await;
        let effective_id = overlay
            .as_ref()
            .map(|s| s.effective_principal_id)
            .unwrap_or(principal_id);

        let decision = match self.evaluate(ctx, effective_id, action, resource).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    principal_id = %effective_id,
                    action = action.as_str(),
                    resource_type = %resource.resource_type,
                    "authorization lookup failed, denying"
                );
                Decision::Deny(DenyReason::LookupFailed)
            }
        };

        metrics::observe_decision(action, &decision);
        tracing::debug!(
            principal_id = %principal_id,
            effective_principal_id = %effective_id,
            action = action.as_str(),
            resource_type = %resource.resource_type,
            resource_id = %resource.resource_id,
            outcome = decision.outcome(),
            reason = decision.reason_code(),
            "authorization decision"
        );

        if let Some(session) = overlay {
            record_or_warn(
                &self.audit,
                AuditRecord::impersonated_decision(&session, action, resource, &decision),
            )
            .await;
        } else if ctx.audit_elevated() {
            record_or_warn(
                &self.audit,
                AuditRecord::elevated_decision(principal_id, action, resource, &decision),
            )
            .await;
        }

        Ok(decision)
    }

    /// Resolve the scope set for batch pre-filtering.
    ///
    /// Honors the same impersonation substitution as `can`, fails closed to
    /// the empty set, and never errors.
    pub async fn resolve_scope(&self, ctx: &mut RequestContext, principal_id: Uuid) -> ScopeSet {
        let now = Utc::now();
        let overlay = resolve_overlay(ctx, principal_id, now, &self.audit).await;
        let effective_id = overlay
            .as_ref()
            .map(|s| s.effective_principal_id)
            .unwrap_or(principal_id);
        self.resolver.resolve(ctx, effective_id).await
    }

    /// Activate a test mode session impersonating `target_id`.
    ///
    /// Gated by the evaluator itself on the activate-test-mode action, which
    /// only an active system administrator passes. The gate runs under the
    /// current context, so an already-impersonating admin evaluates as the
    /// effective principal and is denied - sessions cannot nest.
    pub async fn activate_test_mode(
        &self,
        ctx: &mut RequestContext,
        admin_id: Uuid,
        target_id: Uuid,
    ) -> Result<ImpersonationSession, AuthzError> {
        let gate = self
            .can(
                ctx,
                admin_id,
                Action::ActivateTestMode,
                &ResourceDescriptor::principal_target(target_id),
            )
            .await?;
        if !gate.is_allowed() {
            return Err(AuthzError::ActivationDenied(
                gate.reason_code().to_string(),
            ));
        }

        let target = self
            .directory
            .find_principal(target_id)
            .await?
            .ok_or_else(|| {
                AuthzError::ActivationDenied("target principal not found".to_string())
            })?;
        if !target.is_active() {
            return Err(AuthzError::ActivationDenied(
                "target principal inactive".to_string(),
            ));
        }

        let session = ImpersonationSession::new(admin_id, target_id, self.test_mode_ttl);
        metrics::observe_impersonation("started");
        tracing::info!(
            session_id = %session.session_id,
            real_admin_id = %admin_id,
            effective_principal_id = %target_id,
            expires_utc = %session.expires_utc,
            "test mode session started"
        );
        record_or_warn(&self.audit, AuditRecord::session_started(&session)).await;
        ctx.set_impersonation(session.clone());
        Ok(session)
    }

    /// Explicitly end the context's test mode session, if any.
    pub async fn deactivate_test_mode(
        &self,
        ctx: &mut RequestContext,
    ) -> Option<ImpersonationSession> {
        let mut session = ctx.clear_impersonation()?;
        session.deactivate();
        metrics::observe_impersonation("ended");
        tracing::info!(
            session_id = %session.session_id,
            real_admin_id = %session.real_admin_id,
            "test mode session ended"
        );
        record_or_warn(&self.audit, AuditRecord::session_ended(&session)).await;
        Some(session)
    }

    /// The ordered decision list. First match wins. Ownership is checked
    /// before scope, so creator rights do not depend on current scope.
    async fn evaluate(
        &self,
        ctx: &mut RequestContext,
        principal_id: Uuid,
        action: Action,
        resource: &ResourceDescriptor,
    ) -> Result<Decision, AuthzError> {
        let principal = match self.directory.find_principal(principal_id).await? {
            Some(p) => p,
            None => return Ok(Decision::Deny(DenyReason::PrincipalNotFound)),
        };
        if !principal.is_active() {
            return Ok(Decision::Deny(DenyReason::PrincipalInactive));
        }
        let role = match principal.role() {
            Some(r) => r,
            None => return Ok(Decision::Deny(DenyReason::UnknownRole)),
        };

        // 1. Active system administrators pass unconditionally.
        if role == RoleKind::SystemAdmin {
            return Ok(Decision::Allow(AllowReason::SystemAdmin));
        }

        // 2. Test mode activation is never grantable by ownership or scope.
        if action == Action::ActivateTestMode {
            return Ok(Decision::Deny(DenyReason::TestModeRestricted));
        }

        // 3. Creator rights, independent of current scope.
        if resource.creator_id == Some(principal_id) && action.is_ownership_scoped() {
            return Ok(Decision::Allow(AllowReason::ResourceCreator));
        }

        // 4. Past this point only known content types are decidable.
        if resource.kind().is_none() {
            return Ok(Decision::Deny(DenyReason::UnknownResourceType));
        }

        let owning_node = match resource.node_id {
            Some(node_id) => self.directory.find_org_node(node_id).await?,
            None => None,
        };

        // 5. Administrative scope containment.
        if role == RoleKind::EntityUser {
            if let Some(node) = owning_node.as_ref() {
                let scope = self.resolver.resolve(ctx, principal_id).await;
                if scope.contains_node(node) {
                    return Ok(Decision::Allow(AllowReason::ScopeAdmin));
                }
            }
            return Ok(Decision::Deny(DenyReason::OutOfScope));
        }

        // 6. Role-specific read-only grants.
        let node = match owning_node {
            Some(n) => n,
            None => return Ok(Decision::Deny(DenyReason::OutOfScope)),
        };
        Ok(Self::read_only_grant(&principal, role, action, resource, &node))
    }

    fn read_only_grant(
        principal: &Principal,
        role: RoleKind,
        action: Action,
        resource: &ResourceDescriptor,
        node: &OrgNode,
    ) -> Decision {
        if action != Action::Read || !principal.is_associated_with(node) {
            return Decision::Deny(DenyReason::OutOfScope);
        }
        match role {
            // Teachers read anything owned by their own school/branch.
            RoleKind::Teacher => Decision::Allow(AllowReason::AssociationRead),
            // Students and parents additionally need the resource published.
            RoleKind::Student | RoleKind::Parent => {
                if resource.published {
                    Decision::Allow(AllowReason::PublishedRead)
                } else {
                    Decision::Deny(DenyReason::NotPublished)
                }
            }
            _ => Decision::Deny(DenyReason::OutOfScope),
        }
    }
}

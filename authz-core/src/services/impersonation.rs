//! Impersonation overlay - effective-principal substitution with lazy expiry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AuditRecord, ImpersonationSession, SessionState};

use super::audit::{record_or_warn, AuditSink};
use super::context::RequestContext;
use super::metrics;

/// Resolve the session that substitutes for the given caller, if any.
///
/// Substitution applies only while the session is active and the caller is
/// the session's real admin; impersonation is strictly privilege
/// substitution, never addition. An expired session falls back to the real
/// principal and is audited once, on the first evaluation that observes the
/// expiry - there is no background sweep.
pub(crate) async fn resolve_overlay(
    ctx: &mut RequestContext,
    real_principal_id: Uuid,
    now: DateTime<Utc>,
    audit: &Arc<dyn AuditSink>,
) -> Option<ImpersonationSession> {
    let session = ctx.impersonation()?.clone();
    match session.state(now) {
        SessionState::Active if session.real_admin_id == real_principal_id => Some(session),
        SessionState::Active | SessionState::Deactivated => None,
        SessionState::Expired => {
            if !ctx.expiry_recorded() {
                ctx.mark_expiry_recorded();
                metrics::observe_impersonation("expired");
                tracing::info!(
                    session_id = %session.session_id,
                    real_admin_id = %session.real_admin_id,
                    "test mode session expired, reverting to real principal"
                );
                record_or_warn(audit, AuditRecord::session_expired(&session)).await;
            }
            None
        }
    }
}

//! Audit record model - append-only trail of impersonation and elevated activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Action, Decision, ImpersonationSession, ResourceDescriptor};

/// Audit record. Written once, never updated or deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditRecord {
    pub audit_id: Uuid,
    pub actor_id: Uuid,
    pub effective_principal_id: Option<Uuid>,
    pub event_code: String,
    pub action_code: String,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub details: String,
    pub recorded_utc: DateTime<Utc>,
}

impl AuditRecord {
    /// Create a new audit record.
    pub fn new(
        actor_id: Uuid,
        effective_principal_id: Option<Uuid>,
        event_code: impl Into<String>,
        action_code: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: Option<Uuid>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            audit_id: Uuid::new_v4(),
            actor_id,
            effective_principal_id,
            event_code: event_code.into(),
            action_code: action_code.into(),
            resource_type: resource_type.into(),
            resource_id,
            details: details.into(),
            recorded_utc: Utc::now(),
        }
    }

    /// A decision made while impersonating: tagged with both identities.
    pub fn impersonated_decision(
        session: &ImpersonationSession,
        action: Action,
        resource: &ResourceDescriptor,
        decision: &Decision,
    ) -> Self {
        Self::new(
            session.real_admin_id,
            Some(session.effective_principal_id),
            "decision",
            action.as_str(),
            resource.resource_type.clone(),
            Some(resource.resource_id),
            serde_json::json!({
                "session_id": session.session_id,
                "outcome": decision.outcome(),
                "reason": decision.reason_code(),
            })
            .to_string(),
        )
    }

    /// A non-impersonated decision the calling layer asked to have recorded.
    pub fn elevated_decision(
        actor_id: Uuid,
        action: Action,
        resource: &ResourceDescriptor,
        decision: &Decision,
    ) -> Self {
        Self::new(
            actor_id,
            None,
            "elevated_decision",
            action.as_str(),
            resource.resource_type.clone(),
            Some(resource.resource_id),
            serde_json::json!({
                "outcome": decision.outcome(),
                "reason": decision.reason_code(),
            })
            .to_string(),
        )
    }

    /// Test mode session activated.
    pub fn session_started(session: &ImpersonationSession) -> Self {
        Self::new(
            session.real_admin_id,
            Some(session.effective_principal_id),
            "test_mode_started",
            "activate_test_mode",
            "impersonation_session",
            Some(session.session_id),
            serde_json::json!({
                "started_utc": session.started_utc,
                "expires_utc": session.expires_utc,
            })
            .to_string(),
        )
    }

    /// Test mode session explicitly deactivated.
    pub fn session_ended(session: &ImpersonationSession) -> Self {
        Self::new(
            session.real_admin_id,
            Some(session.effective_principal_id),
            "test_mode_ended",
            "deactivate_test_mode",
            "impersonation_session",
            Some(session.session_id),
            serde_json::json!({ "started_utc": session.started_utc }).to_string(),
        )
    }

    /// Test mode session observed past its TTL.
    pub fn session_expired(session: &ImpersonationSession) -> Self {
        Self::new(
            session.real_admin_id,
            Some(session.effective_principal_id),
            "test_mode_expired",
            "expire_test_mode",
            "impersonation_session",
            Some(session.session_id),
            serde_json::json!({ "expires_utc": session.expires_utc }).to_string(),
        )
    }
}

//! Impersonation session model - time-boxed test mode for administrators.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Expired,
    Deactivated,
}

/// Impersonation session.
///
/// Carried through the request context, never stored process-wide. The TTL
/// is fixed at creation and not renewable; expiry is observed lazily by
/// comparing expires_utc against the evaluation clock, so no background
/// sweep exists. The session outlives its TTL only through the audit
/// records it generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpersonationSession {
    pub session_id: Uuid,
    pub real_admin_id: Uuid,
    pub effective_principal_id: Uuid,
    pub started_utc: DateTime<Utc>,
    pub expires_utc: DateTime<Utc>,
    pub deactivated: bool,
}

impl ImpersonationSession {
    /// Create a session starting now.
    pub fn new(real_admin_id: Uuid, effective_principal_id: Uuid, ttl: Duration) -> Self {
        Self::new_at(real_admin_id, effective_principal_id, Utc::now(), ttl)
    }

    /// Create a session with an explicit start time.
    pub fn new_at(
        real_admin_id: Uuid,
        effective_principal_id: Uuid,
        started_utc: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            real_admin_id,
            effective_principal_id,
            started_utc,
            expires_utc: started_utc + ttl,
            deactivated: false,
        }
    }

    /// Session state at the given instant. Deactivation wins over expiry.
    pub fn state(&self, now: DateTime<Utc>) -> SessionState {
        if self.deactivated {
            SessionState::Deactivated
        } else if now > self.expires_utc {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == SessionState::Active
    }

    /// Explicitly end the session.
    pub fn deactivate(&mut self) {
        self.deactivated = true;
    }
}

//! Decision types - the only thing callers ever see from the engine.

use serde::{Deserialize, Serialize};

/// Why a request was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    SystemAdmin,
    ResourceCreator,
    ScopeAdmin,
    AssociationRead,
    PublishedRead,
}

impl AllowReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowReason::SystemAdmin => "system_admin",
            AllowReason::ResourceCreator => "resource_creator",
            AllowReason::ScopeAdmin => "scope_admin",
            AllowReason::AssociationRead => "association_read",
            AllowReason::PublishedRead => "published_read",
        }
    }
}

/// Why a request was denied. Reason codes are for logging and audit; the
/// calling layer reports "forbidden" either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    PrincipalNotFound,
    PrincipalInactive,
    UnknownRole,
    UnknownResourceType,
    TestModeRestricted,
    OutOfScope,
    NotPublished,
    LookupFailed,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::PrincipalNotFound => "principal_not_found",
            DenyReason::PrincipalInactive => "principal_inactive",
            DenyReason::UnknownRole => "unknown_role",
            DenyReason::UnknownResourceType => "unknown_resource_type",
            DenyReason::TestModeRestricted => "test_mode_restricted",
            DenyReason::OutOfScope => "out_of_scope",
            DenyReason::NotPublished => "not_published",
            DenyReason::LookupFailed => "lookup_failed",
        }
    }
}

/// An authorization decision with its reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Allow(_) => "allow",
            Decision::Deny(_) => "deny",
        }
    }

    pub fn reason_code(&self) -> &'static str {
        match self {
            Decision::Allow(r) => r.as_str(),
            Decision::Deny(r) => r.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_and_reason_codes() {
        let allow = Decision::Allow(AllowReason::SystemAdmin);
        let deny = Decision::Deny(DenyReason::OutOfScope);
        assert!(allow.is_allowed());
        assert!(!deny.is_allowed());
        assert_eq!(allow.outcome(), "allow");
        assert_eq!(deny.outcome(), "deny");
        assert_eq!(allow.reason_code(), "system_admin");
        assert_eq!(deny.reason_code(), "out_of_scope");
    }
}

//! Resource descriptors and actions - what the resource layer hands the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::error::AuthzError;

/// Known protected content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Question,
    Paper,
    MockExam,
    Material,
    License,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Question => "question",
            ResourceKind::Paper => "paper",
            ResourceKind::MockExam => "mock_exam",
            ResourceKind::Material => "material",
            ResourceKind::License => "license",
        }
    }

    /// Parse a resource type code. Unknown types deny downstream.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "question" => Some(ResourceKind::Question),
            "paper" => Some(ResourceKind::Paper),
            "mock_exam" => Some(ResourceKind::MockExam),
            "material" => Some(ResourceKind::Material),
            "license" => Some(ResourceKind::License),
            _ => None,
        }
    }
}

/// Actions a caller can request on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    UpdateOwn,
    DeleteOwn,
    ActivateTestMode,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::UpdateOwn => "update_own",
            Action::DeleteOwn => "delete_own",
            Action::ActivateTestMode => "activate_test_mode",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Action::Read),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "update_own" => Some(Action::UpdateOwn),
            "delete_own" => Some(Action::DeleteOwn),
            "activate_test_mode" => Some(Action::ActivateTestMode),
            _ => None,
        }
    }

    /// Actions a resource creator may perform on their own resource,
    /// independent of current scope.
    pub fn is_ownership_scoped(&self) -> bool {
        matches!(self, Action::Read | Action::UpdateOwn | Action::DeleteOwn)
    }
}

/// Resource descriptor supplied by the resource layer on every check.
///
/// The engine trusts this metadata and does no independent verification of
/// it. node_id is the owning org node; it is absent for targets that live
/// outside the organization tree (e.g. a principal named in a test-mode
/// activation check). published is the resource's own publication state and
/// gates student/parent reads only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub resource_type: String,
    pub resource_id: Uuid,
    pub node_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub published: bool,
}

impl ResourceDescriptor {
    /// Create a descriptor for a content resource owned by an org node.
    pub fn new(kind: ResourceKind, resource_id: Uuid, node_id: Uuid) -> Self {
        Self {
            resource_type: kind.as_str().to_string(),
            resource_id,
            node_id: Some(node_id),
            creator_id: None,
            published: false,
        }
    }

    /// Descriptor for a principal targeted by a test-mode activation check.
    pub fn principal_target(principal_id: Uuid) -> Self {
        Self {
            resource_type: "principal".to_string(),
            resource_id: principal_id,
            node_id: None,
            creator_id: None,
            published: false,
        }
    }

    pub fn with_creator(mut self, creator_id: Uuid) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Get the known resource kind, if any.
    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::parse(&self.resource_type)
    }

    /// Reject structurally malformed descriptors.
    ///
    /// A malformed descriptor is a caller bug, not a permission question, so
    /// this is the one condition the engine surfaces as an error instead of
    /// a deny.
    pub fn validate(&self) -> Result<(), AuthzError> {
        if self.resource_type.trim().is_empty() {
            return Err(AuthzError::MalformedDescriptor(
                "resource_type is empty".to_string(),
            ));
        }
        if self.resource_id.is_nil() {
            return Err(AuthzError::MalformedDescriptor(
                "resource_id is nil".to_string(),
            ));
        }
        if matches!(self.node_id, Some(id) if id.is_nil()) {
            return Err(AuthzError::MalformedDescriptor(
                "owning node_id is nil".to_string(),
            ));
        }
        Ok(())
    }
}

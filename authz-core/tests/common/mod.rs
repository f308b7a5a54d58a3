//! Test helper module for the authorization engine integration tests.
//!
//! Builds a seeded two-company world:
//!
//! ```text
//! Company A ─ School X ─ Branch X1 ─ Dept X1 Math
//!           └ School Y
//! Company B ─ School B1
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use authz_core::config::TestModeConfig;
use authz_core::directory::MemoryDirectory;
use authz_core::models::{
    AdminLevel, EntityUser, OrgNode, Principal, ResourceDescriptor, ResourceKind, RoleKind,
};
use authz_core::services::{CapabilityEvaluator, MemoryAuditSink};
use uuid::Uuid;

/// Seeded world with an engine wired to in-memory collaborators.
pub struct TestWorld {
    pub directory: Arc<MemoryDirectory>,
    pub audit: Arc<MemoryAuditSink>,
    pub evaluator: CapabilityEvaluator,
    pub company_a: OrgNode,
    pub school_x: OrgNode,
    pub school_y: OrgNode,
    pub branch_x1: OrgNode,
    pub dept_x1: OrgNode,
    pub company_b: OrgNode,
    pub school_b1: OrgNode,
}

impl TestWorld {
    pub fn new() -> Self {
        let directory = Arc::new(MemoryDirectory::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let evaluator = CapabilityEvaluator::new(
            directory.clone(),
            audit.clone(),
            &TestModeConfig::default(),
        );

        let company_a = OrgNode::company("Company A".to_string());
        let school_x = OrgNode::school(&company_a, "School X".to_string());
        let school_y = OrgNode::school(&company_a, "School Y".to_string());
        let branch_x1 = OrgNode::branch(&school_x, "Branch X1".to_string());
        let dept_x1 = OrgNode::department(&branch_x1, "Dept X1 Math".to_string());
        let company_b = OrgNode::company("Company B".to_string());
        let school_b1 = OrgNode::school(&company_b, "School B1".to_string());

        for node in [
            &company_a, &school_x, &school_y, &branch_x1, &dept_x1, &company_b, &school_b1,
        ] {
            directory.insert_node(node.clone());
        }

        Self {
            directory,
            audit,
            evaluator,
            company_a,
            school_x,
            school_y,
            branch_x1,
            dept_x1,
            company_b,
            school_b1,
        }
    }

    fn add_principal(&self, role: RoleKind) -> Uuid {
        let principal = Principal::new(format!("subject-{}", Uuid::new_v4()), role);
        let id = principal.principal_id;
        self.directory.insert_principal(principal);
        id
    }

    pub fn add_system_admin(&self) -> Uuid {
        self.add_principal(RoleKind::SystemAdmin)
    }

    /// Entity-wide admin with the company admin flag.
    pub fn add_company_admin(&self, company: &OrgNode) -> Uuid {
        let id = self.add_principal(RoleKind::EntityUser);
        self.directory.insert_entity_user(EntityUser::new(
            id,
            company.company_id,
            AdminLevel::EntityAdmin,
            true,
        ));
        id
    }

    /// School-scoped admin assigned to the given schools.
    pub fn add_school_admin(&self, company: &OrgNode, schools: &[&OrgNode]) -> Uuid {
        let id = self.add_principal(RoleKind::EntityUser);
        self.directory.insert_entity_user(EntityUser::new(
            id,
            company.company_id,
            AdminLevel::SchoolAdmin,
            false,
        ));
        for school in schools {
            self.directory.assign_scope(id, school.node_id);
        }
        id
    }

    /// Branch-scoped admin assigned to the given branches.
    pub fn add_branch_admin(&self, company: &OrgNode, branches: &[&OrgNode]) -> Uuid {
        let id = self.add_principal(RoleKind::EntityUser);
        self.directory.insert_entity_user(EntityUser::new(
            id,
            company.company_id,
            AdminLevel::BranchAdmin,
            false,
        ));
        for branch in branches {
            self.directory.assign_scope(id, branch.node_id);
        }
        id
    }

    fn add_associated(&self, role: RoleKind, school: &OrgNode) -> Uuid {
        let mut principal = Principal::new(format!("subject-{}", Uuid::new_v4()), role);
        principal.school_id = school.school_id;
        let id = principal.principal_id;
        self.directory.insert_principal(principal);
        id
    }

    pub fn add_teacher(&self, school: &OrgNode) -> Uuid {
        self.add_associated(RoleKind::Teacher, school)
    }

    pub fn add_student(&self, school: &OrgNode) -> Uuid {
        self.add_associated(RoleKind::Student, school)
    }

    pub fn add_parent(&self, school: &OrgNode) -> Uuid {
        self.add_associated(RoleKind::Parent, school)
    }

    /// A published question owned by the given node.
    pub fn question_at(&self, node: &OrgNode) -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceKind::Question, Uuid::new_v4(), node.node_id)
            .with_published(true)
    }

    /// An unpublished material owned by the given node.
    pub fn draft_material_at(&self, node: &OrgNode) -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceKind::Material, Uuid::new_v4(), node.node_id)
    }
}

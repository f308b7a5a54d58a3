//! Integration tests for test mode impersonation.

mod common;

use authz_core::models::{
    Action, AllowReason, Decision, DenyReason, ImpersonationSession,
};
use authz_core::services::{AuthzError, RequestContext};
use chrono::{Duration, Utc};
use common::TestWorld;
use uuid::Uuid;

// ============================================================================
// Activation
// ============================================================================

#[tokio::test]
async fn activation_is_restricted_to_system_admins() {
    let world = TestWorld::new();
    let entity_admin = world.add_company_admin(&world.company_a);
    let teacher = world.add_teacher(&world.school_x);
    let mut ctx = RequestContext::new();

    let result = world
        .evaluator
        .activate_test_mode(&mut ctx, entity_admin, teacher)
        .await;
    assert!(matches!(result, Err(AuthzError::ActivationDenied(_))));
    assert!(ctx.impersonation().is_none());
}

#[tokio::test]
async fn activation_requires_an_active_target() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let teacher = world.add_teacher(&world.school_x);
    world.directory.set_principal_active(teacher, false);
    let mut ctx = RequestContext::new();

    let inactive = world
        .evaluator
        .activate_test_mode(&mut ctx, admin, teacher)
        .await;
    assert!(matches!(inactive, Err(AuthzError::ActivationDenied(_))));

    let missing = world
        .evaluator
        .activate_test_mode(&mut ctx, admin, Uuid::new_v4())
        .await;
    assert!(matches!(missing, Err(AuthzError::ActivationDenied(_))));
}

#[tokio::test]
async fn activation_writes_a_session_started_record() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let teacher = world.add_teacher(&world.school_x);
    let mut ctx = RequestContext::new();

    let session = world
        .evaluator
        .activate_test_mode(&mut ctx, admin, teacher)
        .await
        .unwrap();
    assert_eq!(session.real_admin_id, admin);
    assert_eq!(session.effective_principal_id, teacher);
    assert_eq!(session.expires_utc - session.started_utc, Duration::minutes(5));
    assert_eq!(world.audit.count_events("test_mode_started").await, 1);
}

#[tokio::test]
async fn sessions_cannot_nest() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let teacher = world.add_teacher(&world.school_x);
    let student = world.add_student(&world.school_x);
    let mut ctx = RequestContext::new();

    world
        .evaluator
        .activate_test_mode(&mut ctx, admin, teacher)
        .await
        .unwrap();

    // The gate now evaluates the effective principal, which is no admin.
    let nested = world
        .evaluator
        .activate_test_mode(&mut ctx, admin, student)
        .await;
    assert!(matches!(nested, Err(AuthzError::ActivationDenied(_))));
}

// ============================================================================
// Substitution
// ============================================================================

#[tokio::test]
async fn impersonated_decisions_match_direct_decisions() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let school_admin = world.add_school_admin(&world.company_a, &[&world.school_x]);

    let cases = [
        (Action::Read, world.question_at(&world.school_x)),
        (Action::Update, world.question_at(&world.dept_x1)),
        (Action::Read, world.question_at(&world.school_y)),
        (Action::Delete, world.question_at(&world.school_b1)),
    ];

    for (action, resource) in &cases {
        let mut direct_ctx = RequestContext::new();
        let direct = world
            .evaluator
            .can(&mut direct_ctx, school_admin, *action, resource)
            .await
            .unwrap();

        let mut imp_ctx = RequestContext::new();
        world
            .evaluator
            .activate_test_mode(&mut imp_ctx, admin, school_admin)
            .await
            .unwrap();
        let impersonated = world
            .evaluator
            .can(&mut imp_ctx, admin, *action, resource)
            .await
            .unwrap();

        assert_eq!(direct, impersonated);
    }
}

#[tokio::test]
async fn impersonation_never_adds_privileges() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let student = world.add_student(&world.school_x);
    let mut ctx = RequestContext::new();

    world
        .evaluator
        .activate_test_mode(&mut ctx, admin, student)
        .await
        .unwrap();

    // The real caller is a system admin, but the effective principal rules.
    let write = world
        .evaluator
        .can(&mut ctx, admin, Action::Delete, &world.question_at(&world.school_x))
        .await
        .unwrap();
    assert_eq!(write, Decision::Deny(DenyReason::OutOfScope));
}

#[tokio::test]
async fn every_impersonated_call_produces_one_audit_record() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let school_admin = world.add_school_admin(&world.company_a, &[&world.school_x]);
    let mut ctx = RequestContext::new();

    world
        .evaluator
        .activate_test_mode(&mut ctx, admin, school_admin)
        .await
        .unwrap();

    for _ in 0..3 {
        world
            .evaluator
            .can(&mut ctx, admin, Action::Read, &world.question_at(&world.school_x))
            .await
            .unwrap();
    }
    world
        .evaluator
        .can(&mut ctx, admin, Action::Read, &world.question_at(&world.school_y))
        .await
        .unwrap();

    let records = world.audit.records().await;
    let decisions: Vec<_> = records.iter().filter(|r| r.event_code == "decision").collect();
    assert_eq!(decisions.len(), 4);
    for record in decisions {
        assert_eq!(record.actor_id, admin);
        assert_eq!(record.effective_principal_id, Some(school_admin));
    }
}

#[tokio::test]
async fn scope_resolution_is_substituted_too() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let school_admin = world.add_school_admin(&world.company_a, &[&world.school_x]);
    let mut ctx = RequestContext::new();

    world
        .evaluator
        .activate_test_mode(&mut ctx, admin, school_admin)
        .await
        .unwrap();

    let scope = world.evaluator.resolve_scope(&mut ctx, admin).await;
    assert!(!scope.is_universal());
    assert!(scope.contains_node(&world.school_x));
    assert!(!scope.contains_node(&world.school_y));
}

// ============================================================================
// Expiry & Deactivation
// ============================================================================

#[tokio::test]
async fn expired_session_reverts_to_the_real_principal() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let school_admin = world.add_school_admin(&world.company_a, &[&world.school_x]);
    let mut ctx = RequestContext::new();

    // 301 seconds into a 5 minute session.
    ctx.set_impersonation(ImpersonationSession::new_at(
        admin,
        school_admin,
        Utc::now() - Duration::seconds(301),
        Duration::minutes(5),
    ));

    let decision = world
        .evaluator
        .can(&mut ctx, admin, Action::Read, &world.question_at(&world.school_y))
        .await
        .unwrap();
    // The school admin would be denied here; the reverted admin is not.
    assert_eq!(decision, Decision::Allow(AllowReason::SystemAdmin));

    // The expiry itself is audited once, and no impersonated decision is.
    assert_eq!(world.audit.count_events("test_mode_expired").await, 1);
    assert_eq!(world.audit.count_events("decision").await, 0);

    // A second call does not re-record the expiry.
    world
        .evaluator
        .can(&mut ctx, admin, Action::Read, &world.question_at(&world.school_y))
        .await
        .unwrap();
    assert_eq!(world.audit.count_events("test_mode_expired").await, 1);
}

#[tokio::test]
async fn session_is_still_active_at_the_ttl_boundary() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let school_admin = world.add_school_admin(&world.company_a, &[&world.school_x]);
    let mut ctx = RequestContext::new();

    ctx.set_impersonation(ImpersonationSession::new_at(
        admin,
        school_admin,
        Utc::now() - Duration::seconds(299),
        Duration::minutes(5),
    ));

    let decision = world
        .evaluator
        .can(&mut ctx, admin, Action::Read, &world.question_at(&world.school_y))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Deny(DenyReason::OutOfScope));
}

#[tokio::test]
async fn deactivation_ends_the_session_immediately() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let teacher = world.add_teacher(&world.school_x);
    let mut ctx = RequestContext::new();

    world
        .evaluator
        .activate_test_mode(&mut ctx, admin, teacher)
        .await
        .unwrap();
    let ended = world.evaluator.deactivate_test_mode(&mut ctx).await;
    assert!(ended.is_some());
    assert_eq!(world.audit.count_events("test_mode_ended").await, 1);

    let decision = world
        .evaluator
        .can(&mut ctx, admin, Action::Delete, &world.question_at(&world.school_b1))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow(AllowReason::SystemAdmin));
}

#[tokio::test]
async fn deactivating_without_a_session_is_a_no_op() {
    let world = TestWorld::new();
    let mut ctx = RequestContext::new();
    assert!(world.evaluator.deactivate_test_mode(&mut ctx).await.is_none());
    assert!(world.audit.records().await.is_empty());
}

#[tokio::test]
async fn a_session_for_another_actor_does_not_substitute() {
    let world = TestWorld::new();
    let admin = world.add_system_admin();
    let other_admin = world.add_system_admin();
    let teacher = world.add_teacher(&world.school_x);
    let mut ctx = RequestContext::new();

    world
        .evaluator
        .activate_test_mode(&mut ctx, admin, teacher)
        .await
        .unwrap();

    // A different caller evaluated under the same context keeps its own
    // identity and produces no impersonated audit record.
    let decision = world
        .evaluator
        .can(
            &mut ctx,
            other_admin,
            Action::Delete,
            &world.question_at(&world.school_b1),
        )
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow(AllowReason::SystemAdmin));
    assert_eq!(world.audit.count_events("decision").await, 0);
}

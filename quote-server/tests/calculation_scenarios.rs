//! End-to-end calculation scenarios against a fully wired server state.

use quote_server::core::{Config, ServerState};
use quote_server::registry::PromoCodeRegistry;
use quote_server::utils::AppError;
use shared::models::{
    ApprovalDecision, ApprovalPolicy, ApprovalStatus, LoyaltyAccount, LoyaltyProgram, PromoCode,
    RoleLimit, SeasonalCampaign, UserRole, VolumeTier, VolumeTierTable,
};
use shared::quote::{
    CalculationContext, DiscountSource, DiscountType, ManualDiscount, QualityTier, ReasonCode,
    ServiceRequest, SurfaceCondition, TrailStatus,
};
use shared::types::now_millis;

fn make_state() -> ServerState {
    ServerState::initialize(&Config::with_overrides(0, 0.08))
}

fn make_context(org_id: &str) -> CalculationContext {
    CalculationContext {
        org_id: org_id.into(),
        proposal_id: Some("prop-1".into()),
        services: vec![ServiceRequest {
            service_id: "pressure-wash".into(),
            quantity: 2000.0,
            unit_rate: 5.0,
            unit: Some("sqft".into()),
        }],
        tier: QualityTier::Standard,
        condition: SurfaceCondition::Good,
        client_id: Some("client-1".into()),
        client_email: None,
        is_new_customer: false,
        promo_code: None,
        manual_discount: None,
        redeem_points: None,
        user_id: "sales-1".into(),
        user_role: UserRole::Sales,
    }
}

fn save10(org_id: &str) -> PromoCode {
    PromoCode {
        id: "pc-1".into(),
        org_id: org_id.into(),
        code: "SAVE10".into(),
        description: None,
        discount_type: DiscountType::Percentage,
        value: 10.0,
        starts_at: None,
        expires_at: None,
        max_uses: None,
        use_count: 0,
        max_uses_per_customer: None,
        min_order_amount: None,
        max_discount_amount: None,
        allowed_service_ids: None,
        allowed_tiers: None,
        is_active: true,
        created_at: 0,
    }
}

fn campaign(org_id: &str, id: &str, name: &str, percent: f64) -> SeasonalCampaign {
    let now = now_millis();
    SeasonalCampaign {
        id: id.into(),
        org_id: org_id.into(),
        name: name.into(),
        discount_type: DiscountType::Percentage,
        value: percent,
        max_discount_amount: None,
        starts_at: now - 86_400_000,
        ends_at: now + 86_400_000,
        is_active: true,
        created_at: 0,
    }
}

fn sales_capped_policy(org_id: &str) -> ApprovalPolicy {
    ApprovalPolicy {
        org_id: org_id.into(),
        min_reviewer_role: UserRole::Manager,
        max_discount_ratio: None,
        role_limits: vec![RoleLimit {
            role: UserRole::Sales,
            max_discount_percent: Some(20.0),
            max_discount_amount: None,
        }],
    }
}

// Scenario A: simple promo code on a $10,000 proposal
#[tokio::test]
async fn test_promo_code_discount_and_tax() {
    let state = make_state();
    state.promo_codes.insert(save10("org-a"));

    let mut ctx = make_context("org-a");
    ctx.promo_code = Some("SAVE10".into());

    let result = state.engine.calculate(&ctx).await.unwrap();

    assert_eq!(result.subtotal, 10_000.0);
    assert_eq!(result.discounts.discount_total, 1_000.0);
    assert_eq!(result.discounts.after_discount, 9_000.0);
    assert_eq!(result.tax_amount, 720.0);
    assert_eq!(result.total, 9_720.0);
    assert!(!result.provisional);
}

// Scenario B: manual override wins the primary slot
#[tokio::test]
async fn test_manual_override_supersedes_promo_code() {
    let state = make_state();
    state.promo_codes.insert(save10("org-b"));

    let mut ctx = make_context("org-b");
    ctx.promo_code = Some("SAVE10".into());
    ctx.manual_discount = Some(ManualDiscount {
        percent: Some(5.0),
        amount: None,
    });

    let result = state.engine.calculate(&ctx).await.unwrap();

    assert_eq!(result.discounts.discount_total, 500.0);
    assert_eq!(result.discounts.applied.len(), 1);
    assert_eq!(
        result.discounts.applied[0].candidate.source,
        DiscountSource::Manual
    );

    let superseded = result
        .trail
        .iter()
        .find(|e| e.source == DiscountSource::PromoCode && e.status == TrailStatus::Superseded)
        .expect("promo code should be superseded");
    assert_eq!(superseded.reason, ReasonCode::SupersededByManual);
}

// Scenario C: minimum order not met leaves a rejection in the trail
#[tokio::test]
async fn test_min_order_not_met_yields_no_discount() {
    let state = make_state();
    let mut code = save10("org-c");
    code.min_order_amount = Some(1_000.0);
    state.promo_codes.insert(code);

    let mut ctx = make_context("org-c");
    ctx.services = vec![ServiceRequest {
        service_id: "pressure-wash".into(),
        quantity: 100.0,
        unit_rate: 5.0,
        unit: None,
    }];
    ctx.promo_code = Some("SAVE10".into());

    let result = state.engine.calculate(&ctx).await.unwrap();

    assert_eq!(result.subtotal, 500.0);
    assert_eq!(result.discounts.discount_total, 0.0);
    assert_eq!(result.total, 540.0);

    let entry = result
        .trail
        .iter()
        .find(|e| e.source == DiscountSource::PromoCode)
        .unwrap();
    assert_eq!(entry.status, TrailStatus::Rejected);
    assert_eq!(entry.reason, ReasonCode::MinOrderNotMet);
}

// Scenario D: a discount past the role ceiling goes through approval
#[tokio::test]
async fn test_approval_workflow_end_to_end() {
    let state = make_state();
    state.policies.set_policy(sales_capped_policy("org-d"));

    let mut ctx = make_context("org-d");
    ctx.manual_discount = Some(ManualDiscount {
        percent: Some(40.0),
        amount: None,
    });

    let result = state.engine.calculate(&ctx).await.unwrap();
    assert!(result.provisional);
    let requirement = result.approval_required.clone().unwrap();
    assert_eq!(requirement.discount_percent, 40.0);
    assert_eq!(requirement.exceeded, "role-percent");

    // Finalization is blocked until a manager approves
    let blocked = state.engine.finalize(&ctx).await;
    assert!(matches!(blocked, Err(AppError::BusinessRule(_))));

    let request = state.approvals.create_request(
        "org-d",
        ctx.proposal_id.clone(),
        &requirement,
        result.subtotal,
        &ctx.user_id,
        ctx.user_role,
    );
    assert_eq!(request.status, ApprovalStatus::Pending);

    let approved = state
        .approvals
        .review(
            &request.id,
            "mgr-1",
            UserRole::Manager,
            ApprovalDecision::Approve,
            None,
        )
        .await
        .unwrap();
    assert_eq!(approved.status, ApprovalStatus::Approved);

    let finalized = state.engine.finalize(&ctx).await.unwrap();
    assert_eq!(finalized.discounts.discount_total, 4_000.0);
}

// Scenario E: overlapping campaigns, the larger one wins
#[tokio::test]
async fn test_overlapping_campaigns_best_wins() {
    let state = make_state();
    state
        .campaigns
        .insert(campaign("org-e", "c-1", "Early Spring", 10.0));
    state
        .campaigns
        .insert(campaign("org-e", "c-2", "Spring Special", 15.0));

    let result = state.engine.calculate(&make_context("org-e")).await.unwrap();

    assert_eq!(result.discounts.discount_total, 1_500.0);
    assert_eq!(result.discounts.applied.len(), 1);
    assert_eq!(result.discounts.applied[0].candidate.reason, "Spring Special");

    let superseded = result
        .trail
        .iter()
        .find(|e| e.source == DiscountSource::Seasonal && e.status == TrailStatus::Superseded)
        .expect("losing campaign should appear superseded");
    assert_eq!(superseded.reason, ReasonCode::Superseded);
}

// Loyalty and volume stack on top of the primary discount
#[tokio::test]
async fn test_loyalty_and_volume_stack_with_promo_code() {
    let state = make_state();
    state.promo_codes.insert(save10("org-f"));
    state.loyalty.set_program(LoyaltyProgram {
        org_id: "org-f".into(),
        point_rate: 0.01,
        min_redeem_points: Some(100),
        is_active: true,
    });
    state.loyalty.set_account(LoyaltyAccount {
        client_id: "client-1".into(),
        org_id: "org-f".into(),
        points_balance: 10_000,
        lifetime_points: 10_000,
        created_at: 0,
    });
    state.volume_tiers.set_table(VolumeTierTable {
        org_id: "org-f".into(),
        tiers: vec![VolumeTier {
            threshold: 5_000.0,
            discount_type: DiscountType::Percentage,
            value: 2.0,
            label: None,
        }],
    });

    let mut ctx = make_context("org-f");
    ctx.promo_code = Some("SAVE10".into());
    ctx.redeem_points = Some(5_000);

    let result = state.engine.calculate(&ctx).await.unwrap();

    // 10% promo ($1,000) + 5,000 points ($50) + 2% volume ($200),
    // each computed against the original $10,000 subtotal
    assert_eq!(result.discounts.discount_total, 1_250.0);
    assert_eq!(result.discounts.applied.len(), 3);
    assert_eq!(result.total, 9_450.0);
}

// Identical contexts produce identical results with no state drift
#[tokio::test]
async fn test_calculation_is_idempotent() {
    let state = make_state();
    state.promo_codes.insert(save10("org-g"));

    let mut ctx = make_context("org-g");
    ctx.promo_code = Some("SAVE10".into());

    let first = state.engine.calculate(&ctx).await.unwrap();
    let second = state.engine.calculate(&ctx).await.unwrap();
    assert_eq!(first, second);

    let code = state
        .promo_codes
        .find("org-g", "SAVE10")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(code.use_count, 0);
}

// Finalization commits usage exactly once, repeats are no-ops
#[tokio::test]
async fn test_finalize_commits_exactly_once() {
    let state = make_state();
    state.promo_codes.insert(save10("org-h"));

    let mut ctx = make_context("org-h");
    ctx.promo_code = Some("SAVE10".into());

    state.engine.finalize(&ctx).await.unwrap();
    state.engine.finalize(&ctx).await.unwrap();

    let code = state
        .promo_codes
        .find("org-h", "SAVE10")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(code.use_count, 1);
}

// Two reviewers race; exactly one decision sticks
#[tokio::test]
async fn test_concurrent_reviews_resolve_once() {
    let state = make_state();
    state.policies.set_policy(sales_capped_policy("org-i"));

    let requirement = shared::quote::ApprovalRequirement {
        discount_percent: 40.0,
        discount_amount: 4_000.0,
        exceeded: "role-percent".to_string(),
    };
    let request = state.approvals.create_request(
        "org-i",
        None,
        &requirement,
        10_000.0,
        "sales-1",
        UserRole::Sales,
    );

    let approvals = state.approvals.clone();
    let id_a = request.id.clone();
    let id_b = request.id.clone();
    let approvals_b = state.approvals.clone();

    let (first, second) = tokio::join!(
        approvals.review(
            &id_a,
            "mgr-1",
            UserRole::Manager,
            ApprovalDecision::Approve,
            None
        ),
        approvals_b.review(
            &id_b,
            "mgr-2",
            UserRole::Manager,
            ApprovalDecision::Reject,
            None
        ),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);

    let stored = state.approvals.get(&request.id).unwrap();
    assert!(stored.is_resolved());
}

// Rejected approval blocks finalization outright
#[tokio::test]
async fn test_rejected_approval_blocks_finalize() {
    let state = make_state();
    state.policies.set_policy(sales_capped_policy("org-j"));

    let mut ctx = make_context("org-j");
    ctx.manual_discount = Some(ManualDiscount {
        percent: Some(40.0),
        amount: None,
    });

    let result = state.engine.calculate(&ctx).await.unwrap();
    let request = state.approvals.create_request(
        "org-j",
        ctx.proposal_id.clone(),
        &result.approval_required.clone().unwrap(),
        result.subtotal,
        &ctx.user_id,
        ctx.user_role,
    );
    state
        .approvals
        .review(
            &request.id,
            "mgr-1",
            UserRole::Manager,
            ApprovalDecision::Reject,
            Some("too deep".into()),
        )
        .await
        .unwrap();

    let blocked = state.engine.finalize(&ctx).await;
    assert!(matches!(blocked, Err(AppError::BusinessRule(_))));
}

// An approval covers the amount it was requested for; deepening the
// discount afterwards must not ride on the old approval
#[tokio::test]
async fn test_deepened_discount_needs_fresh_approval() {
    let state = make_state();
    state.policies.set_policy(sales_capped_policy("org-k"));

    let mut ctx = make_context("org-k");
    ctx.manual_discount = Some(ManualDiscount {
        percent: Some(40.0),
        amount: None,
    });

    let result = state.engine.calculate(&ctx).await.unwrap();
    let request = state.approvals.create_request(
        "org-k",
        ctx.proposal_id.clone(),
        &result.approval_required.clone().unwrap(),
        result.subtotal,
        &ctx.user_id,
        ctx.user_role,
    );
    state
        .approvals
        .review(
            &request.id,
            "mgr-1",
            UserRole::Manager,
            ApprovalDecision::Approve,
            None,
        )
        .await
        .unwrap();

    // The salesperson deepens the discount to 80% on the same proposal
    ctx.manual_discount = Some(ManualDiscount {
        percent: Some(80.0),
        amount: None,
    });

    let blocked = state.engine.finalize(&ctx).await;
    assert!(matches!(blocked, Err(AppError::BusinessRule(_))));
}

// Per-customer usage tracking falls back to the email when the
// customer is not on file yet
#[tokio::test]
async fn test_email_identified_customer_hits_usage_cap() {
    let state = make_state();
    let mut code = save10("org-l");
    code.max_uses_per_customer = Some(1);
    state.promo_codes.insert(code);

    let mut ctx = make_context("org-l");
    ctx.client_id = None;
    ctx.client_email = Some("walk-in@example.com".into());
    ctx.promo_code = Some("SAVE10".into());

    state.engine.finalize(&ctx).await.unwrap();

    // A later proposal for the same email no longer gets the discount
    ctx.proposal_id = Some("prop-2".into());
    let result = state.engine.calculate(&ctx).await.unwrap();
    assert_eq!(result.discounts.discount_total, 0.0);
    let entry = result
        .trail
        .iter()
        .find(|t| t.source == DiscountSource::PromoCode)
        .unwrap();
    assert_eq!(entry.status, TrailStatus::Rejected);
    assert_eq!(entry.reason, ReasonCode::UsageExceeded);
}

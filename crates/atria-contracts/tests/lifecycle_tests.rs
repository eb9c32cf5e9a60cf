mod support;

use atria_contracts::{
    ContractService, Decision, DecisionOutcome, NewContract, NewContractRequest, NewRepayment,
    RepaymentService,
};
use atria_core::{
    ContractCommissionPolicy, ContractFilter, ContractStore, CoreError, NotificationKind, Page,
    RepaymentFilter, RequestFilter,
};
use atria_model::{
    ContractStatus, ContractType, Money, RequestStatus, Role, TOTAL_COMMISSION_BP,
};
use std::sync::atomic::Ordering;
use support::{actor, new_request, world, World};

#[tokio::test]
async fn create_request_persists_pending_and_notifies_the_owner() {
    let World {
        contracts, store, notifier, ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.owner_id.as_str(), "captador-1");
    assert!(request.decided_at.is_none());

    let stored = store
        .get_request(&request.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored, request);

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::RequestReceived);
    assert_eq!(sent[0].user_id.as_str(), "captador-1");
}

#[tokio::test]
async fn create_request_requires_an_existing_property_and_a_message() {
    let World { contracts, .. } = world().await;
    let partner = actor("partner-1", Role::Partner);

    let mut input = new_request("p-ext");
    input.message = "   ".to_string();
    let err = contracts
        .create_request(&partner, input)
        .await
        .expect_err("empty message");
    assert!(matches!(err, CoreError::Validation(_)), "got {err:?}");

    let err = contracts
        .create_request(&partner, new_request("p-missing"))
        .await
        .expect_err("missing property");
    assert!(matches!(err, CoreError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn owner_cannot_request_their_own_property() {
    let World { contracts, .. } = world().await;
    let owner = actor("captador-1", Role::Captador);

    let err = contracts
        .create_request(&owner, new_request("p-ext"))
        .await
        .expect_err("own property");
    assert!(matches!(err, CoreError::Forbidden(_)), "got {err:?}");
}

#[tokio::test]
async fn duplicate_pending_request_conflicts() {
    let World { contracts, .. } = world().await;
    let partner = actor("partner-1", Role::Partner);

    contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("first");
    let err = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect_err("second while pending");
    assert!(matches!(err, CoreError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn approval_of_external_property_creates_a_signed_external_contract() {
    let World {
        contracts, notifier, clock, ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let owner = actor("captador-1", Role::Captador);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    let outcome = contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect("approve");

    let DecisionOutcome::Approved { request, contract } = outcome else {
        panic!("expected approval outcome");
    };
    assert_eq!(request.status, RequestStatus::Approved);
    assert_eq!(contract.contract_type, ContractType::External);
    assert_eq!(
        contract.captador_id.as_ref().map(|c| c.as_str()),
        Some("captador-1")
    );
    assert_eq!(contract.partner_id.as_str(), "partner-1");

    let split = ContractCommissionPolicy::split(ContractType::External);
    assert_eq!(contract.captador_percentage, split.captador);
    assert_eq!(contract.partner_percentage, split.partner);
    assert_eq!(contract.platform_percentage, split.platform);

    // Property price is copied at approval time.
    assert_eq!(contract.property_value, Money::from_cents(30_000_000));
    assert_eq!(contract.total_commission_bp, TOTAL_COMMISSION_BP);
    assert_eq!(contract.status, ContractStatus::Signed);
    assert_eq!(contract.signed_at, Some(clock.now_fixed()));

    let sent = notifier.sent().await;
    assert_eq!(sent.last().expect("notification").kind, NotificationKind::RequestApproved);
    assert_eq!(sent.last().expect("notification").user_id.as_str(), "partner-1");
}

#[tokio::test]
async fn approval_of_platform_property_yields_platform_split_with_no_captador() {
    let World { contracts, .. } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let admin = actor("admin-1", Role::Admin);

    let request = contracts
        .create_request(&partner, new_request("p-plat"))
        .await
        .expect("request");
    let outcome = contracts
        .decide(&admin, &request.id, Decision::Approve)
        .await
        .expect("approve");

    let DecisionOutcome::Approved { contract, .. } = outcome else {
        panic!("expected approval outcome");
    };
    assert_eq!(contract.contract_type, ContractType::Platform);
    assert!(contract.captador_id.is_none());
    assert_eq!(contract.captador_percentage, 0);
    assert_eq!(contract.partner_percentage, 50);
    assert_eq!(contract.platform_percentage, 50);
    assert_eq!(contract.property_value, Money::from_cents(50_000_000));
}

#[tokio::test]
async fn rejection_is_terminal_and_carries_the_reason() {
    let World {
        contracts, notifier, ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let owner = actor("captador-1", Role::Captador);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    let outcome = contracts
        .decide(
            &owner,
            &request.id,
            Decision::Reject {
                reason: Some("already represented".to_string()),
            },
        )
        .await
        .expect("reject");
    let DecisionOutcome::Rejected { request } = outcome else {
        panic!("expected rejection outcome");
    };
    assert_eq!(request.status, RequestStatus::Rejected);

    let sent = notifier.sent().await;
    let last = sent.last().expect("notification");
    assert_eq!(last.kind, NotificationKind::RequestRejected);
    assert!(last.message.contains("already represented"));

    // Terminal: a second decision must not go through.
    let err = contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect_err("terminal");
    assert!(matches!(err, CoreError::InvalidState(_)), "got {err:?}");
}

#[tokio::test]
async fn deciding_twice_cannot_create_a_second_contract() {
    let World {
        contracts, store, ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let owner = actor("captador-1", Role::Captador);
    let admin = actor("admin-1", Role::Admin);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect("approve");

    let err = contracts
        .decide(&admin, &request.id, Decision::Approve)
        .await
        .expect_err("second decision");
    assert!(matches!(err, CoreError::InvalidState(_)), "got {err:?}");

    let all = store
        .list_contracts(&ContractFilter::default(), &Page::default())
        .await
        .expect("contracts");
    assert_eq!(all.len(), 1, "exactly one contract exists");
}

#[tokio::test]
async fn unauthorized_actor_cannot_decide_and_leaves_the_request_pending() {
    let World {
        contracts, store, ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let stranger = actor("partner-2", Role::Partner);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    let err = contracts
        .decide(&stranger, &request.id, Decision::Approve)
        .await
        .expect_err("stranger");
    assert!(matches!(err, CoreError::Forbidden(_)), "got {err:?}");

    let stored = store
        .get_request(&request.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.status, RequestStatus::Pending);
}

#[tokio::test]
async fn failed_contract_write_leaves_the_request_pending() {
    let World {
        contracts, store, ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let owner = actor("captador-1", Role::Captador);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    store.fail_contract_inserts.store(true, Ordering::Relaxed);

    let err = contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect_err("storage fault");
    assert!(matches!(err, CoreError::Dependency(_)), "got {err:?}");

    let stored = store
        .get_request(&request.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.status, RequestStatus::Pending, "no half-approved state");

    // Once storage recovers the same request can still be approved.
    store.fail_contract_inserts.store(false, Ordering::Relaxed);
    contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect("approve after recovery");
}

#[tokio::test]
async fn notification_failure_does_not_roll_back_request_creation() {
    let World {
        contracts, store, notifier, ..
    } = world().await;
    notifier.fail.store(true, Ordering::Relaxed);
    let partner = actor("partner-1", Role::Partner);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request despite sink failure");
    assert!(store
        .get_request(&request.id)
        .await
        .expect("get")
        .is_some());
}

#[tokio::test]
async fn direct_contract_creation_applies_the_same_policy() {
    let World { contracts, .. } = world().await;
    let owner = actor("captador-1", Role::Captador);

    let contract = contracts
        .create_contract(
            &owner,
            NewContract {
                property_id: atria_model::PropertyId::parse("p-ext").expect("id"),
                partner_id: atria_model::UserId::parse("partner-3").expect("id"),
                contract_type: Some(ContractType::External),
                terms_and_conditions: Some("standard terms".to_string()),
            },
        )
        .await
        .expect("contract");
    assert_eq!(contract.contract_type, ContractType::External);
    assert_eq!(contract.captador_percentage, 30);
    assert_eq!(contract.status, ContractStatus::Signed);

    // A declared type that contradicts the property origin is refused.
    let err = contracts
        .create_contract(
            &owner,
            NewContract {
                property_id: atria_model::PropertyId::parse("p-ext").expect("id"),
                partner_id: atria_model::UserId::parse("partner-4").expect("id"),
                contract_type: Some(ContractType::Platform),
                terms_and_conditions: None,
            },
        )
        .await
        .expect_err("type mismatch");
    assert!(matches!(err, CoreError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn listing_is_scoped_for_non_admins() {
    let World { contracts, .. } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let other = actor("partner-2", Role::Partner);
    let owner = actor("captador-1", Role::Captador);
    let admin = actor("admin-1", Role::Admin);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect("approve");

    let mine = contracts
        .list_contracts(&partner, ContractFilter::default(), &Page::default())
        .await
        .expect("list");
    assert_eq!(mine.len(), 1);

    let theirs = contracts
        .list_contracts(&other, ContractFilter::default(), &Page::default())
        .await
        .expect("list");
    assert!(theirs.is_empty());

    let all = contracts
        .list_contracts(&admin, ContractFilter::default(), &Page::default())
        .await
        .expect("list");
    assert_eq!(all.len(), 1);

    let visible = contracts
        .list_requests(&other, RequestFilter::default(), &Page::default())
        .await
        .expect("requests");
    assert!(visible.is_empty());
}

#[tokio::test]
async fn stats_reflect_only_contracts_visible_to_the_caller() {
    let World { contracts, .. } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let owner = actor("captador-1", Role::Captador);
    let admin = actor("admin-1", Role::Admin);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect("approve");

    let admin_stats = contracts.stats(&admin).await.expect("stats");
    assert_eq!(admin_stats.total, 1);
    assert_eq!(admin_stats.signed, 1);
    assert_eq!(admin_stats.total_commission, Money::from_cents(1_500_000));

    let stranger = actor("partner-9", Role::Partner);
    let none = contracts.stats(&stranger).await.expect("stats");
    assert_eq!(none.total, 0);
    assert_eq!(none.total_commission, Money::ZERO);
}

#[tokio::test]
async fn repayments_require_a_captador_and_an_admin() {
    let World {
        contracts,
        repayments,
        clock,
        ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let owner = actor("captador-1", Role::Captador);
    let admin = actor("admin-1", Role::Admin);

    let request = contracts
        .create_request(&partner, new_request("p-ext"))
        .await
        .expect("request");
    let DecisionOutcome::Approved { contract, .. } = contracts
        .decide(&owner, &request.id, Decision::Approve)
        .await
        .expect("approve")
    else {
        panic!("expected approval outcome");
    };

    let err = repayments
        .create_repayment(
            &owner,
            NewRepayment {
                contract_id: contract.id.clone(),
                property_id: contract.property_id.clone(),
                amount_due: Money::from_cents(450_000),
                due_date: None,
            },
        )
        .await
        .expect_err("non-admin");
    assert!(matches!(err, CoreError::Forbidden(_)), "got {err:?}");

    let repayment = repayments
        .create_repayment(
            &admin,
            NewRepayment {
                contract_id: contract.id.clone(),
                property_id: contract.property_id.clone(),
                amount_due: Money::from_cents(450_000),
                due_date: None,
            },
        )
        .await
        .expect("repayment");
    assert_eq!(
        repayment.captador_id.as_ref().map(|c| c.as_str()),
        Some("captador-1")
    );
    assert_eq!(repayment.due_date, clock.now_fixed());

    // The captador sees their own repayments; another captador sees none
    // and may not ask for someone else's.
    let own = repayments
        .list_repayments(&owner, RepaymentFilter::default(), &Page::default())
        .await
        .expect("own");
    assert_eq!(own.len(), 1);

    let other = actor("captador-2", Role::Captador);
    let none = repayments
        .list_repayments(&other, RepaymentFilter::default(), &Page::default())
        .await
        .expect("none");
    assert!(none.is_empty());

    let err = repayments
        .list_repayments(
            &other,
            RepaymentFilter {
                captador_id: Some(atria_model::UserId::parse("captador-1").expect("id")),
                ..RepaymentFilter::default()
            },
            &Page::default(),
        )
        .await
        .expect_err("cross-captador listing");
    assert!(matches!(err, CoreError::Forbidden(_)), "got {err:?}");
}

#[tokio::test]
async fn repayment_against_a_platform_contract_is_refused() {
    let World {
        contracts,
        repayments,
        ..
    } = world().await;
    let partner = actor("partner-1", Role::Partner);
    let admin = actor("admin-1", Role::Admin);

    let request = contracts
        .create_request(&partner, new_request("p-plat"))
        .await
        .expect("request");
    let DecisionOutcome::Approved { contract, .. } = contracts
        .decide(&admin, &request.id, Decision::Approve)
        .await
        .expect("approve")
    else {
        panic!("expected approval outcome");
    };
    assert!(contract.captador_id.is_none());

    let err = repayments
        .create_repayment(
            &admin,
            NewRepayment {
                contract_id: contract.id.clone(),
                property_id: contract.property_id.clone(),
                amount_due: Money::from_cents(125_000),
                due_date: None,
            },
        )
        .await
        .expect_err("no captador to repay");
    assert!(matches!(err, CoreError::Validation(_)), "got {err:?}");
}

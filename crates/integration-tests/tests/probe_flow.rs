//! End-to-end probe runs against a well-behaved mock API.
//!
//! These tests verify that every step passes when the API behaves, and that
//! the cart cycle leaves the server-side cart as it found it.

use serde_json::Value;
use shop_probe::{Identity, ProbeConfig, ProbeRunner};
use shop_probe_core::{Email, ProductId, Step, StepOutcome};
use shop_probe_integration_tests::MockShopApi;

fn runner_for(api: &MockShopApi) -> ProbeRunner {
    let config = ProbeConfig::new(&api.base_url()).expect("mock URL is valid");
    ProbeRunner::new(&config).expect("client builds")
}

fn fixed_identity() -> Identity {
    Identity::new(
        Email::parse("user_abc123@demo.com").expect("valid email"),
        "Test1234",
    )
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_full_cycle_passes() {
    let api = MockShopApi::start().await.expect("mock starts");
    let report = runner_for(&api).run_as(&fixed_identity()).await;

    let steps: Vec<Step> = report.steps.iter().map(|result| result.step).collect();
    assert_eq!(
        steps,
        vec![
            Step::SwaggerReachable,
            Step::Register,
            Step::Login,
            Step::AddToCart,
            Step::QueryCart,
            Step::DeleteCartItem,
            Step::VerifyCartEmpty,
        ]
    );
    assert!(report.all_passed(), "report: {report:#?}");
    assert!(!report.aborted);
    assert!(!report.cart_skipped);
}

#[tokio::test]
async fn test_query_detail_shows_added_line() {
    let api = MockShopApi::start().await.expect("mock starts");
    let report = runner_for(&api).run_as(&fixed_identity()).await;

    let query = report.get(Step::QueryCart).expect("query step ran");
    let detail = query.detail.as_deref().expect("query has a detail");
    let body: Value = serde_json::from_str(detail).expect("detail is JSON");
    let lines = body.as_array().expect("cart is an array");

    assert_eq!(lines.len(), 1);
    let line = lines.first().expect("one line");
    assert_eq!(line["productId"], 101);
    assert_eq!(line["quantity"], 2);

    // Non-ASCII product names are printed verbatim
    assert!(detail.contains("USB-C 数据线"), "detail: {detail}");
}

#[tokio::test]
async fn test_register_detail_is_email() {
    let api = MockShopApi::start().await.expect("mock starts");
    let report = runner_for(&api).run_as(&fixed_identity()).await;

    let register = report.get(Step::Register).expect("register step ran");
    assert_eq!(register.detail.as_deref(), Some("user_abc123@demo.com"));
    assert_eq!(
        register.to_string(),
        "✅ User registration user_abc123@demo.com"
    );
}

#[tokio::test]
async fn test_registration_sends_nickname() {
    let api = MockShopApi::start().await.expect("mock starts");
    runner_for(&api).run_as(&fixed_identity()).await;

    assert_eq!(
        api.nickname_of("user_abc123@demo.com").await.as_deref(),
        Some("user_abc123")
    );
}

#[tokio::test]
async fn test_cart_left_empty() {
    let api = MockShopApi::start().await.expect("mock starts");
    runner_for(&api).run_as(&fixed_identity()).await;

    assert!(api.cart_of("user_abc123@demo.com").await.is_empty());
}

#[tokio::test]
async fn test_trailing_slash_base_url() {
    let api = MockShopApi::start().await.expect("mock starts");
    let config = ProbeConfig::new(&format!("{}/", api.base_url())).expect("valid URL");
    let report = ProbeRunner::new(&config)
        .expect("client builds")
        .run()
        .await;

    assert!(report.all_passed(), "report: {report:#?}");
}

// =============================================================================
// Independence Between Runs
// =============================================================================

#[tokio::test]
async fn test_two_runs_register_distinct_users() {
    let api = MockShopApi::start().await.expect("mock starts");
    let runner = runner_for(&api);

    let first = runner.run().await;
    let second = runner.run().await;

    assert!(first.all_passed(), "first: {first:#?}");
    assert!(second.all_passed(), "second: {second:#?}");

    let emails = api.registered_emails().await;
    assert_eq!(emails.len(), 2);
    assert_ne!(emails.first(), emails.get(1));
    for email in &emails {
        assert!(email.starts_with("user_") && email.ends_with("@demo.com"));
        assert!(api.cart_of(email).await.is_empty());
    }
}

#[tokio::test]
async fn test_rerun_with_same_identity_fails_only_registration() {
    let api = MockShopApi::start().await.expect("mock starts");
    let runner = runner_for(&api);

    runner.run_as(&fixed_identity()).await;
    let report = runner.run_as(&fixed_identity()).await;

    // 409 on the duplicate email; the run carries on with the existing account
    assert_eq!(report.outcome(Step::Register), Some(&StepOutcome::Failed));
    assert_eq!(report.outcome(Step::Login), Some(&StepOutcome::Passed));
    assert_eq!(
        report.outcome(Step::VerifyCartEmpty),
        Some(&StepOutcome::Passed)
    );
    assert_eq!(report.failure_count(), 1);
    assert!(
        api.cart_of("user_abc123@demo.com")
            .await
            .get(&ProductId::new(101))
            .is_none()
    );
}

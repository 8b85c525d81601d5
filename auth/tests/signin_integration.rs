//! Integration tests for the deep-link sign-in flow.

use stagepass_auth::mocks::MockLinkGateway;
use stagepass_auth::{AuthError, SignInConfig, SignInCoordinator, SignInResult};
use std::sync::Arc;
use std::time::Duration;

const AUTHORIZE_URL: &str = "https://api.stagepass.app/auth/google";
const CALLBACK: &str = "stagepass://auth/callback";

fn test_config() -> SignInConfig {
    SignInConfig::new(AUTHORIZE_URL.to_string()).with_timeout(Duration::from_millis(200))
}

fn coordinator(gateway: &MockLinkGateway) -> Arc<SignInCoordinator<MockLinkGateway>> {
    Arc::new(SignInCoordinator::new(gateway.clone(), test_config()))
}

/// Start a sign-in on a background task and give the coordinator a
/// moment to register the pending request.
async fn start_sign_in(
    coordinator: &Arc<SignInCoordinator<MockLinkGateway>>,
) -> tokio::task::JoinHandle<stagepass_auth::Result<SignInResult>> {
    let coordinator = Arc::clone(coordinator);
    let handle = tokio::spawn(async move { coordinator.sign_in_with_google().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle
}

#[tokio::test]
async fn test_callback_resolves_pending_sign_in() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result, SignInResult::success(Some("abc123".to_string())));

    // The external authorization page was opened exactly once
    assert_eq!(gateway.opened_urls().unwrap(), vec![AUTHORIZE_URL]);
}

#[tokio::test]
async fn test_unrelated_deep_link_is_ignored() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let handle = start_sign_in(&coordinator).await;

    // An event-details link arrives while the sign-in is pending
    gateway.deliver("stagepass://events/evt_42");
    tokio::time::sleep(Duration::from_millis(20)).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result, SignInResult::success(Some("abc123".to_string())));
}

#[tokio::test]
async fn test_provider_reported_failure() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=false&error=Access%20denied"));

    let result = handle.await.unwrap().unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Access denied"));
}

#[tokio::test]
async fn test_timeout_resolves_with_negative_result() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let result = coordinator.sign_in_with_google().await.unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Authentication timeout"));
}

#[tokio::test]
async fn test_late_callback_after_timeout_is_a_no_op() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let result = coordinator.sign_in_with_google().await.unwrap();
    assert_eq!(result.error.as_deref(), Some("Authentication timeout"));

    // The callback shows up after the deadline already resolved the slot
    gateway.deliver(&format!("{CALLBACK}?success=true&token=late"));
    tokio::time::sleep(Duration::from_millis(20)).await;

    // A fresh request is unaffected by the stale delivery
    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=fresh"));
    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.access_token.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_launch_failure_rejects() {
    let gateway = MockLinkGateway::new();
    gateway.set_fail_open(true);
    let coordinator = coordinator(&gateway);

    let err = coordinator.sign_in_with_google().await.unwrap_err();
    assert!(matches!(err, AuthError::LaunchFailed { .. }));

    // The failed attempt released the slot
    gateway.set_fail_open(false);
    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));
    assert!(handle.await.unwrap().unwrap().success);
}

#[tokio::test]
async fn test_second_concurrent_sign_in_is_rejected() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let handle = start_sign_in(&coordinator).await;

    let err = coordinator.sign_in_with_google().await.unwrap_err();
    assert_eq!(err, AuthError::SignInInProgress);

    // The first caller is still resolvable
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));
    assert!(handle.await.unwrap().unwrap().success);
}

#[tokio::test]
async fn test_abandoned_sign_in_releases_the_slot() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    // The caller's future goes away without resolving (screen teardown)
    let handle = start_sign_in(&coordinator).await;
    handle.abort();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The dead request must not block a fresh round trip
    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));
    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.access_token.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_cancel_resolves_pending_request() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    let handle = start_sign_in(&coordinator).await;

    assert!(coordinator.cancel_sign_in());
    let result = handle.await.unwrap().unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Sign-in cancelled"));

    // Nothing pending anymore
    assert!(!coordinator.cancel_sign_in());
}

#[tokio::test]
async fn test_cold_start_callback_with_nothing_pending_is_dropped() {
    let gateway = MockLinkGateway::new();
    gateway.set_initial_link(&format!("{CALLBACK}?success=true&token=stale"));

    let coordinator = coordinator(&gateway);
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The launch link was drained with no one waiting; a new round trip
    // starts clean
    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));
    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.access_token.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_cleanup_stops_the_listener() {
    let gateway = MockLinkGateway::new();
    let coordinator = coordinator(&gateway);

    coordinator.cleanup();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Delivery after cleanup reaches no listener; the pending caller
    // falls through to the timeout path
    let handle = start_sign_in(&coordinator).await;
    gateway.deliver(&format!("{CALLBACK}?success=true&token=abc123"));

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.error.as_deref(), Some("Authentication timeout"));
}

//! Deep-link sign-in coordinator.
//!
//! External sign-in runs in a browser the app cannot observe; the only
//! way back is a custom-scheme redirect routed in by the operating
//! system. This module owns that round trip: open the authorization
//! page, hold a single pending request, and resolve it exactly once —
//! from the matching callback URI, the deadline, or an explicit cancel.

use crate::config::SignInConfig;
use crate::error::{AuthError, Result};
use crate::providers::DeepLinkGateway;
use crate::state::SignInResult;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

/// Single-shot resolution slot.
///
/// `Some` is the awaiting-callback state, `None` is idle. All resolution
/// paths go through [`resolve_once`], which takes the sender out under
/// the lock, so a second trigger is provably a no-op.
type PendingSlot = Arc<Mutex<Option<oneshot::Sender<SignInResult>>>>;

/// Query parameters carried by the auth callback URI.
///
/// Unknown parameters are ignored; values are trusted as-is.
#[derive(Debug, Default, Deserialize)]
struct CallbackParams {
    #[serde(default)]
    success: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Deep-link sign-in coordinator.
///
/// Constructed once per process and injected where a screen offers
/// third-party sign-in. Construction registers the deep-link listener
/// and drains any launch-time link (the app may have been cold-started
/// directly from the callback URI).
///
/// At most one sign-in request is outstanding at a time; a second call
/// while one is pending returns [`AuthError::SignInInProgress`] instead
/// of silently orphaning the first caller.
pub struct SignInCoordinator<G>
where
    G: DeepLinkGateway + Clone + Send + 'static,
{
    gateway: G,
    config: SignInConfig,
    pending: PendingSlot,
    listener: tokio::task::JoinHandle<()>,
}

impl<G> SignInCoordinator<G>
where
    G: DeepLinkGateway + Clone + Send + 'static,
{
    /// Create the coordinator and start listening for deep links.
    ///
    /// The subscription is taken before the listener task starts, so no
    /// link delivered after construction can be missed.
    #[must_use]
    pub fn new(gateway: G, config: SignInConfig) -> Self {
        let pending: PendingSlot = Arc::new(Mutex::new(None));

        let links = gateway.subscribe();
        let listener = tokio::spawn(listen(
            gateway.clone(),
            links,
            Arc::clone(&pending),
            config.callback_prefix.clone(),
        ));

        Self {
            gateway,
            config,
            pending,
            listener,
        }
    }

    /// Run one external Google sign-in round trip.
    ///
    /// Opens the backend's provider-initiated auth endpoint in the
    /// external browser, then waits for the matching callback URI. The
    /// returned value is a normal result in all flow outcomes: provider
    /// success, provider failure, and deadline expiry
    /// (`error: "Authentication timeout"`).
    ///
    /// A pending request whose caller has gone away (the awaiting future
    /// was dropped) does not count as in-progress; its slot is reclaimed
    /// by the next call.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A sign-in request is already pending → [`AuthError::SignInInProgress`]
    /// - The authorization page cannot be opened → [`AuthError::LaunchFailed`]
    pub async fn sign_in_with_google(&self) -> Result<SignInResult> {
        let receiver = {
            let mut slot = self
                .pending
                .lock()
                .map_err(|_| AuthError::Internal("pending slot lock poisoned".to_string()))?;

            match slot.as_ref() {
                // A closed sender means the previous caller's future was
                // dropped without resolving; its receiver is gone, so the
                // slot is reclaimable.
                Some(sender) if !sender.is_closed() => {
                    return Err(AuthError::SignInInProgress);
                }
                _ => {}
            }

            let (sender, receiver) = oneshot::channel();
            *slot = Some(sender);
            receiver
        };

        info!(url = %self.config.authorize_url, "opening external authorization page");

        if let Err(e) = self.gateway.open_external(&self.config.authorize_url).await {
            // The round trip never started; free the slot and reject.
            drop(take_pending(&self.pending));
            return Err(AuthError::LaunchFailed {
                reason: e.to_string(),
            });
        }

        match tokio::time::timeout(self.config.timeout, receiver).await {
            Ok(Ok(result)) => Ok(result),
            // Sender dropped without resolving; settle as cancelled.
            Ok(Err(_)) => Ok(SignInResult::cancelled()),
            Err(_elapsed) => {
                // Clears the slot, so a late callback is a no-op.
                resolve_once(&self.pending, SignInResult::timeout());
                warn!("sign-in timed out awaiting callback");
                Ok(SignInResult::timeout())
            }
        }
    }

    /// Cancel the pending sign-in request, if any.
    ///
    /// The pending caller resolves to a failed [`SignInResult`]; a
    /// callback arriving afterwards is ignored. Returns `true` when a
    /// request was actually pending.
    pub fn cancel_sign_in(&self) -> bool {
        resolve_once(&self.pending, SignInResult::cancelled())
    }

    /// Stop the process-wide deep-link listener.
    ///
    /// For test teardown and full app shutdown, not per-request use.
    pub fn cleanup(&self) {
        self.listener.abort();
    }
}

impl<G> Drop for SignInCoordinator<G>
where
    G: DeepLinkGateway + Clone + Send + 'static,
{
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Listener loop: drain the cold-start link, then follow the broadcast.
async fn listen<G>(
    gateway: G,
    mut links: broadcast::Receiver<String>,
    pending: PendingSlot,
    callback_prefix: String,
) where
    G: DeepLinkGateway,
{
    match gateway.initial_link().await {
        Ok(Some(uri)) => handle_link(&pending, &callback_prefix, &uri),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "failed to query launch link"),
    }

    loop {
        match links.recv().await {
            Ok(uri) => handle_link(&pending, &callback_prefix, &uri),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "deep-link listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Route one incoming URI.
///
/// Links outside the reserved callback prefix belong to other parts of
/// the app and are ignored without touching the pending slot.
fn handle_link(pending: &PendingSlot, callback_prefix: &str, uri: &str) {
    if !uri.starts_with(callback_prefix) {
        debug!(%uri, "ignoring non-auth deep link");
        return;
    }

    let result = parse_callback(uri);
    if resolve_once(pending, result) {
        info!("sign-in callback resolved pending request");
    } else {
        debug!("sign-in callback arrived with no pending request");
    }
}

/// Map the callback URI's query straight into a [`SignInResult`].
fn parse_callback(uri: &str) -> SignInResult {
    let query = uri.split_once('?').map(|(_, q)| q).unwrap_or("");
    let params: CallbackParams = serde_urlencoded::from_str(query).unwrap_or_default();

    SignInResult {
        success: params.success.as_deref() == Some("true"),
        access_token: params.token,
        error: params.error,
    }
}

/// Resolve the pending request exactly once.
///
/// Returns `true` if a request was pending and has now been resolved;
/// every later call for the same request returns `false`.
fn resolve_once(pending: &PendingSlot, result: SignInResult) -> bool {
    match take_pending(pending) {
        Some(sender) => {
            // The receiver may already be gone (timed-out caller); the
            // slot is cleared either way.
            let _ = sender.send(result);
            true
        }
        None => false,
    }
}

fn take_pending(pending: &PendingSlot) -> Option<oneshot::Sender<SignInResult>> {
    match pending.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => {
            warn!("pending slot lock poisoned");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_successful_callback() {
        let result = parse_callback("stagepass://auth/callback?success=true&token=abc123");
        assert_eq!(result, SignInResult::success(Some("abc123".to_string())));
    }

    #[test]
    fn test_parse_success_without_token() {
        let result = parse_callback("stagepass://auth/callback?success=true");
        assert!(result.success);
        assert!(result.access_token.is_none());
    }

    #[test]
    fn test_parse_provider_failure() {
        let result =
            parse_callback("stagepass://auth/callback?success=false&error=Access%20denied");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Access denied"));
    }

    #[test]
    fn test_parse_ignores_unknown_params() {
        let result = parse_callback(
            "stagepass://auth/callback?success=true&token=abc&utm_source=mail&state=xyz",
        );
        assert!(result.success);
        assert_eq!(result.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_callback_without_query() {
        let result = parse_callback("stagepass://auth/callback");
        assert!(!result.success);
        assert!(result.access_token.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_resolve_once_is_idempotent() {
        let pending: PendingSlot = Arc::new(Mutex::new(None));
        let (sender, mut receiver) = oneshot::channel();
        *pending.lock().unwrap() = Some(sender);

        assert!(resolve_once(&pending, SignInResult::success(None)));
        assert!(!resolve_once(&pending, SignInResult::timeout()));
        assert!(!resolve_once(&pending, SignInResult::cancelled()));

        let delivered = receiver.try_recv().unwrap();
        assert!(delivered.success);
    }
}

//! Canonical session state and its lifecycle operations.
//!
//! One [`SessionManager`] exists per process. It owns the live
//! [`AuthSession`] inside a watch channel: every transition replaces the
//! whole session value, so readers never observe a token without its
//! user or the reverse.

use crate::error::{AuthError, Result};
use crate::providers::backend::LoginResponse;
use crate::providers::{AuthBackend, SessionVault};
use crate::state::{
    AuthSession, Credentials, PersistedSession, ProfileUpdate, RegisterRequest, User,
};
use crate::token;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Single source of truth for "is the user logged in, as whom, with what
/// credential".
///
/// Generic over the remote backend and the durable vault; both are
/// injected at construction, one instance per process.
///
/// # Example
///
/// ```no_run
/// # use stagepass_auth::mocks::{MockAuthBackend, MockSessionVault};
/// # use stagepass_auth::SessionManager;
/// # async fn demo() {
/// let manager = SessionManager::new(MockAuthBackend::new(), MockSessionVault::new());
/// manager.load_auth_state().await;
/// assert!(!manager.current().is_authenticated);
/// # }
/// ```
pub struct SessionManager<B, V>
where
    B: AuthBackend,
    V: SessionVault,
{
    backend: B,
    vault: V,
    session: watch::Sender<AuthSession>,
}

impl<B, V> SessionManager<B, V>
where
    B: AuthBackend,
    V: SessionVault,
{
    /// Create a manager in the process-start shape (loading, nothing
    /// known). Call [`load_auth_state`](Self::load_auth_state) next.
    #[must_use]
    pub fn new(backend: B, vault: V) -> Self {
        let (session, _) = watch::channel(AuthSession::loading());
        Self {
            backend,
            vault,
            session,
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> AuthSession {
        self.session.borrow().clone()
    }

    /// Subscribe to session transitions.
    ///
    /// UI code watches this receiver instead of polling; each received
    /// value is a complete, consistent session.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.session.subscribe()
    }

    /// Log in with email/password credentials.
    ///
    /// On success the session record is persisted (best effort) and the
    /// authenticated shape is published. On failure the session settles
    /// fully signed out; it is never left partially authenticated.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged for the caller to display.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.session.send_modify(|s| s.is_loading = true);

        match self.backend.login(credentials).await {
            Ok(response) => {
                self.adopt(response).await;
                info!("login succeeded");
                Ok(())
            }
            Err(e) => {
                self.session.send_replace(AuthSession::signed_out());
                Err(e)
            }
        }
    }

    /// Create an account and log it in.
    ///
    /// Settlement contract is identical to [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged for the caller to display.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.session.send_modify(|s| s.is_loading = true);

        match self.backend.register(request).await {
            Ok(response) => {
                self.adopt(response).await;
                info!("registration succeeded");
                Ok(())
            }
            Err(e) => {
                self.session.send_replace(AuthSession::signed_out());
                Err(e)
            }
        }
    }

    /// Log out.
    ///
    /// The persisted record is cleared best effort; whatever happens to
    /// storage, the in-memory session always settles signed out. A
    /// storage failure must never leave the user looking logged in.
    pub async fn logout(&self) {
        self.session.send_modify(|s| s.is_loading = true);

        if let Err(e) = self.vault.clear().await {
            warn!(error = %e, "failed to clear persisted session during logout");
        }

        self.session.send_replace(AuthSession::signed_out());
        info!("logged out");
    }

    /// Restore the session from durable storage. Run once at process
    /// start.
    ///
    /// Missing, unreadable, or corrupt records degrade to the signed-out
    /// shape; an expired token additionally removes the stored record.
    /// Never fails to the caller — startup must not crash on bad state.
    pub async fn load_auth_state(&self) {
        let record = match self.vault.load().await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "failed to read persisted session");
                self.session.send_replace(AuthSession::signed_out());
                return;
            }
        };

        let Some(record) = record else {
            self.session.send_replace(AuthSession::signed_out());
            return;
        };

        if token::is_token_expired(&record.token) {
            info!("persisted session expired, discarding");
            if let Err(e) = self.vault.clear().await {
                warn!(error = %e, "failed to remove expired session record");
            }
            self.session.send_replace(AuthSession::signed_out());
            return;
        }

        self.session
            .send_replace(AuthSession::authenticated(record.user, record.token));
        info!("session restored from storage");
    }

    /// Replace the in-memory token only.
    ///
    /// Does not touch persistence, `user`, or `is_authenticated`. For
    /// narrow refresh scenarios, not general use.
    pub fn set_token(&self, token: String) {
        self.session.send_modify(|s| s.token = Some(token));
    }

    /// Check a bearer token against its embedded expiration claim.
    ///
    /// Fail closed: a malformed token reads as expired.
    #[must_use]
    pub fn is_token_expired(&self, token: &str) -> bool {
        token::is_token_expired(token)
    }

    /// Refresh the identity record from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] without a live token, or
    /// the backend error unchanged; state is not mutated on failure.
    pub async fn get_profile(&self) -> Result<()> {
        let token = self.current_token()?;
        let user = self.backend.get_profile(&token).await?;
        self.persist_user(&token, &user).await;
        self.session.send_modify(|s| s.user = Some(user));
        Ok(())
    }

    /// Partially update the identity record on the backend.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] without a live token, or
    /// the backend error unchanged; state is not mutated on failure.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let token = self.current_token()?;
        let user = self.backend.update_profile(&token, update).await?;
        self.persist_user(&token, &user).await;
        self.session.send_modify(|s| s.user = Some(user));
        Ok(())
    }

    /// Persist token + user after a successful login/registration, then
    /// publish the authenticated shape.
    async fn adopt(&self, response: LoginResponse) {
        let LoginResponse { access_token, user } = response;

        let record = PersistedSession {
            token: access_token.clone(),
            user: user.clone(),
        };
        if let Err(e) = self.vault.store(&record).await {
            warn!(error = %e, "failed to persist session record");
        }

        self.session
            .send_replace(AuthSession::authenticated(user, access_token));
    }

    /// Persist the refreshed user record alongside the live token.
    async fn persist_user(&self, token: &str, user: &User) {
        let record = PersistedSession {
            token: token.to_string(),
            user: user.clone(),
        };
        if let Err(e) = self.vault.store(&record).await {
            warn!(error = %e, "failed to persist updated profile");
        }
    }

    fn current_token(&self) -> Result<String> {
        self.session
            .borrow()
            .token
            .clone()
            .ok_or(AuthError::NotAuthenticated)
    }
}

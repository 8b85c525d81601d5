//! # Stagepass Authentication
//!
//! Session lifecycle for the Stagepass event-ticketing client: an
//! external sign-in flow bridged back into the app by a custom-scheme
//! deep link, and a session store that turns a bearer credential into a
//! trusted, persisted, renewable application session.
//!
//! ## Architecture
//!
//! Two components, built in dependency order:
//!
//! 1. [`SignInCoordinator`] — owns the single external sign-in round
//!    trip: opens the authorization page, listens process-wide for the
//!    callback URI, resolves exactly one pending caller.
//! 2. [`SessionManager`] — canonical session state (identity, token,
//!    authenticated flag), persistence across restarts, fail-closed
//!    expiry checking, and the login/logout/profile operations the UI
//!    consumes.
//!
//! External collaborators sit behind traits in [`providers`], so the
//! core logic runs against in-memory mocks at test time.
//!
//! ## Example: email login
//!
//! ```rust,ignore
//! use stagepass_auth::{Credentials, SessionManager};
//! use stagepass_auth::providers::HttpAuthBackend;
//! use stagepass_auth::stores::FileSessionVault;
//!
//! let manager = SessionManager::new(
//!     HttpAuthBackend::new("https://api.stagepass.app".to_string()),
//!     FileSessionVault::new("/data/stagepass/session.json"),
//! );
//!
//! manager.load_auth_state().await;
//! manager.login(&Credentials {
//!     email: "organizer@example.com".to_string(),
//!     password: "hunter2".to_string(),
//! }).await?;
//!
//! assert!(manager.current().is_authenticated);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod error;
pub mod providers;
pub mod session;
pub mod signin;
pub mod state;
pub mod stores;
pub mod token;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::SignInConfig;
pub use error::{AuthError, Result};
pub use session::SessionManager;
pub use signin::SignInCoordinator;
pub use state::{
    AuthProviderTag, AuthSession, Credentials, PersistedSession, ProfileUpdate, RegisterRequest,
    SignInResult, User,
};

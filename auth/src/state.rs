//! Session state types.
//!
//! This module defines the core state types for the authentication
//! subsystem. All types are `Clone` so snapshots can be handed to the UI
//! layer without borrowing into the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// Identity
// ═══════════════════════════════════════════════════════════════════════

/// How an account was originally created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderTag {
    /// Email + password registration.
    Email,
    /// Google sign-in via the external browser flow.
    Google,
}

impl AuthProviderTag {
    /// Get the provider tag as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Google => "google",
        }
    }

    /// Parse a provider tag from a string.
    ///
    /// # Errors
    ///
    /// Returns error if the provider string is not recognized.
    pub fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "google" => Ok(Self::Google),
            _ => Err(format!("Unknown auth provider: {s}")),
        }
    }
}

/// Identity record as returned by the backend.
///
/// Field names follow the backend wire format (`camelCase`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend-assigned identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Phone number, if the user provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// How this account authenticates.
    pub provider: AuthProviderTag,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Canonical in-memory session.
///
/// There is exactly one live value per process, owned by
/// [`SessionManager`](crate::session::SessionManager) and published through
/// a watch channel. UI code reads snapshots; it never mutates them.
///
/// # Examples
///
/// ```
/// # use stagepass_auth::AuthSession;
/// let session = AuthSession::loading();
/// assert!(session.is_loading);
/// assert!(!session.is_authenticated);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Current identity, if logged in.
    pub user: Option<User>,

    /// Opaque bearer credential, if logged in.
    pub token: Option<String>,

    /// True iff a non-expired token and a user are both present.
    ///
    /// Set only after the token passed the expiry check; an expired token
    /// never yields `true`.
    pub is_authenticated: bool,

    /// True while session restoration or a login/logout transition is in
    /// flight.
    pub is_loading: bool,
}

impl AuthSession {
    /// Process-start shape: nothing known yet, restoration pending.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    /// Fully unauthenticated shape.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    /// Authenticated shape.
    ///
    /// Callers must have verified the token against its expiry claim
    /// before constructing this.
    #[must_use]
    pub const fn authenticated(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            is_loading: false,
        }
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::loading()
    }
}

/// Durable session record.
///
/// Token and user are written and read as one unit, so a crash can never
/// leave a token without its user (or the reverse) in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Opaque bearer credential.
    pub token: String,

    /// Identity record at the time of the last successful login or
    /// profile update.
    pub user: User,
}

// ═══════════════════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════════════════

/// Email/password login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plaintext password (sent over TLS, never persisted).
    pub password: String,
}

/// Account registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Phone number, optional at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial profile update.
///
/// Absent fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Sign-in result
// ═══════════════════════════════════════════════════════════════════════

/// Outcome of one external sign-in round trip.
///
/// Mirrors the callback URI parameters without further validation; the
/// redirect source is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInResult {
    /// Whether the provider reported success.
    pub success: bool,
    /// Bearer token issued by the backend, when present on the callback.
    pub access_token: Option<String>,
    /// Provider- or flow-reported error text.
    pub error: Option<String>,
}

impl SignInResult {
    /// Successful sign-in carrying the issued token (if any).
    #[must_use]
    pub const fn success(access_token: Option<String>) -> Self {
        Self {
            success: true,
            access_token,
            error: None,
        }
    }

    /// Failed sign-in with the given error text.
    #[must_use]
    pub const fn failure(error: String) -> Self {
        Self {
            success: false,
            access_token: None,
            error: Some(error),
        }
    }

    /// The deadline elapsed with no callback.
    #[must_use]
    pub fn timeout() -> Self {
        Self::failure("Authentication timeout".to_string())
    }

    /// The pending request was cancelled by the caller.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::failure("Sign-in cancelled".to_string())
    }
}

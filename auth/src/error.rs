//! Error types for session and sign-in operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the authentication subsystem.
///
/// Backend and launch failures are surfaced to callers for display and
/// retry. Storage and parse failures are absorbed close to where they
/// occur and logged; they never block a state transition the user is
/// relying on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Sign-in flow
    // ═══════════════════════════════════════════════════════════

    /// A sign-in request is already awaiting its callback.
    #[error("A sign-in request is already in progress")]
    SignInInProgress,

    /// The external authorization page could not be opened.
    #[error("Failed to open authorization page: {reason}")]
    LaunchFailed {
        /// Reason reported by the platform link opener.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Backend
    // ═══════════════════════════════════════════════════════════

    /// The backend rejected the supplied credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or the status text.
        message: String,
    },

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    // ═══════════════════════════════════════════════════════════
    // Session
    // ═══════════════════════════════════════════════════════════

    /// An operation that needs a live session was called without one.
    #[error("Not authenticated")]
    NotAuthenticated,

    // ═══════════════════════════════════════════════════════════
    // System
    // ═══════════════════════════════════════════════════════════

    /// Durable storage read/write failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (lock poisoning and similar).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stagepass_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_user_error());
    /// assert!(!AuthError::Network("timeout".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::NotAuthenticated)
    }

    /// Returns `true` if retrying the same operation may succeed.
    ///
    /// Storage and serialization failures are environmental; a retry with
    /// the same inputs will fail the same way.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Backend { .. } | Self::LaunchFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(AuthError::InvalidCredentials.is_user_error());
        assert!(AuthError::NotAuthenticated.is_user_error());
        assert!(!AuthError::Storage("disk full".into()).is_user_error());
        assert!(!AuthError::SignInInProgress.is_user_error());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AuthError::Network("connection reset".into()).is_retryable());
        assert!(
            AuthError::Backend {
                status: 503,
                message: "unavailable".into()
            }
            .is_retryable()
        );
        assert!(!AuthError::Serialization("bad json".into()).is_retryable());
    }

    #[test]
    fn test_display_messages() {
        let err = AuthError::Backend {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.to_string(), "Backend error (401): Invalid credentials");

        let err = AuthError::LaunchFailed {
            reason: "no browser available".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open authorization page: no browser available"
        );
    }
}

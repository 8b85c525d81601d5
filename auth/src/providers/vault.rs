//! Durable session vault trait.

use crate::error::Result;
use crate::state::PersistedSession;

/// Durable session storage.
///
/// Token and user travel as one [`PersistedSession`] record so storage can
/// never hold one without the other.
///
/// # Implementation Notes
///
/// - Best-effort durability, no transactions
/// - Callers treat every failure here as non-fatal
pub trait SessionVault: Send + Sync {
    /// Read the persisted session, if one exists.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails or the record cannot be parsed.
    /// Callers degrade to "not logged in" on error.
    fn load(&self) -> impl std::future::Future<Output = Result<Option<PersistedSession>>> + Send;

    /// Write the persisted session, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn store(
        &self,
        record: &PersistedSession,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Remove the persisted session. Succeeds when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns error if the removal fails.
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

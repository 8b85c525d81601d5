//! Mock session vault for testing.

use crate::error::{AuthError, Result};
use crate::providers::SessionVault;
use crate::state::PersistedSession;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock session vault.
///
/// Holds at most one record in memory; reads and writes can be made to
/// fail on demand to exercise degradation paths.
#[derive(Debug, Clone, Default)]
pub struct MockSessionVault {
    record: Arc<Mutex<Option<PersistedSession>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockSessionVault {
    /// Create an empty mock vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault preloaded with a record.
    #[must_use]
    pub fn with_record(record: PersistedSession) -> Self {
        let vault = Self::new();
        if let Ok(mut slot) = vault.record.lock() {
            *slot = Some(record);
        }
        vault
    }

    /// Make subsequent loads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent stores and clears fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// What the vault currently holds (for assertions).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn stored(&self) -> Result<Option<PersistedSession>> {
        Ok(self
            .record
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))?
            .clone())
    }
}

impl SessionVault for MockSessionVault {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AuthError::Storage("injected read failure".to_string()));
        }

        self.stored()
    }

    async fn store(&self, record: &PersistedSession) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::Storage("injected write failure".to_string()));
        }

        let mut slot = self
            .record
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))?;
        *slot = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::Storage("injected clear failure".to_string()));
        }

        let mut slot = self
            .record
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))?;
        *slot = None;
        Ok(())
    }
}

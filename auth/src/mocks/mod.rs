//! Mock provider implementations for testing.
//!
//! Simple, in-memory implementations of the provider traits with
//! failure-injection switches, for use in unit and integration tests.

pub mod backend;
pub mod links;
pub mod vault;

pub use backend::MockAuthBackend;
pub use links::MockLinkGateway;
pub use vault::MockSessionVault;

//! External collaborators of the authentication subsystem.
//!
//! This module defines traits for everything the session store and the
//! sign-in coordinator depend on: the remote auth backend, the durable
//! session vault, and the platform deep-link facility. The core logic
//! depends only on these traits; the runtime supplies concrete
//! implementations.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: real HTTP client, real file/keychain storage, real
//!   platform link APIs
//! - **Development**: instrumented versions (logging, tracing)

pub mod backend;
pub mod http;
pub mod links;
pub mod vault;

pub use backend::{AuthBackend, LoginResponse};
pub use http::HttpAuthBackend;
pub use links::DeepLinkGateway;
pub use vault::SessionVault;

//! Concrete storage implementations.

pub mod file;

pub use file::FileSessionVault;

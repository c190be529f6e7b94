//! Secret store clients.
//!
//! The navigation core only talks to a [`SecretStore`]; how the store is
//! reached (and how long it may take) is the implementation's business.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g., `http.rs`)
//! 3. Re-export from this module
//!
//! ## Example
//!
//! ```ignore
//! struct Remote { /* ... */ }
//!
//! impl SecretStore for Remote {
//!     fn list_engines(&self) -> Result<Vec<EngineName>> { /* ... */ }
//!     fn list_children(&self, engine: &str, path: &str) -> Result<Vec<ChildName>> { /* ... */ }
//!     fn read_leaf(&self, engine: &str, path: &str) -> Result<SecretRecord> { /* ... */ }
//!     fn write_leaf(&self, engine: &str, path: &str, data: &SecretData) -> Result<()> { /* ... */ }
//! }
//! ```

use crate::core::domain::SecretRecord;
use crate::core::types::{ChildName, EngineName, SecretData};
use crate::error::Result;

mod file;
mod memory;
mod tree;

pub use file::File;
pub use memory::Memory;

/// Secret store capability set.
///
/// Calls may block; the session only invokes them from worker threads.
pub trait SecretStore: Send + Sync {
    /// List mounted engine names, without the mount's trailing '/'.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be reached.
    fn list_engines(&self) -> Result<Vec<EngineName>>;

    /// List the children of a directory path, in the store's order.
    ///
    /// Directories are returned with a trailing '/', leaves without.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` if the directory doesn't exist,
    /// `StoreUnavailable` for transient failures.
    fn list_children(&self, engine: &str, path: &str) -> Result<Vec<ChildName>>;

    /// Read a leaf secret.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` if the leaf doesn't exist.
    fn read_leaf(&self, engine: &str, path: &str) -> Result<SecretRecord>;

    /// Write a leaf secret, replacing all of its keys.
    ///
    /// No version check is made: a concurrent writer's changes are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the write could not be applied.
    fn write_leaf(&self, engine: &str, path: &str, data: &SecretData) -> Result<()>;
}

impl<S: SecretStore + ?Sized> SecretStore for std::sync::Arc<S> {
    fn list_engines(&self) -> Result<Vec<EngineName>> {
        (**self).list_engines()
    }

    fn list_children(&self, engine: &str, path: &str) -> Result<Vec<ChildName>> {
        (**self).list_children(engine, path)
    }

    fn read_leaf(&self, engine: &str, path: &str) -> Result<SecretRecord> {
        (**self).read_leaf(engine, path)
    }

    fn write_leaf(&self, engine: &str, path: &str, data: &SecretData) -> Result<()> {
        (**self).write_leaf(engine, path, data)
    }
}

//! Storage module for uploaded files
//!
//! Stores uploads in a local directory under content-hash-prefixed keys
//! and reads them back by name.

mod local_store;

pub use local_store::LocalFileStore;

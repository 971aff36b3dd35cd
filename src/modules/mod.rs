//! Modules layer - Infrastructure components
//!
//! Contains adapters for resources outside the database, such as the upload directory.

pub mod storage;

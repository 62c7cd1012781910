//! Intake Storage Library
//!
//! Object storage for files uploaded through the contact form. It includes the
//! `Storage` trait and implementations for Firebase Storage (a Google Cloud
//! Storage bucket) and the local filesystem.
//!
//! # Storage key format
//!
//! Every backend uses the same layout: `leads/{uuid}_{sanitized filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-firebase")]
pub mod firebase;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-firebase")]
pub use firebase::FirebaseStorage;
pub use intake_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};

//! Infrastructure adapters for external services.
//!
//! Currently only the object storage provider that holds uploaded model files.

pub mod storage;

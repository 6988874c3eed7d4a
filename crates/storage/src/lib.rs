#![forbid(unsafe_code)]
//! Persistence for courses, the question bank and diagnostic results.

pub mod repository;
pub mod sqlite;
pub mod starter;

pub use repository::{Storage, StorageError, StoredResult};

//! Rollcall Core Library
//!
//! This crate provides the core functionality for Rollcall, including:
//! - Person records and the load-once record store
//! - Search request validation
//! - The query engine (filter, paginate, sort)
//! - Configuration

pub mod config;
pub mod models;
pub mod search;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use config::Config;
pub use models::*;
pub use search::{evaluate, Page};
pub use store::{RecordSource, RecordStore, StoreError};
pub use validate::{OrderBy, OrderField, SearchParams, ValidationError, MAX_LIMIT};

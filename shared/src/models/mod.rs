//! Data models
//!
//! Row shapes of the remote store tables. Text columns may be NULL on the
//! wire; they are normalized to empty strings on read.

pub mod company_config;
pub mod order;

// Re-exports
pub use company_config::*;
pub use order::*;

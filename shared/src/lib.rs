//! Shared types for the admin console
//!
//! Data models exchanged between the remote store client and the console
//! core. Everything here is plain data: no I/O, no async.

pub mod models;
pub mod serde_helpers;

// Re-exports
pub use models::{
    Banner, CompanyConfig, CompanyConfigUpdate, Order, OrderItem, SINGLETON_CONFIG_ID,
};
pub use serde::{Deserialize, Serialize};

//! Store Client - access to the remote record store
//!
//! The console core talks to the store exclusively through [`RemoteStore`].
//! [`RestStore`] speaks the PostgREST dialect of the hosted backend;
//! [`MemoryStore`] keeps everything in process.

pub mod config;
pub mod error;
pub mod memory;
pub mod rest;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use store::RemoteStore;

// Re-export shared types for convenience
pub use shared::{CompanyConfig, CompanyConfigUpdate, Order};

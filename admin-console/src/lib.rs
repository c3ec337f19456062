//! Admin Console - configuration draft and order feed
//!
//! The operator edits the company configuration through a [`ConfigDraft`]
//! seeded from the authoritative row, saves it with [`ConfigReconciler`],
//! and browses incoming orders through [`OrderFeed`]. [`AdminSession`]
//! wires these together for one console session.
//!
//! A single concurrent editor is assumed: writes carry no version token and
//! the store resolves competing writers as last-writer-wins.

pub mod draft;
pub mod error;
pub mod events;
pub mod logging;
pub mod orders;
pub mod reconciler;
pub mod session;
pub mod tabs;

pub use draft::{ConfigDraft, ConfigField, SeedOutcome};
pub use error::{ConsoleError, ConsoleResult};
pub use events::{ConsoleEvent, EventBus};
pub use orders::{OrderFeed, OrderView};
pub use reconciler::{CommitReceipt, ConfigReconciler};
pub use session::AdminSession;
pub use tabs::{Tab, TabChange, TabController};

// Re-export the store seam for callers wiring a session
pub use store_client::{ClientConfig, MemoryStore, RemoteStore, RestStore};

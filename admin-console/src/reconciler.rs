//! Commit protocol for the configuration draft
//!
//! One save at a time per draft. A second `commit` while one is pending is
//! rejected with [`ConsoleError::CommitInProgress`] rather than queued; the
//! caller keeps its save action disabled while [`ConfigReconciler::is_committing`]
//! is true.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use shared::CompanyConfigUpdate;
use store_client::RemoteStore;

use crate::events::{ConsoleEvent, EventBus};
use crate::{ConsoleError, ConsoleResult};

/// Proof of a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReceipt {
    /// Exactly what was written
    pub committed: CompanyConfigUpdate,
    pub committed_at: DateTime<Utc>,
}

/// Releases the in-flight flag on drop, including when the commit future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ConfigReconciler {
    store: Arc<dyn RemoteStore>,
    events: EventBus,
    committing: AtomicBool,
}

impl ConfigReconciler {
    pub fn new(store: Arc<dyn RemoteStore>, events: EventBus) -> Self {
        Self {
            store,
            events,
            committing: AtomicBool::new(false),
        }
    }

    pub fn is_committing(&self) -> bool {
        self.committing.load(Ordering::Acquire)
    }

    /// Write the full update to the singleton row.
    ///
    /// On success emits [`ConsoleEvent::ConfigCommitted`] so the caller can
    /// reload the authoritative config; the draft is never re-seeded here.
    /// On failure nothing local changes and the store's reason is returned.
    pub async fn commit(&self, update: &CompanyConfigUpdate) -> ConsoleResult<CommitReceipt> {
        let Some(_in_flight) = InFlight::acquire(&self.committing) else {
            tracing::warn!("Commit rejected: another save is in progress");
            return Err(ConsoleError::CommitInProgress);
        };

        tracing::debug!(company_name = %update.company_name, "Committing company config");
        match self.store.update_company_config(update).await {
            Ok(()) => {
                tracing::info!("Company config saved");
                self.events.emit(ConsoleEvent::ConfigCommitted);
                Ok(CommitReceipt {
                    committed: update.clone(),
                    committed_at: Utc::now(),
                })
            }
            Err(e) => {
                let message = e.user_message();
                tracing::error!(error = %e, "Failed to save company config");
                self.events.emit(ConsoleEvent::CommitFailed {
                    message: message.clone(),
                });
                Err(ConsoleError::RemoteWrite { message })
            }
        }
    }
}

//! Admin console session
//!
//! Owns the draft, the reconciler, the order feed and the tab state for one
//! open console. After [`AdminSession::close`] every operation returns
//! [`ConsoleError::SessionClosed`] and late responses are dropped without
//! touching state.

use std::sync::Arc;

use shared::{CompanyConfig, Order};
use store_client::RemoteStore;
use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;

use crate::draft::{ConfigDraft, ConfigField, SeedOutcome};
use crate::events::{ConsoleEvent, EventBus};
use crate::orders::OrderFeed;
use crate::reconciler::{CommitReceipt, ConfigReconciler};
use crate::tabs::{Tab, TabChange, TabController};
use crate::{ConsoleError, ConsoleResult};

pub struct AdminSession {
    store: Arc<dyn RemoteStore>,
    draft: RwLock<ConfigDraft>,
    reconciler: ConfigReconciler,
    feed: OrderFeed,
    tabs: RwLock<TabController>,
    events: EventBus,
    shutdown: CancellationToken,
}

impl AdminSession {
    /// Open a console on `store` with an empty draft on the general tab
    pub fn open(store: Arc<dyn RemoteStore>) -> Self {
        let shutdown = CancellationToken::new();
        let events = EventBus::new(shutdown.clone());
        tracing::info!("Admin console opened");
        Self {
            reconciler: ConfigReconciler::new(store.clone(), events.clone()),
            feed: OrderFeed::new(store.clone(), events.clone(), shutdown.clone()),
            store,
            draft: RwLock::new(ConfigDraft::new()),
            tabs: RwLock::new(TabController::new()),
            events,
            shutdown,
        }
    }

    fn ensure_open(&self) -> ConsoleResult<()> {
        if self.shutdown.is_cancelled() {
            Err(ConsoleError::SessionClosed)
        } else {
            Ok(())
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    // ========== Configuration ==========

    /// Read the authoritative config and seed the draft with it.
    ///
    /// A missing row means there is nothing to seed yet (`Ok(SeedOutcome::Ignored)`).
    pub async fn refresh_config(&self) -> ConsoleResult<SeedOutcome> {
        self.ensure_open()?;
        tracing::debug!("Loading authoritative company config");
        let result = self.store.fetch_company_config().await;
        self.ensure_open()?;

        match result {
            Ok(remote) => {
                if remote.is_none() {
                    tracing::info!("No company config row yet, nothing to seed");
                }
                self.seed(remote.as_ref()).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load company config");
                Err(ConsoleError::RemoteRead {
                    what: "configuration",
                    message: e.user_message(),
                })
            }
        }
    }

    /// Seed the draft from an externally loaded authoritative value.
    ///
    /// Replaces the whole draft when `remote` is present, unsaved edits included.
    pub async fn seed(&self, remote: Option<&CompanyConfig>) -> ConsoleResult<SeedOutcome> {
        self.ensure_open()?;
        let outcome = self.draft.write().await.seed(remote);
        if let SeedOutcome::Replaced { discarded_edits } = outcome {
            self.events.emit(ConsoleEvent::ConfigSeeded { discarded_edits });
        }
        Ok(outcome)
    }

    pub async fn set_field(
        &self,
        field: ConfigField,
        value: impl Into<String>,
    ) -> ConsoleResult<()> {
        self.ensure_open()?;
        self.draft.write().await.set_field(field, value);
        Ok(())
    }

    pub async fn set_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> ConsoleResult<()> {
        self.ensure_open()?;
        self.draft.write().await.set_field_by_name(name, value)
    }

    /// Copy of the current draft
    pub async fn draft(&self) -> ConfigDraft {
        self.draft.read().await.clone()
    }

    /// Save the whole draft as it is at the moment of the call.
    ///
    /// Edits made while the save is in flight stay in the draft and are not
    /// part of this write.
    pub async fn commit(&self) -> ConsoleResult<CommitReceipt> {
        self.ensure_open()?;
        let update = self.draft.read().await.to_update();
        self.reconciler.commit(&update).await
    }

    pub fn is_committing(&self) -> bool {
        self.reconciler.is_committing()
    }

    // ========== Tabs & Orders ==========

    pub async fn active_tab(&self) -> Tab {
        self.tabs.read().await.active()
    }

    /// Switch tabs; entering the orders view triggers one order load.
    ///
    /// The switch itself always happens. A failed load is returned as an
    /// error while the previously loaded orders stay visible.
    pub async fn activate_tab(&self, tab: Tab) -> ConsoleResult<TabChange> {
        self.ensure_open()?;
        let change = self.tabs.write().await.set_active(tab);
        tracing::debug!(from = %change.previous, to = %change.current, "Tab activated");
        if change.load_orders {
            self.feed.load().await?;
        }
        Ok(change)
    }

    /// Explicit reload of the order feed
    pub async fn reload_orders(&self) -> ConsoleResult<Arc<Vec<Order>>> {
        self.ensure_open()?;
        self.feed.load().await
    }

    pub async fn orders(&self) -> Arc<Vec<Order>> {
        self.feed.orders().await
    }

    pub fn order_feed(&self) -> &OrderFeed {
        &self.feed
    }

    // ========== Lifecycle ==========

    /// Tear the session down; pending responses will be ignored
    pub fn close(&self) {
        if !self.shutdown.is_cancelled() {
            self.shutdown.cancel();
            tracing::info!("Admin console closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for AdminSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

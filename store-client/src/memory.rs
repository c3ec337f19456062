//! In-process store
//!
//! Behaves like the REST store (singleton row is never created by an
//! update, orders come back newest first) and adds hooks to inject
//! failures and to hold writes pending.

use async_trait::async_trait;
use shared::{CompanyConfig, CompanyConfigUpdate, Order};
use tokio::sync::{RwLock, watch};

use crate::{ClientError, ClientResult, RemoteStore};

#[derive(Debug, Default)]
struct MemoryState {
    config: Option<CompanyConfig>,
    orders: Vec<Order>,
    writes: Vec<CompanyConfigUpdate>,
    fail_next_read: Option<String>,
    fail_next_write: Option<String>,
}

/// [`RemoteStore`] backed by process memory
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    write_gate: watch::Sender<bool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store: no configuration row, no orders
    pub fn new() -> Self {
        Self::from_state(MemoryState::default())
    }

    /// Store seeded with a configuration row
    pub fn with_config(config: CompanyConfig) -> Self {
        Self::from_state(MemoryState {
            config: Some(config),
            ..Default::default()
        })
    }

    fn from_state(state: MemoryState) -> Self {
        let (write_gate, _) = watch::channel(false);
        Self {
            state: RwLock::new(state),
            write_gate,
        }
    }

    pub async fn set_config(&self, config: Option<CompanyConfig>) {
        self.state.write().await.config = config;
    }

    /// Current stored configuration row
    pub async fn config(&self) -> Option<CompanyConfig> {
        self.state.read().await.config.clone()
    }

    pub async fn set_orders(&self, orders: Vec<Order>) {
        self.state.write().await.orders = orders;
    }

    /// Every update payload accepted so far, oldest first
    pub async fn writes(&self) -> Vec<CompanyConfigUpdate> {
        self.state.read().await.writes.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.state.read().await.writes.len()
    }

    /// Make the next read (config or orders) fail with `message`
    pub async fn fail_next_read(&self, message: impl Into<String>) {
        self.state.write().await.fail_next_read = Some(message.into());
    }

    /// Make the next config update fail with `message`
    pub async fn fail_next_write(&self, message: impl Into<String>) {
        self.state.write().await.fail_next_write = Some(message.into());
    }

    /// Keep every subsequent update pending until [`release_writes`](Self::release_writes)
    pub fn hold_writes(&self) {
        self.write_gate.send_replace(true);
    }

    pub fn release_writes(&self) {
        self.write_gate.send_replace(false);
    }

    async fn take_read_failure(&self) -> ClientResult<()> {
        match self.state.write().await.fail_next_read.take() {
            Some(message) => Err(ClientError::Internal(message)),
            None => Ok(()),
        }
    }

    async fn wait_for_write_gate(&self) {
        let mut gate = self.write_gate.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = gate.wait_for(|held| !*held).await;
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_company_config(&self) -> ClientResult<Option<CompanyConfig>> {
        self.take_read_failure().await?;
        Ok(self.state.read().await.config.clone())
    }

    async fn update_company_config(&self, update: &CompanyConfigUpdate) -> ClientResult<()> {
        self.wait_for_write_gate().await;

        let mut state = self.state.write().await;
        if let Some(message) = state.fail_next_write.take() {
            return Err(ClientError::Internal(message));
        }
        let config = state
            .config
            .as_mut()
            .ok_or_else(|| ClientError::NotFound("settings row 1".into()))?;
        config.apply(update);
        state.writes.push(update.clone());
        Ok(())
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.take_read_failure().await?;
        let mut orders = self.state.read().await.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

//! Order feed
//!
//! Fetches the whole order collection on demand and caches it for the
//! session. Each load replaces the cache wholesale. Loads are tagged with a
//! sequence number so a slow response can never overwrite a newer one.

mod view;

pub use view::{CURRENCY_PREFIX, MESSAGING_LINK_BASE, OrderView};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shared::Order;
use store_client::RemoteStore;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::events::{ConsoleEvent, EventBus};
use crate::{ConsoleError, ConsoleResult};

#[derive(Debug, Default)]
struct FeedState {
    orders: Arc<Vec<Order>>,
    /// Sequence number of the load currently in `orders` (0 = never loaded)
    applied_seq: u64,
}

pub struct OrderFeed {
    store: Arc<dyn RemoteStore>,
    events: EventBus,
    shutdown: CancellationToken,
    issued_seq: AtomicU64,
    state: RwLock<FeedState>,
}

impl OrderFeed {
    pub fn new(store: Arc<dyn RemoteStore>, events: EventBus, shutdown: CancellationToken) -> Self {
        Self {
            store,
            events,
            shutdown,
            issued_seq: AtomicU64::new(0),
            state: RwLock::new(FeedState::default()),
        }
    }

    /// Fetch all orders, newest first, and replace the cache.
    ///
    /// On failure the previous cache stays visible and the error is returned;
    /// nothing is retried. An empty collection is a normal result. A response
    /// older than the one already applied, success or failure, is ignored and
    /// the current cache is returned.
    pub async fn load(&self) -> ConsoleResult<Arc<Vec<Order>>> {
        if self.shutdown.is_cancelled() {
            return Err(ConsoleError::SessionClosed);
        }

        let seq = self.issued_seq.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(seq, "Loading orders");
        let result = self.store.list_orders().await;

        if self.shutdown.is_cancelled() {
            tracing::debug!(seq, "Order response arrived after shutdown, dropped");
            return Err(ConsoleError::SessionClosed);
        }

        match result {
            Ok(mut orders) => {
                sort_newest_first(&mut orders);

                let mut state = self.state.write().await;
                if seq < state.applied_seq {
                    tracing::debug!(
                        seq,
                        applied = state.applied_seq,
                        "Stale order response discarded"
                    );
                    return Ok(state.orders.clone());
                }
                let count = orders.len();
                state.orders = Arc::new(orders);
                state.applied_seq = seq;
                let snapshot = state.orders.clone();
                drop(state);

                tracing::info!(seq, count, "Orders loaded");
                self.events.emit(ConsoleEvent::OrdersLoaded { count });
                Ok(snapshot)
            }
            Err(e) => {
                let state = self.state.read().await;
                if seq < state.applied_seq {
                    tracing::debug!(
                        seq,
                        applied = state.applied_seq,
                        error = %e,
                        "Stale order failure discarded"
                    );
                    return Ok(state.orders.clone());
                }
                drop(state);

                let message = e.user_message();
                tracing::warn!(seq, error = %e, "Failed to load orders, keeping previous list");
                self.events.emit(ConsoleEvent::OrdersLoadFailed {
                    message: message.clone(),
                });
                Err(ConsoleError::RemoteRead {
                    what: "orders",
                    message,
                })
            }
        }
    }

    /// Cached orders, newest first (empty until the first successful load)
    pub async fn orders(&self) -> Arc<Vec<Order>> {
        self.state.read().await.orders.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.applied_seq > 0
    }
}

/// Stable sort by creation time, newest first
fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

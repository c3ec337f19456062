// admin-console/tests/session_flow.rs
// End-to-end console behaviour against in-process stores

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use admin_console::{
    AdminSession, ConfigField, ConsoleError, ConsoleEvent, MemoryStore, OrderView, RemoteStore,
    SeedOutcome, Tab,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use shared::{Banner, CompanyConfig, CompanyConfigUpdate, Order};
use store_client::{ClientError, ClientResult};
use tokio::sync::{Mutex, oneshot};

fn authoritative() -> CompanyConfig {
    CompanyConfig {
        company_name: "Giofarma".into(),
        logo_url: "https://i.ibb.co/logo.png".into(),
        whatsapp_number: "+51 987 654 321".into(),
        facebook_url: "https://facebook.com/giofarma".into(),
        instagram_url: "https://instagram.com/giofarma".into(),
        odoo_host: "giofarma.odoo.com".into(),
        odoo_db: "giofarma-prod".into(),
        odoo_username: "admin@giofarma.pe".into(),
        odoo_api_key: "key-1".into(),
        banners: vec![Banner(serde_json::json!({"image": "b1.png"}))],
    }
}

fn order(id: &str, phone: &str, cents: i64, hour: u32) -> Order {
    Order {
        id: id.to_string(),
        customer_name: "Ana".into(),
        customer_phone: phone.to_string(),
        total_amount: Decimal::new(cents, 2),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
        order_items: Vec::new(),
    }
}

async fn open_seeded() -> (Arc<MemoryStore>, Arc<AdminSession>) {
    let store = Arc::new(MemoryStore::with_config(authoritative()));
    let session = Arc::new(AdminSession::open(store.clone()));
    session.refresh_config().await.unwrap();
    (store, session)
}

async fn wait_until_committing(session: &AdminSession) {
    while !session.is_committing() {
        tokio::task::yield_now().await;
    }
}

// ========== Draft & Commit ==========

#[tokio::test]
async fn test_commit_persists_full_draft() {
    let (store, session) = open_seeded().await;
    session.set_field(ConfigField::CompanyName, "Giofarma SAC").await.unwrap();
    session.set_field_by_name("odoo_db", "giofarma-staging").await.unwrap();
    let expected = session.draft().await.to_update();

    session.commit().await.unwrap();

    assert_eq!(store.writes().await, vec![expected.clone()]);
    let stored = store.config().await.unwrap();
    assert_eq!(CompanyConfigUpdate::from(&stored), expected);
    // Fields from both tabs and the untouched banners are all written
    assert_eq!(stored.instagram_url, "https://instagram.com/giofarma");
    assert_eq!(stored.odoo_api_key, "key-1");
    assert_eq!(stored.banners, authoritative().banners);
}

#[tokio::test]
async fn test_commit_is_idempotent() {
    let (store, session) = open_seeded().await;
    session.set_field(ConfigField::LogoUrl, "https://i.ibb.co/new.png").await.unwrap();

    session.commit().await.unwrap();
    let after_first = store.config().await;
    session.commit().await.unwrap();
    let after_second = store.config().await;

    assert_eq!(after_first, after_second);
    let writes = store.writes().await;
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], writes[1]);
}

#[tokio::test]
async fn test_failed_commit_leaves_draft_untouched() {
    let (store, session) = open_seeded().await;
    let mut events = session.subscribe();
    session.set_field(ConfigField::WhatsappNumber, "999 111 222").await.unwrap();
    let before = session.draft().await;

    store.fail_next_write("permission denied for table settings").await;
    let err = session.commit().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error saving configuration: Internal error: permission denied for table settings"
    );
    assert_eq!(session.draft().await, before);
    assert_eq!(store.config().await.unwrap(), authoritative());
    assert!(matches!(
        events.recv().await.unwrap(),
        ConsoleEvent::CommitFailed { .. }
    ));

    // Manual retry succeeds with the preserved draft
    session.commit().await.unwrap();
    assert_eq!(store.config().await.unwrap().whatsapp_number, "999 111 222");
}

#[tokio::test]
async fn test_back_to_back_commit_is_rejected_not_dropped() {
    let (store, session) = open_seeded().await;
    store.hold_writes();

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.commit().await })
    };
    wait_until_committing(&session).await;

    assert_eq!(session.commit().await.unwrap_err(), ConsoleError::CommitInProgress);

    store.release_writes();
    first.await.unwrap().unwrap();
    assert!(!session.is_committing());
    assert_eq!(store.write_count().await, 1);
}

#[tokio::test]
async fn test_commit_snapshots_draft_at_call_time() {
    let (store, session) = open_seeded().await;
    store.hold_writes();

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.commit().await })
    };
    wait_until_committing(&session).await;
    session.set_field(ConfigField::CompanyName, "Typed during save").await.unwrap();

    store.release_writes();
    pending.await.unwrap().unwrap();

    assert_eq!(store.config().await.unwrap().company_name, "Giofarma");
    let draft = session.draft().await;
    assert_eq!(draft.get(ConfigField::CompanyName), "Typed during save");
    assert!(draft.is_dirty());
}

// ========== Seeding ==========

#[tokio::test]
async fn test_seed_race_overwrites_local_edit() {
    let session = AdminSession::open(Arc::new(MemoryStore::new()));

    assert_eq!(session.seed(None).await.unwrap(), SeedOutcome::Ignored);
    assert_eq!(session.draft().await.config(), &CompanyConfig::default());

    session.set_field_by_name("company_name", "Acme").await.unwrap();
    assert_eq!(session.draft().await.get(ConfigField::CompanyName), "Acme");

    let remote = CompanyConfig {
        company_name: "Remote".into(),
        ..Default::default()
    };
    let outcome = session.seed(Some(&remote)).await.unwrap();

    assert_eq!(outcome, SeedOutcome::Replaced { discarded_edits: true });
    assert_eq!(session.draft().await.get(ConfigField::CompanyName), "Remote");
}

#[tokio::test]
async fn test_refresh_after_commit_signal_reseeds() {
    let (store, session) = open_seeded().await;
    let mut events = session.subscribe();
    session.set_field(ConfigField::OdooApiKey, "key-2").await.unwrap();

    session.commit().await.unwrap();
    assert_eq!(events.recv().await.unwrap(), ConsoleEvent::ConfigCommitted);
    // Commit does not re-seed on its own
    assert!(session.draft().await.is_dirty());

    // Someone else touches the row before we refresh; the refresh wins
    let mut newer = store.config().await.unwrap();
    newer.facebook_url = "https://facebook.com/giofarma.pe".into();
    store.set_config(Some(newer.clone())).await;

    session.refresh_config().await.unwrap();
    let draft = session.draft().await;
    assert_eq!(draft.config(), &newer);
    assert_eq!(draft.get(ConfigField::OdooApiKey), "key-2");
    assert!(!draft.is_dirty());
}

#[tokio::test]
async fn test_missing_config_row_is_nothing_to_seed() {
    let session = AdminSession::open(Arc::new(MemoryStore::new()));
    assert_eq!(session.refresh_config().await.unwrap(), SeedOutcome::Ignored);
    assert_eq!(session.draft().await.config(), &CompanyConfig::default());
}

#[tokio::test]
async fn test_config_read_failure_keeps_draft() {
    let (store, session) = open_seeded().await;
    session.set_field(ConfigField::CompanyName, "Edited").await.unwrap();

    store.fail_next_read("connection reset").await;
    let err = session.refresh_config().await.unwrap_err();

    assert!(matches!(err, ConsoleError::RemoteRead { what: "configuration", .. }));
    assert_eq!(session.draft().await.get(ConfigField::CompanyName), "Edited");
}

// ========== Orders ==========

#[tokio::test]
async fn test_orders_tab_loads_lazily_and_keeps_cache() {
    let store = Arc::new(MemoryStore::new());
    store
        .set_orders(vec![
            order("aaa-1", "+51 111", 1000, 8),
            order("ccc-3", "+51 333", 3000, 12),
            order("bbb-2", "+51 222", 2000, 10),
        ])
        .await;
    let session = AdminSession::open(store.clone());

    // Config tabs never touch the feed
    session.activate_tab(Tab::Integration).await.unwrap();
    assert!(!session.order_feed().is_loaded().await);

    let change = session.activate_tab(Tab::Orders).await.unwrap();
    assert!(change.load_orders);
    let orders = session.orders().await;
    let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["ccc-3", "bbb-2", "aaa-1"]);
    assert!(orders.windows(2).all(|w| w[0].created_at > w[1].created_at));

    // Leaving keeps the cache; re-entering reloads
    store.set_orders(vec![order("ddd-4", "", 4000, 14)]).await;
    session.activate_tab(Tab::General).await.unwrap();
    assert_eq!(session.orders().await.len(), 3);

    session.activate_tab(Tab::Orders).await.unwrap();
    let orders = session.orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(OrderView::new(&orders[0]).short_code(), "DDD");
}

#[tokio::test]
async fn test_empty_orders_is_not_an_error() {
    let session = AdminSession::open(Arc::new(MemoryStore::new()));
    session.activate_tab(Tab::Orders).await.unwrap();
    assert!(session.orders().await.is_empty());
    assert!(session.order_feed().is_loaded().await);
}

#[tokio::test]
async fn test_orders_load_failure_switches_tab_and_keeps_stale_list() {
    let store = Arc::new(MemoryStore::new());
    store.set_orders(vec![order("aaa-1", "", 1000, 8)]).await;
    let session = AdminSession::open(store.clone());
    let mut events = session.subscribe();
    session.activate_tab(Tab::Orders).await.unwrap();
    session.activate_tab(Tab::General).await.unwrap();

    store.fail_next_read("timeout").await;
    let err = session.activate_tab(Tab::Orders).await.unwrap_err();

    assert!(matches!(err, ConsoleError::RemoteRead { what: "orders", .. }));
    assert_eq!(session.active_tab().await, Tab::Orders);
    assert_eq!(session.orders().await.len(), 1);
    assert_eq!(
        events.recv().await.unwrap(),
        ConsoleEvent::OrdersLoaded { count: 1 }
    );
    assert!(matches!(
        events.recv().await.unwrap(),
        ConsoleEvent::OrdersLoadFailed { .. }
    ));
}

#[tokio::test]
async fn test_derived_order_values() {
    let store = Arc::new(MemoryStore::new());
    store
        .set_orders(vec![order("a1b2c3-xyz", "+51 987-654-321", 1250, 9)])
        .await;
    let session = AdminSession::open(store);
    let orders = session.reload_orders().await.unwrap();
    let view = OrderView::new(&orders[0]);

    assert_eq!(view.short_code(), "A1B2C3");
    assert_eq!(view.formatted_total(), "12.50");
    assert_eq!(view.contact_digits(), "51987654321");
    assert_eq!(view.contact_link(), "https://wa.me/51987654321");
}

/// Store whose order responses are released by the test, one per call
#[derive(Default)]
struct ScriptedStore {
    pending: Mutex<VecDeque<oneshot::Receiver<ClientResult<Vec<Order>>>>>,
    calls: AtomicUsize,
}

impl ScriptedStore {
    async fn script(&self) -> oneshot::Sender<ClientResult<Vec<Order>>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.push_back(rx);
        tx
    }

    async fn wait_for_calls(&self, n: usize) {
        while self.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl RemoteStore for ScriptedStore {
    async fn fetch_company_config(&self) -> ClientResult<Option<CompanyConfig>> {
        Ok(None)
    }

    async fn update_company_config(&self, _update: &CompanyConfigUpdate) -> ClientResult<()> {
        Ok(())
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let rx = self.pending.lock().await.pop_front().expect("scripted response");
        self.calls.fetch_add(1, Ordering::SeqCst);
        rx.await.unwrap_or_else(|_| Ok(Vec::new()))
    }
}

#[tokio::test]
async fn test_stale_order_response_is_discarded() {
    let store = Arc::new(ScriptedStore::default());
    let slow = store.script().await;
    let fast = store.script().await;
    let session = Arc::new(AdminSession::open(store.clone()));

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.reload_orders().await })
    };
    store.wait_for_calls(1).await;
    let second = {
        let session = session.clone();
        tokio::spawn(async move { session.reload_orders().await })
    };
    store.wait_for_calls(2).await;

    fast.send(Ok(vec![order("new-1", "", 100, 12)])).unwrap();
    second.await.unwrap().unwrap();
    slow.send(Ok(vec![order("old-1", "", 100, 8), order("old-2", "", 100, 7)]))
        .unwrap();
    let returned = first.await.unwrap().unwrap();

    // The late, older response neither replaces the cache nor is returned
    assert_eq!(returned.len(), 1);
    let cached = session.orders().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, "new-1");
}

#[tokio::test]
async fn test_stale_order_failure_is_discarded() {
    let store = Arc::new(ScriptedStore::default());
    let slow = store.script().await;
    let fast = store.script().await;
    let session = Arc::new(AdminSession::open(store.clone()));
    let mut events = session.subscribe();

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.reload_orders().await })
    };
    store.wait_for_calls(1).await;
    let second = {
        let session = session.clone();
        tokio::spawn(async move { session.reload_orders().await })
    };
    store.wait_for_calls(2).await;

    fast.send(Ok(vec![order("new-1", "", 100, 12)])).unwrap();
    second.await.unwrap().unwrap();
    slow.send(Err(ClientError::Internal("timeout".into()))).unwrap();
    let returned = first.await.unwrap().unwrap();

    // The older request failed after a newer one landed: no error surfaces
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].id, "new-1");
    assert_eq!(events.recv().await.unwrap(), ConsoleEvent::OrdersLoaded { count: 1 });
    assert!(events.try_recv().is_err());
    assert_eq!(session.orders().await[0].id, "new-1");
}

// ========== Teardown ==========

#[tokio::test]
async fn test_closed_session_refuses_operations() {
    let (_, session) = open_seeded().await;
    session.close();
    assert!(session.is_closed());

    assert_eq!(session.commit().await.unwrap_err(), ConsoleError::SessionClosed);
    assert_eq!(
        session.set_field(ConfigField::CompanyName, "x").await.unwrap_err(),
        ConsoleError::SessionClosed
    );
    assert_eq!(
        session.activate_tab(Tab::Orders).await.unwrap_err(),
        ConsoleError::SessionClosed
    );
    assert_eq!(session.refresh_config().await.unwrap_err(), ConsoleError::SessionClosed);
}

#[tokio::test]
async fn test_order_response_after_close_is_ignored() {
    let store = Arc::new(ScriptedStore::default());
    let reply = store.script().await;
    let session = Arc::new(AdminSession::open(store.clone()));

    let load = {
        let session = session.clone();
        tokio::spawn(async move { session.reload_orders().await })
    };
    store.wait_for_calls(1).await;
    session.close();
    reply.send(Ok(vec![order("late-1", "", 100, 9)])).unwrap();

    assert_eq!(load.await.unwrap().unwrap_err(), ConsoleError::SessionClosed);
    assert!(session.orders().await.is_empty());
}

#[tokio::test]
async fn test_commit_result_after_close_emits_nothing() {
    let (store, session) = open_seeded().await;
    let mut events = session.subscribe();
    store.hold_writes();

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.commit().await })
    };
    wait_until_committing(&session).await;
    session.close();
    store.release_writes();

    // The write already left; only the refresh signal is suppressed
    pending.await.unwrap().unwrap();
    assert!(events.try_recv().is_err());
}

//! The remote store seam

use async_trait::async_trait;
use shared::{CompanyConfig, CompanyConfigUpdate, Order};

use crate::ClientResult;

/// Record store holding the configuration row and the order tables.
///
/// Implementations make exactly one round-trip per call and never retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read the singleton configuration row. A missing row is `Ok(None)`.
    async fn fetch_company_config(&self) -> ClientResult<Option<CompanyConfig>>;

    /// Overwrite the singleton configuration row with the full field set.
    ///
    /// Never inserts: a missing row is reported as `ClientError::NotFound`.
    async fn update_company_config(&self, update: &CompanyConfigUpdate) -> ClientResult<()>;

    /// All orders with their line items, newest first.
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;
}

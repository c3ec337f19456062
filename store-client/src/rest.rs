//! REST store - PostgREST dialect
//!
//! Rows are addressed as `<base>/rest/v1/<table>` with filter and ordering
//! expressed as query parameters (`id=eq.1`, `order=created_at.desc`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use shared::{CompanyConfig, CompanyConfigUpdate, Order, SINGLETON_CONFIG_ID};

use crate::{ClientConfig, ClientError, ClientResult, RemoteStore};

/// Error body returned by the store on non-2xx responses
#[derive(Deserialize)]
struct StoreErrorResponse {
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    details: Option<String>,
}

/// Network-backed [`RemoteStore`]
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    settings_table: String,
    orders_table: String,
    order_items_relation: String,
}

impl RestStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            settings_table: config.settings_table.clone(),
            orders_table: config.orders_table.clone(),
            order_items_relation: config.order_items_relation.clone(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn singleton_filter() -> String {
        format!("eq.{}", SINGLETON_CONFIG_ID)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turn a non-2xx response into a [`ClientError`]
    async fn check_status(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        // Structured body first, status code as fallback
        if let Ok(err) = serde_json::from_str::<StoreErrorResponse>(&text) {
            return Err(ClientError::Api {
                code: err.code.unwrap_or_else(|| status.as_u16().to_string()),
                message: err.message,
                details: err.details,
            });
        }
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
            _ => Err(ClientError::Internal(text)),
        }
    }

    async fn read_rows<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<Vec<T>> {
        let response = Self::check_status(self.authorize(request).send().await?).await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ClientError::InvalidResponse("empty body".into()));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn fetch_company_config(&self) -> ClientResult<Option<CompanyConfig>> {
        let request = self
            .client
            .get(self.table_url(&self.settings_table))
            .query(&[("id", Self::singleton_filter().as_str()), ("select", "*")]);

        tracing::debug!(table = %self.settings_table, "Fetching company config");
        let mut rows: Vec<CompanyConfig> = self.read_rows(request).await?;
        if rows.len() > 1 {
            tracing::warn!(rows = rows.len(), "More than one config row matched the singleton key");
        }
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn update_company_config(&self, update: &CompanyConfigUpdate) -> ClientResult<()> {
        let request = self
            .client
            .patch(self.table_url(&self.settings_table))
            .query(&[("id", Self::singleton_filter().as_str())])
            .header("Prefer", "return=representation")
            .json(update);

        tracing::debug!(table = %self.settings_table, "Updating company config");
        let rows: Vec<serde_json::Value> = self.read_rows(request).await?;
        if rows.is_empty() {
            return Err(ClientError::NotFound(format!(
                "{} row {}",
                self.settings_table, SINGLETON_CONFIG_ID
            )));
        }
        Ok(())
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let select = format!("*,{}(*)", self.order_items_relation);
        let request = self
            .client
            .get(self.table_url(&self.orders_table))
            .query(&[("select", select.as_str()), ("order", "created_at.desc")]);

        tracing::debug!(table = %self.orders_table, "Listing orders");
        self.read_rows(request).await
    }
}

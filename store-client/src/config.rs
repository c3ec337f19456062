//! Client configuration

use crate::{ClientError, ClientResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the remote store
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project base URL (e.g., "https://xyz.supabase.co")
    pub base_url: String,

    /// API key, sent both as `apikey` and as the bearer token
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Table holding the singleton configuration row
    pub settings_table: String,

    /// Table holding orders
    pub orders_table: String,

    /// Embedded relation for order line items
    pub order_items_relation: String,
}

impl ClientConfig {
    /// Create a new client configuration with default table names
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            settings_table: "settings".to_string(),
            orders_table: "orders".to_string(),
            order_items_relation: "order_items".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the settings table name
    pub fn with_settings_table(mut self, table: impl Into<String>) -> Self {
        self.settings_table = table.into();
        self
    }

    /// Set the orders table name
    pub fn with_orders_table(mut self, table: impl Into<String>) -> Self {
        self.orders_table = table.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file first when one exists. Required: `STORE_URL`,
    /// `STORE_API_KEY`. Optional: `STORE_TIMEOUT_SECS`,
    /// `STORE_SETTINGS_TABLE`, `STORE_ORDERS_TABLE`.
    pub fn from_env() -> ClientResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ClientError::Config(format!("{name} must be set")))
        };

        let mut config = Self::new(require("STORE_URL")?, require("STORE_API_KEY")?);

        if let Some(raw) = lookup("STORE_TIMEOUT_SECS") {
            config.timeout = raw.parse().map_err(|_| {
                ClientError::Config(format!("STORE_TIMEOUT_SECS is not a number: {raw}"))
            })?;
        }
        if let Some(table) = lookup("STORE_SETTINGS_TABLE").filter(|v| !v.is_empty()) {
            config.settings_table = table;
        }
        if let Some(table) = lookup("STORE_ORDERS_TABLE").filter(|v| !v.is_empty()) {
            config.orders_table = table;
        }

        Ok(config)
    }
}

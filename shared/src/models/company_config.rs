//! Company Config Model

use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// Key of the one configuration row. The console only ever updates this row.
pub const SINGLETON_CONFIG_ID: i64 = 1;

/// Opaque banner descriptor, passed through exactly as the store sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Banner(pub serde_json::Value);

/// Company configuration entity (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo_url: String,
    /// Free-form, may contain spaces and punctuation
    #[serde(default, deserialize_with = "null_as_default")]
    pub whatsapp_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facebook_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instagram_url: String,
    /// ERP integration credentials, consumed by the external sync job
    #[serde(default, deserialize_with = "null_as_default")]
    pub odoo_host: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub odoo_db: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub odoo_username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub odoo_api_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub banners: Vec<Banner>,
}

impl CompanyConfig {
    /// Overwrite every editable column with the update payload.
    pub fn apply(&mut self, update: &CompanyConfigUpdate) {
        self.company_name = update.company_name.clone();
        self.logo_url = update.logo_url.clone();
        self.whatsapp_number = update.whatsapp_number.clone();
        self.facebook_url = update.facebook_url.clone();
        self.instagram_url = update.instagram_url.clone();
        self.odoo_host = update.odoo_host.clone();
        self.odoo_db = update.odoo_db.clone();
        self.odoo_username = update.odoo_username.clone();
        self.odoo_api_key = update.odoo_api_key.clone();
        self.banners = update.banners.clone();
    }
}

/// Update company config payload
///
/// Always the full editable field set. There is deliberately no partial
/// variant: every save writes every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfigUpdate {
    pub company_name: String,
    pub logo_url: String,
    pub whatsapp_number: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub odoo_host: String,
    pub odoo_db: String,
    pub odoo_username: String,
    pub odoo_api_key: String,
    pub banners: Vec<Banner>,
}

impl From<&CompanyConfig> for CompanyConfigUpdate {
    fn from(config: &CompanyConfig) -> Self {
        Self {
            company_name: config.company_name.clone(),
            logo_url: config.logo_url.clone(),
            whatsapp_number: config.whatsapp_number.clone(),
            facebook_url: config.facebook_url.clone(),
            instagram_url: config.instagram_url.clone(),
            odoo_host: config.odoo_host.clone(),
            odoo_db: config.odoo_db.clone(),
            odoo_username: config.odoo_username.clone(),
            odoo_api_key: config.odoo_api_key.clone(),
            banners: config.banners.clone(),
        }
    }
}

//! Configuration draft
//!
//! The operator's unsaved edit buffer. It shadows the authoritative
//! [`CompanyConfig`] and is replaced wholesale whenever a fresh
//! authoritative value arrives, even if it holds unsaved edits. Those edits
//! are lost; the replacement is only logged.

use std::fmt;
use std::str::FromStr;

use shared::{CompanyConfig, CompanyConfigUpdate};

use crate::tabs::Tab;
use crate::{ConsoleError, ConsoleResult};

/// Editable text columns of the configuration row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    CompanyName,
    LogoUrl,
    WhatsappNumber,
    FacebookUrl,
    InstagramUrl,
    OdooHost,
    OdooDb,
    OdooUsername,
    OdooApiKey,
}

impl ConfigField {
    pub const ALL: [ConfigField; 9] = [
        ConfigField::CompanyName,
        ConfigField::LogoUrl,
        ConfigField::WhatsappNumber,
        ConfigField::FacebookUrl,
        ConfigField::InstagramUrl,
        ConfigField::OdooHost,
        ConfigField::OdooDb,
        ConfigField::OdooUsername,
        ConfigField::OdooApiKey,
    ];

    /// Column name on the wire
    pub fn name(self) -> &'static str {
        match self {
            ConfigField::CompanyName => "company_name",
            ConfigField::LogoUrl => "logo_url",
            ConfigField::WhatsappNumber => "whatsapp_number",
            ConfigField::FacebookUrl => "facebook_url",
            ConfigField::InstagramUrl => "instagram_url",
            ConfigField::OdooHost => "odoo_host",
            ConfigField::OdooDb => "odoo_db",
            ConfigField::OdooUsername => "odoo_username",
            ConfigField::OdooApiKey => "odoo_api_key",
        }
    }

    /// View on which the field is edited
    pub fn tab(self) -> Tab {
        match self {
            ConfigField::OdooHost
            | ConfigField::OdooDb
            | ConfigField::OdooUsername
            | ConfigField::OdooApiKey => Tab::Integration,
            _ => Tab::General,
        }
    }

    /// Rendered masked (password input)
    pub fn is_secret(self) -> bool {
        matches!(self, ConfigField::OdooApiKey)
    }

    fn value(self, config: &CompanyConfig) -> &str {
        match self {
            ConfigField::CompanyName => &config.company_name,
            ConfigField::LogoUrl => &config.logo_url,
            ConfigField::WhatsappNumber => &config.whatsapp_number,
            ConfigField::FacebookUrl => &config.facebook_url,
            ConfigField::InstagramUrl => &config.instagram_url,
            ConfigField::OdooHost => &config.odoo_host,
            ConfigField::OdooDb => &config.odoo_db,
            ConfigField::OdooUsername => &config.odoo_username,
            ConfigField::OdooApiKey => &config.odoo_api_key,
        }
    }

    fn slot(self, config: &mut CompanyConfig) -> &mut String {
        match self {
            ConfigField::CompanyName => &mut config.company_name,
            ConfigField::LogoUrl => &mut config.logo_url,
            ConfigField::WhatsappNumber => &mut config.whatsapp_number,
            ConfigField::FacebookUrl => &mut config.facebook_url,
            ConfigField::InstagramUrl => &mut config.instagram_url,
            ConfigField::OdooHost => &mut config.odoo_host,
            ConfigField::OdooDb => &mut config.odoo_db,
            ConfigField::OdooUsername => &mut config.odoo_username,
            ConfigField::OdooApiKey => &mut config.odoo_api_key,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ConsoleError::UnknownField(s.to_string()))
    }
}

/// What a call to [`ConfigDraft::seed`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// No authoritative value; draft left as is
    Ignored,
    /// Draft replaced; `discarded_edits` tells whether unsaved edits were lost
    Replaced { discarded_edits: bool },
}

/// Session-scoped edit buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDraft {
    config: CompanyConfig,
    dirty: bool,
}

impl ConfigDraft {
    /// Empty draft (nothing seeded yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole draft with `remote` when it is present.
    ///
    /// No field-level merge: edits made since the last seed are overwritten.
    pub fn seed(&mut self, remote: Option<&CompanyConfig>) -> SeedOutcome {
        let Some(remote) = remote else {
            return SeedOutcome::Ignored;
        };

        let discarded_edits = self.dirty && self.config != *remote;
        if discarded_edits {
            tracing::warn!("Authoritative config replaced a draft with unsaved edits");
        }
        self.config = remote.clone();
        self.dirty = false;
        SeedOutcome::Replaced { discarded_edits }
    }

    /// Set one field; every other field is left untouched
    pub fn set_field(&mut self, field: ConfigField, value: impl Into<String>) {
        let value = value.into();
        let slot = field.slot(&mut self.config);
        if *slot != value {
            *slot = value;
            self.dirty = true;
        }
    }

    /// [`set_field`](Self::set_field) addressed by column name
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> ConsoleResult<()> {
        let field: ConfigField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    pub fn get(&self, field: ConfigField) -> &str {
        field.value(&self.config)
    }

    pub fn config(&self) -> &CompanyConfig {
        &self.config
    }

    /// Edited since the last seed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Full write payload: every editable column plus the banners as seeded
    pub fn to_update(&self) -> CompanyConfigUpdate {
        CompanyConfigUpdate::from(&self.config)
    }
}

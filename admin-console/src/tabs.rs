//! Tab state
//!
//! Pure state selection. The orders view is fetched lazily: entering it
//! asks for a load, leaving it keeps whatever was loaded.

use std::fmt;

/// Console views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Branding and contact links
    #[default]
    General,
    /// ERP integration credentials
    Integration,
    /// Read-only order feed
    Orders,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::General, Tab::Integration, Tab::Orders];

    /// Whether the view offers the save action (config tabs only)
    pub fn shows_save_action(self) -> bool {
        !matches!(self, Tab::Orders)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tab::General => "general",
            Tab::Integration => "integration",
            Tab::Orders => "orders",
        };
        f.write_str(name)
    }
}

/// Result of a tab switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabChange {
    pub previous: Tab,
    pub current: Tab,
    /// Set when the switch entered the orders view from another tab
    pub load_orders: bool,
}

#[derive(Debug, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    /// Switch to `tab`.
    ///
    /// Every entry into [`Tab::Orders`] requests a fresh load; selecting the
    /// tab that is already active changes nothing.
    pub fn set_active(&mut self, tab: Tab) -> TabChange {
        let previous = self.active;
        self.active = tab;
        TabChange {
            previous,
            current: tab,
            load_orders: tab == Tab::Orders && previous != Tab::Orders,
        }
    }
}

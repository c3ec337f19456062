//! Presentation projection of an order
//!
//! Everything here is derived on read from a borrowed [`Order`]; nothing is
//! stored back.

use chrono::Local;
use rust_decimal::RoundingStrategy;
use shared::Order;

/// Deep-link prefix of the messaging service
pub const MESSAGING_LINK_BASE: &str = "https://wa.me";

/// Currency prefix shown before totals (Peruvian sol)
pub const CURRENCY_PREFIX: &str = "S/";

const PLACED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy)]
pub struct OrderView<'a> {
    order: &'a Order,
}

impl<'a> OrderView<'a> {
    pub fn new(order: &'a Order) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &'a Order {
        self.order
    }

    /// Leading segment of the id up to the first `-`, upper-cased.
    ///
    /// `"a1b2c3-xyz"` -> `"A1B2C3"`; an id without `-` is used whole.
    pub fn short_code(&self) -> String {
        self.order
            .id
            .split('-')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }

    /// `"#A1B2C3 - Ana"`
    pub fn headline(&self) -> String {
        format!("#{} - {}", self.short_code(), self.order.customer_name)
    }

    /// Total with exactly two decimals, half away from zero
    pub fn formatted_total(&self) -> String {
        let rounded = self
            .order
            .total_amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }

    /// `"S/ 12.50"`
    pub fn display_total(&self) -> String {
        format!("{} {}", CURRENCY_PREFIX, self.formatted_total())
    }

    /// Customer phone with every non-digit removed
    pub fn contact_digits(&self) -> String {
        self.order
            .customer_phone
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    }

    /// Messaging deep link; built even when no digits remain
    pub fn contact_link(&self) -> String {
        format!("{}/{}", MESSAGING_LINK_BASE, self.contact_digits())
    }

    pub fn item_count(&self) -> usize {
        self.order.item_count()
    }

    /// Creation time in the console's local timezone
    pub fn placed_at_local(&self) -> String {
        self.order
            .created_at
            .with_timezone(&Local)
            .format(PLACED_AT_FORMAT)
            .to_string()
    }
}

impl<'a> From<&'a Order> for OrderView<'a> {
    fn from(order: &'a Order) -> Self {
        Self::new(order)
    }
}

//! Shell configuration.

use std::time::Duration;

use serde::Deserialize;
use tricolumn_core::BusyDelays;

/// Entity set and key field used to build a resource path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityKey {
    /// Entity set name, e.g. `Categories`.
    pub entity_set: String,
    /// Key property, e.g. `CategoryID`.
    pub key_field: String,
}

impl EntityKey {
    /// Key definition for `entity_set` keyed by `key_field`.
    pub fn new(entity_set: impl Into<String>, key_field: impl Into<String>) -> Self {
        Self { entity_set: entity_set.into(), key_field: key_field.into() }
    }
}

/// Shell configuration
///
/// Missing fields fall back to [`ShellConfig::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Busy indicator delay of the application root, in milliseconds.
    pub app_busy_delay_ms: u64,
    /// Busy indicator delay of the list, in milliseconds.
    pub list_busy_delay_ms: u64,
    /// Busy indicator delay of the object detail, in milliseconds.
    pub detail_busy_delay_ms: u64,
    /// Busy indicator delay of the line item table, in milliseconds.
    pub line_items_busy_delay_ms: u64,
    /// Busy indicator delay of the product sub-detail, in milliseconds.
    pub product_busy_delay_ms: u64,
    /// How objects of the list are keyed.
    pub object_key: EntityKey,
    /// How products of an object are keyed.
    pub product_key: EntityKey,
    /// Running on a phone, where opening an object adds a history entry
    /// instead of replacing the current one.
    pub phone: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_busy_delay_ms: 1000,
            list_busy_delay_ms: 1000,
            detail_busy_delay_ms: 1000,
            line_items_busy_delay_ms: 1000,
            product_busy_delay_ms: 1000,
            object_key: EntityKey::new("Categories", "CategoryID"),
            product_key: EntityKey::new("Products", "ProductID"),
            phone: false,
        }
    }
}

impl ShellConfig {
    /// Configured busy delays per region.
    pub fn busy_delays(&self) -> BusyDelays {
        BusyDelays {
            app: Duration::from_millis(self.app_busy_delay_ms),
            list: Duration::from_millis(self.list_busy_delay_ms),
            detail: Duration::from_millis(self.detail_busy_delay_ms),
            line_items: Duration::from_millis(self.line_items_busy_delay_ms),
            product: Duration::from_millis(self.product_busy_delay_ms),
        }
    }
}

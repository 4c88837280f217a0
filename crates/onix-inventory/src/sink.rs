//! Inventory sink trait

use serde_json::Value;

use crate::error::Result;

/// Receiver of materialized inventory nodes, variables and edges
///
/// Implementations must treat `add_group`, `add_host` and `add_child` as
/// idempotent. Calls are purely additive.
pub trait InventorySink {
    fn add_group(&mut self, name: &str) -> Result<()>;
    fn add_host(&mut self, name: &str) -> Result<()>;
    fn set_variable(&mut self, node: &str, key: &str, value: &Value) -> Result<()>;
    fn add_child(&mut self, parent: &str, child: &str) -> Result<()>;
}

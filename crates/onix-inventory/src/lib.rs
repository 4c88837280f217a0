//! onix-inventory: CMDB inventory materialization
//!
//! Turns the flat item/link snapshot returned by the Onix WAPI into a
//! hierarchical host/group inventory. The algorithm only talks to an
//! [`InventorySink`]; [`AnsibleInventory`] is the in-memory sink that renders
//! the Ansible dynamic inventory protocol.

pub mod ansible;
pub mod error;
pub mod materializer;
pub mod sink;

pub use ansible::{AnsibleInventory, Group, Host};
pub use error::{InventoryError, Result};
pub use materializer::{MaterializeReport, classify_and_register, link_hierarchy, materialize};
pub use sink::InventorySink;

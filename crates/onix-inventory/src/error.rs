//! Error types for onix-inventory

use thiserror::Error;

/// Errors raised by an inventory sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Node was referenced before being registered
    #[error("unknown inventory node: {0}")]
    UnknownNode(String),

    /// Children can only be added to groups
    #[error("not a group: {0}")]
    NotAGroup(String),

    /// Name clashes with a key of the rendered inventory document
    #[error("reserved inventory name: {0}")]
    ReservedName(String),

    /// Adding the child would make a group contain itself
    #[error("adding group {child} to {parent} creates a recursive loop")]
    RecursiveLoop { parent: String, child: String },
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

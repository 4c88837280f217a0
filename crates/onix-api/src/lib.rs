//! onix-api: Shared Onix WAPI types
//!
//! Contains the inventory document, CRUD request payloads and result types
//! used by the client, the inventory materializer and the CLI.

pub mod inventory;
pub mod requests;
pub mod responses;

pub use inventory::{InventoryDocument, Item, ItemKind, ItemMeta, Link};
pub use requests::{ItemPayload, LinkPayload, LinkRulePayload, NamedPayload, Resource};
pub use responses::{ConnectionFacts, ModuleOutcome, SetupFacts, WapiResult};

//! Inventory document returned by `GET /data/{key}/tag/{tag}`

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item type tag relevant to inventory materialization
///
/// The WAPI has shipped several spellings of the same tags; all of them map
/// onto the three variants below. Anything else is kept verbatim in
/// [`ItemKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// A single managed host
    Host,
    /// A group of hosts
    HostGroup,
    /// A group whose children are other groups
    HostGroupOfGroups,
    /// Any item type the inventory does not care about
    Other(String),
}

impl ItemKind {
    /// Whether items of this kind become groups in the inventory
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, ItemKind::HostGroup | ItemKind::HostGroupOfGroups)
    }

    /// Canonical wire name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Host => "HOST",
            ItemKind::HostGroup => "HOST_GROUP",
            ItemKind::HostGroupOfGroups => "HOST_GROUP_OF_GROUPS",
            ItemKind::Other(other) => other,
        }
    }
}

impl From<String> for ItemKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HOST" | "ANSIBLE_HOST" => ItemKind::Host,
            "HOST_GROUP" | "ANSIBLE_HOST_GROUP" => ItemKind::HostGroup,
            "HOST_GROUP_OF_GROUPS"
            | "ANSIBLE_HOST_GROUP_GROUP"
            | "ANSIBLE_HOST_GROUP_OF_GROUPS" => ItemKind::HostGroupOfGroups,
            _ => ItemKind::Other(value),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item metadata; only `hostvars` is consumed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Variables scoped to the host or group this item becomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostvars: Option<Map<String, Value>>,
}

/// Configuration item as returned by the WAPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Natural key, unique within one response
    pub key: String,
    /// Item type tag
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Item metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,
}

impl Item {
    /// Create an item without metadata
    pub fn new(key: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            key: key.into(),
            kind,
            meta: None,
        }
    }

    /// Attach host variables
    #[must_use]
    pub fn with_hostvars(mut self, hostvars: Map<String, Value>) -> Self {
        self.meta = Some(ItemMeta {
            hostvars: Some(hostvars),
        });
        self
    }

    /// Iterate host variables; empty when `meta` or `hostvars` is absent
    pub fn hostvars(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.hostvars.as_ref())
            .into_iter()
            .flat_map(|vars| vars.iter())
    }
}

/// Directed link between two items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Key of the item the link starts from
    pub start_item_key: String,
    /// Key of the item the link points to
    pub end_item_key: String,
}

impl Link {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_item_key: start.into(),
            end_item_key: end.into(),
        }
    }
}

/// Tag-filtered snapshot of items and links
///
/// Both sequences are required; a body missing either fails to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub items: Vec<Item>,
    pub links: Vec<Link>,
}

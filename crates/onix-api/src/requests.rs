//! Request payloads for the WAPI CRUD endpoints

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// WAPI resource collections addressed as `{uri}/{resource}/{key}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Item,
    ItemType,
    Link,
    LinkType,
    LinkRule,
    Model,
}

impl Resource {
    /// Path segment used by the WAPI
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Resource::Item => "item",
            Resource::ItemType => "itemtype",
            Resource::Link => "link",
            Resource::LinkType => "linktype",
            Resource::LinkRule => "linkrule",
            Resource::Model => "model",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    pub status: i64,
    pub attribute: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPayload {
    pub description: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    pub attribute: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_item_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_item_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRulePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_item_type_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_item_type_key: Option<String>,
}

/// Name/description payload shared by item types, link types and models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
}

//! Building CRUD requests from command-line arguments

use onix_api::{ItemPayload, LinkPayload, LinkRulePayload, NamedPayload, Resource, WapiResult};
use onix_client::{ClientError, Result, WapiClient};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::{ItemArgs, LinkArgs, LinkRuleArgs, NamedArgs, State};

/// What to do with the resource
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Put(Value),
    Delete,
}

/// A single PUT or DELETE against `{resource}/{key}`
#[derive(Debug, Clone, PartialEq)]
pub struct CrudRequest {
    pub resource: Resource,
    pub key: String,
    pub action: Action,
}

impl CrudRequest {
    fn new<T: Serialize>(
        resource: Resource,
        key: &str,
        state: State,
        payload: impl FnOnce() -> Result<T>,
    ) -> Result<Self> {
        let action = match state {
            State::Absent => Action::Delete,
            State::Present => Action::Put(
                serde_json::to_value(payload()?)
                    .map_err(|e| ClientError::Validation(format!("invalid payload: {e}")))?,
            ),
        };

        Ok(Self {
            resource,
            key: key.to_string(),
            action,
        })
    }

    /// # Errors
    /// Returns an error if `meta` or `attribute` is not a JSON object.
    pub fn item(args: &ItemArgs) -> Result<Self> {
        Self::new(Resource::Item, &args.key, args.state, || {
            Ok(ItemPayload {
                name: args.name.clone(),
                description: args.description.clone(),
                item_type: args.item_type.clone(),
                meta: parse_object("meta", &args.meta)?,
                tag: tags(&args.tag),
                status: args.status,
                attribute: parse_object("attribute", &args.attribute)?,
            })
        })
    }

    /// # Errors
    /// Returns an error if `meta` or `attribute` is not a JSON object.
    pub fn link(args: &LinkArgs) -> Result<Self> {
        Self::new(Resource::Link, &args.key, args.state, || {
            Ok(LinkPayload {
                description: args.description.clone(),
                link_type: args.link_type.clone(),
                meta: parse_object("meta", &args.meta)?,
                tag: tags(&args.tag),
                attribute: parse_object("attribute", &args.attribute)?,
                start_item_key: args.start_item_key.clone(),
                end_item_key: args.end_item_key.clone(),
            })
        })
    }

    /// # Errors
    /// Never fails in practice; kept fallible like the other builders.
    pub fn link_rule(args: &LinkRuleArgs) -> Result<Self> {
        Self::new(Resource::LinkRule, &args.key, args.state, || {
            Ok(LinkRulePayload {
                name: args.name.clone(),
                description: args.description.clone(),
                link_type_key: args.link_type_key.clone(),
                start_item_type_key: args.start_item_type_key.clone(),
                end_item_type_key: args.end_item_type_key.clone(),
            })
        })
    }

    /// Item types, link types and models
    ///
    /// # Errors
    /// Never fails in practice; kept fallible like the other builders.
    pub fn named(resource: Resource, args: &NamedArgs) -> Result<Self> {
        Self::new(resource, &args.key, args.state, || {
            Ok(NamedPayload {
                name: args.name.clone(),
                description: args.description.clone(),
            })
        })
    }

    /// Send the request
    ///
    /// # Errors
    /// Returns an error if the WAPI call fails.
    pub async fn send(&self, client: &WapiClient) -> Result<WapiResult> {
        match &self.action {
            Action::Put(payload) => client.put(self.resource, &self.key, payload).await,
            Action::Delete => client.delete(self.resource, &self.key).await,
        }
    }
}

fn tags(tags: &[String]) -> Option<Vec<String>> {
    (!tags.is_empty()).then(|| tags.to_vec())
}

/// Parse a JSON object argument
///
/// Python-style single-quoted dictionaries are accepted as well, since that
/// is how automation tools tend to stringify them.
fn parse_object(field: &str, text: &str) -> Result<Map<String, Value>> {
    let parsed = serde_json::from_str::<Value>(text)
        .or_else(|_| serde_json::from_str::<Value>(&text.replace('\'', "\"")));

    match parsed {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err(ClientError::Validation(format!(
            "{field} must be a JSON object"
        ))),
        Err(e) => Err(ClientError::Validation(format!(
            "{field} is not valid JSON: {e}"
        ))),
    }
}

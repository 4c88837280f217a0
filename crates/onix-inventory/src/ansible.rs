//! In-memory inventory rendered in the Ansible dynamic inventory format

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value, json};

use crate::error::{InventoryError, Result};
use crate::sink::InventorySink;

const ALL: &str = "all";
const UNGROUPED: &str = "ungrouped";
const META: &str = "_meta";

/// Inventory group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// Group variables
    pub vars: Map<String, Value>,
    /// Member hosts, in insertion order
    pub hosts: Vec<String>,
    /// Nested groups, in insertion order
    pub children: Vec<String>,
    /// Whether another group lists this one as a child
    pub nested: bool,
}

/// Inventory host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host {
    /// Host variables
    pub vars: Map<String, Value>,
    /// Whether at least one group lists this host
    pub grouped: bool,
}

/// Ansible-style inventory built through [`InventorySink`]
///
/// Groups and hosts are kept sorted by name so the rendered output is stable.
#[derive(Debug, Clone, Default)]
pub struct AnsibleInventory {
    groups: BTreeMap<String, Group>,
    hosts: BTreeMap<String, Host>,
}

impl AnsibleInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &Group)> {
        self.groups.iter()
    }

    pub fn hosts(&self) -> impl Iterator<Item = (&String, &Host)> {
        self.hosts.iter()
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    #[must_use]
    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.get(name)
    }

    /// Render the `--list` document
    ///
    /// Top-level groups become children of `all`; hosts that belong to no
    /// group are listed under `ungrouped`. Groups keyed `all` or `ungrouped`
    /// are merged into the built-in groups of the same name.
    #[must_use]
    pub fn to_list_json(&self) -> Value {
        let mut result = Map::new();
        let mut top_level: Vec<&str> = Vec::new();

        if let Some(all) = self.groups.get(ALL) {
            top_level.extend(all.children.iter().map(String::as_str));
        }

        let ungrouped: Vec<&String> = self
            .hosts
            .iter()
            .filter(|(_, host)| !host.grouped)
            .map(|(name, _)| name)
            .collect();

        for (name, group) in self.groups.iter().filter(|(name, _)| *name != ALL) {
            let mut hosts: Vec<&String> = group.hosts.iter().collect();
            if name == UNGROUPED {
                hosts.extend(
                    ungrouped
                        .iter()
                        .copied()
                        .filter(|host| !group.hosts.contains(*host)),
                );
            }

            result.insert(name.clone(), render_group(&hosts, group));
            if !group.nested || name == UNGROUPED {
                top_level.push(name.as_str());
            }
        }

        if !ungrouped.is_empty() && !self.groups.contains_key(UNGROUPED) {
            result.insert(UNGROUPED.to_string(), json!({ "hosts": ungrouped }));
            top_level.push(UNGROUPED);
        }

        let mut seen = HashSet::new();
        top_level.retain(|name| seen.insert(*name));

        let all = match self.groups.get(ALL) {
            Some(group) => {
                let hosts: Vec<&String> = group.hosts.iter().collect();
                let mut all = render_group(&hosts, group);
                if let Value::Object(map) = &mut all {
                    map.insert("children".to_string(), json!(top_level));
                }
                all
            }
            None => json!({ "children": top_level }),
        };
        result.insert(ALL.to_string(), all);

        let hostvars: Map<String, Value> = self
            .hosts
            .iter()
            .filter(|(_, host)| !host.vars.is_empty())
            .map(|(name, host)| (name.clone(), Value::Object(host.vars.clone())))
            .collect();
        result.insert(META.to_string(), json!({ "hostvars": hostvars }));

        Value::Object(result)
    }

    /// Whether `target` is `from` or one of its nested groups
    fn reaches(&self, from: &str, target: &str) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();

        while let Some(name) = stack.pop() {
            if name == target {
                return true;
            }
            if !visited.insert(name) {
                continue;
            }
            if let Some(group) = self.groups.get(name) {
                stack.extend(group.children.iter().map(String::as_str));
            }
        }

        false
    }

    /// Render the `--host <name>` document; unknown hosts yield `{}`
    #[must_use]
    pub fn host_vars(&self, name: &str) -> Value {
        self.hosts
            .get(name)
            .map_or_else(|| json!({}), |host| Value::Object(host.vars.clone()))
    }
}

fn render_group(hosts: &[&String], group: &Group) -> Value {
    let mut group_data = Map::new();

    if !hosts.is_empty() {
        group_data.insert("hosts".to_string(), json!(hosts));
    }
    if !group.children.is_empty() {
        group_data.insert("children".to_string(), json!(group.children));
    }
    if !group.vars.is_empty() {
        group_data.insert("vars".to_string(), Value::Object(group.vars.clone()));
    }

    Value::Object(group_data)
}

impl InventorySink for AnsibleInventory {
    fn add_group(&mut self, name: &str) -> Result<()> {
        if name == META {
            return Err(InventoryError::ReservedName(name.to_string()));
        }
        self.groups.entry(name.to_string()).or_default();
        Ok(())
    }

    fn add_host(&mut self, name: &str) -> Result<()> {
        self.hosts.entry(name.to_string()).or_default();
        Ok(())
    }

    fn set_variable(&mut self, node: &str, key: &str, value: &Value) -> Result<()> {
        let vars = if let Some(host) = self.hosts.get_mut(node) {
            &mut host.vars
        } else if let Some(group) = self.groups.get_mut(node) {
            &mut group.vars
        } else {
            return Err(InventoryError::UnknownNode(node.to_string()));
        };

        vars.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn add_child(&mut self, parent: &str, child: &str) -> Result<()> {
        if !self.groups.contains_key(parent) {
            return Err(if self.hosts.contains_key(parent) {
                InventoryError::NotAGroup(parent.to_string())
            } else {
                InventoryError::UnknownNode(parent.to_string())
            });
        }

        if self.groups.contains_key(child) && (child == ALL || self.reaches(child, parent)) {
            return Err(InventoryError::RecursiveLoop {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        if let Some(group) = self.groups.get_mut(child) {
            group.nested = true;
        } else if let Some(host) = self.hosts.get_mut(child) {
            host.grouped = true;
        } else {
            return Err(InventoryError::UnknownNode(child.to_string()));
        }

        let child_is_group = self.groups.contains_key(child);
        if let Some(group) = self.groups.get_mut(parent) {
            let members = if child_is_group {
                &mut group.children
            } else {
                &mut group.hosts
            };
            if !members.iter().any(|member| member == child) {
                members.push(child.to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_host_is_idempotent() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_host("h1").unwrap();
        inventory.set_variable("h1", "ip", &json!("10.0.0.1")).unwrap();
        inventory.add_host("h1").unwrap();

        assert_eq!(inventory.hosts().count(), 1);
        assert_eq!(inventory.host("h1").unwrap().vars["ip"], json!("10.0.0.1"));
    }

    #[test]
    fn test_variable_on_unknown_node() {
        let mut inventory = AnsibleInventory::new();
        let err = inventory
            .set_variable("ghost", "k", &json!(1))
            .unwrap_err();
        assert_eq!(err, InventoryError::UnknownNode("ghost".to_string()));
    }

    #[test]
    fn test_child_of_host_is_rejected() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_host("h1").unwrap();
        inventory.add_host("h2").unwrap();

        let err = inventory.add_child("h1", "h2").unwrap_err();
        assert_eq!(err, InventoryError::NotAGroup("h1".to_string()));
    }

    #[test]
    fn test_add_child_is_idempotent() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_group("web").unwrap();
        inventory.add_host("h1").unwrap();
        inventory.add_child("web", "h1").unwrap();
        inventory.add_child("web", "h1").unwrap();

        assert_eq!(inventory.group("web").unwrap().hosts, vec!["h1"]);
    }

    #[test]
    fn test_list_json_layout() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_group("dc1").unwrap();
        inventory.add_group("web").unwrap();
        inventory.add_group("empty").unwrap();
        inventory.add_host("h1").unwrap();
        inventory.add_host("lonely").unwrap();
        inventory.set_variable("h1", "ip", &json!("10.0.0.1")).unwrap();
        inventory.set_variable("dc1", "region", &json!("eu")).unwrap();
        inventory.add_child("dc1", "web").unwrap();
        inventory.add_child("web", "h1").unwrap();

        let list = inventory.to_list_json();

        assert_eq!(list["all"]["children"], json!(["dc1", "empty", "ungrouped"]));
        assert_eq!(list["dc1"], json!({ "children": ["web"], "vars": { "region": "eu" } }));
        assert_eq!(list["web"], json!({ "hosts": ["h1"] }));
        assert_eq!(list["empty"], json!({}));
        assert_eq!(list["ungrouped"], json!({ "hosts": ["lonely"] }));
        assert_eq!(list["_meta"]["hostvars"], json!({ "h1": { "ip": "10.0.0.1" } }));
    }

    #[test]
    fn test_reserved_group_names_are_merged() {
        let mut inventory = AnsibleInventory::new();
        for group in ["all", "web", "ungrouped"] {
            inventory.add_group(group).unwrap();
        }
        inventory.add_host("h1").unwrap();
        inventory.add_host("h2").unwrap();
        inventory.set_variable("all", "dc", &json!("london")).unwrap();
        inventory.add_child("all", "web").unwrap();
        inventory.add_child("web", "h1").unwrap();
        inventory.add_child("ungrouped", "h1").unwrap();

        let list = inventory.to_list_json();

        assert_eq!(
            list["all"],
            json!({ "children": ["web", "ungrouped"], "vars": { "dc": "london" } })
        );
        assert_eq!(list["web"], json!({ "hosts": ["h1"] }));
        assert_eq!(list["ungrouped"], json!({ "hosts": ["h1", "h2"] }));
    }

    #[test]
    fn test_all_group_with_direct_hosts() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_group("all").unwrap();
        inventory.add_group("db").unwrap();
        inventory.add_host("h1").unwrap();
        inventory.add_child("all", "h1").unwrap();

        let list = inventory.to_list_json();

        assert_eq!(list["all"], json!({ "hosts": ["h1"], "children": ["db"] }));
        assert!(list.get("ungrouped").is_none());
    }

    #[test]
    fn test_meta_group_is_rejected() {
        let mut inventory = AnsibleInventory::new();
        let err = inventory.add_group("_meta").unwrap_err();
        assert_eq!(err, InventoryError::ReservedName("_meta".to_string()));

        inventory.add_host("_meta").unwrap();
    }

    #[test]
    fn test_group_cycle_is_rejected() {
        let mut inventory = AnsibleInventory::new();
        for group in ["a", "b", "c"] {
            inventory.add_group(group).unwrap();
        }
        inventory.add_child("a", "b").unwrap();
        inventory.add_child("b", "c").unwrap();

        let err = inventory.add_child("c", "a").unwrap_err();
        assert_eq!(
            err,
            InventoryError::RecursiveLoop {
                parent: "c".to_string(),
                child: "a".to_string(),
            }
        );
        assert!(inventory.group("c").unwrap().children.is_empty());
        assert!(!inventory.group("a").unwrap().nested);
    }

    #[test]
    fn test_all_cannot_be_nested() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_group("all").unwrap();
        inventory.add_group("web").unwrap();

        let err = inventory.add_child("web", "all").unwrap_err();
        assert!(matches!(err, InventoryError::RecursiveLoop { .. }));
    }

    #[test]
    fn test_host_vars() {
        let mut inventory = AnsibleInventory::new();
        inventory.add_host("h1").unwrap();
        inventory.set_variable("h1", "ip", &json!("10.0.0.1")).unwrap();

        assert_eq!(inventory.host_vars("h1"), json!({ "ip": "10.0.0.1" }));
        assert_eq!(inventory.host_vars("nope"), json!({}));
    }
}

//! Two-pass inventory materialization
//!
//! Pass 1 registers every group and host (with their variables), pass 2 wires
//! parent/child edges from the link list. Running the passes separately means
//! an edge never references a node that has not been created yet, whatever
//! the order of the items in the source document.

use std::collections::HashSet;

use onix_api::{InventoryDocument, Item, ItemKind, Link};
use tracing::{debug, info, instrument, trace};

use crate::error::Result;
use crate::sink::InventorySink;

/// Counts of sink calls made during materialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// `add_group` calls
    pub groups: usize,
    /// `add_host` calls
    pub hosts: usize,
    /// `set_variable` calls
    pub variables: usize,
    /// `add_child` calls
    pub edges: usize,
}

/// Materialize a whole document into `sink`
///
/// # Errors
/// Only errors raised by the sink itself are returned; unknown item types and
/// links to absent items are skipped.
#[instrument(skip_all, fields(items = document.items.len(), links = document.links.len()))]
pub fn materialize<S>(document: &InventoryDocument, sink: &mut S) -> Result<MaterializeReport>
where
    S: InventorySink + ?Sized,
{
    let mut report = classify_and_register(&document.items, sink)?;
    report.edges = link_hierarchy(&document.items, &document.links, sink)?;

    info!(
        groups = report.groups,
        hosts = report.hosts,
        variables = report.variables,
        edges = report.edges,
        "inventory materialized"
    );

    Ok(report)
}

/// Pass 1: register groups and hosts, attach variables
///
/// # Errors
/// Returns the first error raised by the sink.
pub fn classify_and_register<S>(items: &[Item], sink: &mut S) -> Result<MaterializeReport>
where
    S: InventorySink + ?Sized,
{
    let mut report = MaterializeReport::default();

    for item in items {
        match &item.kind {
            ItemKind::HostGroupOfGroups | ItemKind::HostGroup => {
                sink.add_group(&item.key)?;
                report.groups += 1;
                report.variables += attach_variables(item, sink)?;
            }
            ItemKind::Host => {
                sink.add_host(&item.key)?;
                report.hosts += 1;
                report.variables += attach_variables(item, sink)?;
            }
            ItemKind::Other(kind) => {
                trace!(key = %item.key, kind = %kind, "ignoring item");
            }
        }
    }

    debug!(
        groups = report.groups,
        hosts = report.hosts,
        "registered inventory nodes"
    );
    Ok(report)
}

/// Pass 2: add parent/child edges, returning the number of edges added
///
/// For every group-of-groups item, each other group item is attached as a
/// child when a link runs from the former to the latter. For every host
/// group item, each host item is attached the same way. Only the first
/// matching link counts and each (parent, child) pair yields one edge.
///
/// # Errors
/// Returns the first error raised by the sink.
pub fn link_hierarchy<S>(items: &[Item], links: &[Link], sink: &mut S) -> Result<usize>
where
    S: InventorySink + ?Sized,
{
    let mut added: HashSet<(&str, &str)> = HashSet::new();

    for parent in items {
        let accepts: fn(&ItemKind) -> bool = match parent.kind {
            ItemKind::HostGroupOfGroups => ItemKind::is_group,
            ItemKind::HostGroup => |kind: &ItemKind| *kind == ItemKind::Host,
            _ => continue,
        };

        for child in items.iter().filter(|child| accepts(&child.kind)) {
            if child.key == parent.key || added.contains(&(parent.key.as_str(), child.key.as_str()))
            {
                continue;
            }

            if let Some(link) = first_link(links, &parent.key, &child.key) {
                trace!(
                    parent = %link.start_item_key,
                    child = %link.end_item_key,
                    "adding child"
                );
                sink.add_child(&parent.key, &child.key)?;
                added.insert((parent.key.as_str(), child.key.as_str()));
            }
        }
    }

    debug!(edges = added.len(), "linked inventory hierarchy");
    Ok(added.len())
}

fn first_link<'a>(links: &'a [Link], start: &str, end: &str) -> Option<&'a Link> {
    links
        .iter()
        .find(|link| link.start_item_key == start && link.end_item_key == end)
}

fn attach_variables<S>(item: &Item, sink: &mut S) -> Result<usize>
where
    S: InventorySink + ?Sized,
{
    let mut count = 0;
    for (name, value) in item.hostvars() {
        sink.set_variable(&item.key, name, value)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    use crate::ansible::AnsibleInventory;
    use crate::error::InventoryError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Group(String),
        Host(String),
        Var(String, String, Value),
        Child(String, String),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
    }

    impl RecordingSink {
        fn children(&self) -> Vec<(String, String)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Child(p, c) => Some((p.clone(), c.clone())),
                    _ => None,
                })
                .collect()
        }
    }

    impl InventorySink for RecordingSink {
        fn add_group(&mut self, name: &str) -> Result<()> {
            self.calls.push(Call::Group(name.to_string()));
            Ok(())
        }

        fn add_host(&mut self, name: &str) -> Result<()> {
            self.calls.push(Call::Host(name.to_string()));
            Ok(())
        }

        fn set_variable(&mut self, node: &str, key: &str, value: &Value) -> Result<()> {
            self.calls
                .push(Call::Var(node.to_string(), key.to_string(), value.clone()));
            Ok(())
        }

        fn add_child(&mut self, parent: &str, child: &str) -> Result<()> {
            self.calls
                .push(Call::Child(parent.to_string(), child.to_string()));
            Ok(())
        }
    }

    fn vars(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn sample_document() -> InventoryDocument {
        InventoryDocument {
            items: vec![
                Item::new("dc1", ItemKind::HostGroupOfGroups).with_hostvars(Map::new()),
                Item::new("web", ItemKind::HostGroup).with_hostvars(vars(json!({"env": "prod"}))),
                Item::new("h1", ItemKind::Host).with_hostvars(vars(json!({"ip": "10.0.0.1"}))),
            ],
            links: vec![Link::new("dc1", "web"), Link::new("web", "h1")],
        }
    }

    #[test]
    fn test_idempotent_group_registration() {
        let items = vec![
            Item::new("web", ItemKind::HostGroup),
            Item::new("web", ItemKind::HostGroup),
        ];
        let mut inventory = AnsibleInventory::new();

        classify_and_register(&items, &mut inventory).unwrap();

        assert_eq!(inventory.groups().count(), 1);
    }

    #[test]
    fn test_edges_do_not_depend_on_item_order() {
        let document = InventoryDocument {
            items: vec![
                Item::new("h1", ItemKind::Host),
                Item::new("web", ItemKind::HostGroup),
                Item::new("dc1", ItemKind::HostGroupOfGroups),
            ],
            links: vec![Link::new("dc1", "web"), Link::new("web", "h1")],
        };
        let mut sink = RecordingSink::default();

        let report = materialize(&document, &mut sink).unwrap();

        assert_eq!(report.edges, 2);
        let last_node = sink
            .calls
            .iter()
            .rposition(|c| matches!(c, Call::Group(_) | Call::Host(_)))
            .unwrap();
        let first_edge = sink
            .calls
            .iter()
            .position(|c| matches!(c, Call::Child(..)))
            .unwrap();
        assert!(last_node < first_edge);
    }

    #[test]
    fn test_first_matching_link_wins() {
        let document = InventoryDocument {
            items: vec![
                Item::new("G", ItemKind::HostGroup),
                Item::new("H", ItemKind::Host),
            ],
            links: vec![Link::new("G", "H"), Link::new("G", "H")],
        };
        let mut sink = RecordingSink::default();

        let report = materialize(&document, &mut sink).unwrap();

        assert_eq!(report.edges, 1);
        assert_eq!(sink.children(), vec![("G".to_string(), "H".to_string())]);
    }

    #[test]
    fn test_duplicate_items_yield_one_edge() {
        let document = InventoryDocument {
            items: vec![
                Item::new("G", ItemKind::HostGroup),
                Item::new("H", ItemKind::Host),
                Item::new("G", ItemKind::HostGroup),
                Item::new("H", ItemKind::Host),
            ],
            links: vec![Link::new("G", "H")],
        };
        let mut sink = RecordingSink::default();

        materialize(&document, &mut sink).unwrap();

        assert_eq!(sink.children().len(), 1);
    }

    #[test]
    fn test_dangling_link_is_skipped() {
        let document = InventoryDocument {
            items: vec![Item::new("web", ItemKind::HostGroup)],
            links: vec![Link::new("web", "ghost"), Link::new("nowhere", "web")],
        };
        let mut inventory = AnsibleInventory::new();

        let report = materialize(&document, &mut inventory).unwrap();

        assert_eq!(report.edges, 0);
        assert!(inventory.group("web").unwrap().hosts.is_empty());
    }

    #[test]
    fn test_variables_attached_in_pass_one() {
        let items = vec![
            Item::new("h1", ItemKind::Host).with_hostvars(vars(json!({"region": "eu"}))),
        ];
        let mut inventory = AnsibleInventory::new();

        let report = classify_and_register(&items, &mut inventory).unwrap();

        assert_eq!(report.variables, 1);
        assert_eq!(inventory.host("h1").unwrap().vars["region"], json!("eu"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut sink = RecordingSink::default();

        materialize(&sample_document(), &mut sink).unwrap();

        assert_eq!(
            sink.calls,
            vec![
                Call::Group("dc1".into()),
                Call::Group("web".into()),
                Call::Var("web".into(), "env".into(), json!("prod")),
                Call::Host("h1".into()),
                Call::Var("h1".into(), "ip".into(), json!("10.0.0.1")),
                Call::Child("dc1".into(), "web".into()),
                Call::Child("web".into(), "h1".into()),
            ]
        );
    }

    #[test]
    fn test_end_to_end_inventory() {
        let mut inventory = AnsibleInventory::new();

        materialize(&sample_document(), &mut inventory).unwrap();

        let names: Vec<&str> = inventory.groups().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["dc1", "web"]);
        assert_eq!(inventory.hosts().count(), 1);
        assert_eq!(inventory.host("h1").unwrap().vars["ip"], json!("10.0.0.1"));
        assert_eq!(inventory.group("web").unwrap().vars["env"], json!("prod"));
        assert_eq!(inventory.group("dc1").unwrap().children, vec!["web"]);
        assert_eq!(inventory.group("web").unwrap().hosts, vec!["h1"]);
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let document = InventoryDocument {
            items: vec![
                Item::new("readme", ItemKind::Other("NOTE".into())),
                Item::new("web", ItemKind::HostGroup),
            ],
            links: vec![Link::new("web", "readme")],
        };
        let mut sink = RecordingSink::default();

        let report = materialize(&document, &mut sink).unwrap();

        assert_eq!(sink.calls, vec![Call::Group("web".into())]);
        assert_eq!(report, MaterializeReport { groups: 1, ..Default::default() });
    }

    #[test]
    fn test_group_of_groups_nesting() {
        let document = InventoryDocument {
            items: vec![
                Item::new("world", ItemKind::HostGroupOfGroups),
                Item::new("eu", ItemKind::HostGroupOfGroups)
                    .with_hostvars(vars(json!({"tz": "CET"}))),
                Item::new("web", ItemKind::HostGroup),
                Item::new("h1", ItemKind::Host),
            ],
            links: vec![
                Link::new("world", "eu"),
                Link::new("eu", "web"),
                Link::new("world", "h1"),
            ],
        };
        let mut sink = RecordingSink::default();

        materialize(&document, &mut sink).unwrap();

        assert!(sink.calls.contains(&Call::Var("eu".into(), "tz".into(), json!("CET"))));
        assert_eq!(
            sink.children(),
            vec![
                ("world".to_string(), "eu".to_string()),
                ("eu".to_string(), "web".to_string()),
            ]
        );
    }

    #[test]
    fn test_self_link_is_ignored() {
        let document = InventoryDocument {
            items: vec![Item::new("loop", ItemKind::HostGroupOfGroups)],
            links: vec![Link::new("loop", "loop")],
        };
        let mut sink = RecordingSink::default();

        let report = materialize(&document, &mut sink).unwrap();

        assert_eq!(report.edges, 0);
    }

    #[test]
    fn test_group_cycle_fails_ansible_rendering() {
        let document = InventoryDocument {
            items: vec![
                Item::new("a", ItemKind::HostGroupOfGroups),
                Item::new("b", ItemKind::HostGroupOfGroups),
            ],
            links: vec![Link::new("a", "b"), Link::new("b", "a")],
        };
        let mut inventory = AnsibleInventory::new();

        let err = materialize(&document, &mut inventory).unwrap_err();

        assert_eq!(
            err,
            InventoryError::RecursiveLoop {
                parent: "b".to_string(),
                child: "a".to_string(),
            }
        );
    }
}

use armature::{Assembler, Init, Interface, RECORD, Registry, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

static NODE: Interface = Interface::new("node", &["label", "items"]);

/// Small graph-building assembler: `id` claimed, `label` delegated,
/// `items` known to the interface.
struct NodeAssembler;

impl Assembler for NodeAssembler {
    fn name(&self) -> &'static str {
        "node"
    }
    fn interface(&self) -> &'static Interface {
        &NODE
    }
    fn claims(&self) -> &'static [&'static str] {
        &["id"]
    }
    fn delegates(&self) -> &'static [&'static str] {
        &["label"]
    }
}

static NODE_ASSEMBLER: NodeAssembler = NodeAssembler;

/// Tests for counts, sentinels and shallow handle markers.

#[test]
fn counts_and_sentinels_track_bindings() {
    let mut registry = Registry::new();
    assert_eq!(registry.target_count(), 0);
    assert_eq!(registry.instance_count(), 0);

    let node = registry.assemble(&NODE_ASSEMBLER, Init::empty()).unwrap();
    assert_eq!(registry.target_count(), 1);
    assert_eq!(registry.instance_count(), 1);

    let bound = registry.target_of(node).unwrap();
    assert_eq!(registry.target_of(bound), Some(bound));

    // A record no instance was assembled over answers with sentinels.
    let loose = registry.create_target(&NODE);
    assert_eq!(registry.instance_of(loose), None);
    assert_eq!(registry.target_of(loose), None);

    // Without a registry, handles only serialize as markers.
    assert_eq!(Value::Target(loose).to_json_value(), json!({"$target": 1}));
}

/// Tests for deep JSON resolution.

#[test]
fn instance_json_includes_type_props_and_target() {
    let mut registry = Registry::new();
    let node = registry
        .assemble(&NODE_ASSEMBLER, Init::entries([("id", "n1"), ("label", "root")]))
        .unwrap();

    let json = registry.to_json_value(node);
    assert_eq!(
        json,
        json!({"$instance": {
            "type": "node",
            "props": {"id": "n1"},
            "target": {"label": "root"},
        }})
    );
}

#[test]
fn handle_values_resolve_through_lists_and_maps() {
    let mut registry = Registry::new();
    let leaf = registry
        .assemble(&NODE_ASSEMBLER, Init::entries([("label", "leaf")]))
        .unwrap();
    let root = registry
        .assemble(
            &NODE_ASSEMBLER,
            Init::entries([
                ("label", Value::from("root")),
                ("items", Value::List(vec![Value::Instance(leaf)])),
            ]),
        )
        .unwrap();

    let target = registry.target_of(root).unwrap();
    let json = registry.to_json_value(target);
    assert_eq!(
        json,
        json!({
            "label": "root",
            "items": [{"$instance": {
                "type": "node",
                "props": {},
                "target": {"label": "leaf"},
            }}],
        })
    );
}

#[test]
fn cyclic_records_resolve_to_cycle_markers() {
    let mut registry = Registry::new();
    let a = registry.create_target(&RECORD);
    let b = registry.create_target(&RECORD);
    registry.record_mut(a).set("peer", b);
    registry.record_mut(b).set("peer", a);

    let json = registry.to_json_value(a);
    assert_eq!(json, json!({"peer": {"peer": {"$cycle": 0}}}));
}

#[test]
fn instance_and_target_cycles_resolve() {
    let mut registry = Registry::new();
    let node = registry.assemble(&NODE_ASSEMBLER, Init::empty()).unwrap();
    let target = registry.target_of(node).unwrap();

    // The record points back at its own instance.
    registry.record_mut(target).set("owner", node);

    let json = registry.to_json_value(node);
    assert_eq!(
        json,
        json!({"$instance": {
            "type": "node",
            "props": {},
            "target": {"owner": {"$cycle": 0}},
        }})
    );
}

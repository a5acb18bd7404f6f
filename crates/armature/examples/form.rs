//! Assembles a small search form out of records, the classic
//! document-building use of the crate: each element assembler stamps its
//! tag onto fresh targets in a create hook, a value-only initializer
//! stands in for `children`, and the page root adopts a pre-created
//! record as its target.
//!
//! Run with `cargo run --example form`.

use armature::{Assembler, Init, Interface, Props, Registry, TargetId, Value};

static ELEMENT: Interface = Interface::new("element", &["tag", "children"]);
static FIELD: Interface = Interface::extending("field", &["kind", "name", "value"], &ELEMENT);

/// One assembler per element kind. `children` is both delegated and the
/// value property, so `assemble(&FORM, list)` reads like nesting markup.
struct ElementAssembler {
    name: &'static str,
    tag: &'static str,
    interface: &'static Interface,
}

impl Assembler for ElementAssembler {
    fn name(&self) -> &'static str {
        self.name
    }
    fn interface(&self) -> &'static Interface {
        self.interface
    }
    fn value_property(&self) -> Option<&'static str> {
        Some("children")
    }
    fn delegates(&self) -> &'static [&'static str] {
        &["children"]
    }
    fn create(&self, registry: &mut Registry, _props: &Props) -> TargetId {
        let target = registry.create_target(self.interface);
        registry.record_mut(target).set("tag", self.tag);
        target
    }
}

static PAGE: ElementAssembler = ElementAssembler {
    name: "page",
    tag: "main",
    interface: &ELEMENT,
};
static FORM: ElementAssembler = ElementAssembler {
    name: "form",
    tag: "form",
    interface: &ELEMENT,
};
static INPUT: ElementAssembler = ElementAssembler {
    name: "input",
    tag: "input",
    interface: &FIELD,
};
static BUTTON: ElementAssembler = ElementAssembler {
    name: "button",
    tag: "button",
    interface: &FIELD,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let mut registry = Registry::new();

    let input = registry.assemble(
        &INPUT,
        Init::entries([
            ("kind", Value::from("search")),
            ("name", Value::from("query")),
            ("value", Value::from("")),
        ]),
    )?;

    // A bare value becomes the button's children (its text content).
    let button = registry.assemble(&BUTTON, "Go")?;

    let form = registry.assemble(&FORM, Value::List(vec![Value::Instance(input), Value::Instance(button)]))?;

    // The page does not create a target; it adopts an existing record.
    let root = registry.create_target(&ELEMENT);
    registry.record_mut(root).set("tag", "main");

    let page = registry.assemble(
        &PAGE,
        Init::entries([
            ("target", Value::Target(root)),
            ("children", Value::List(vec![Value::Instance(form)])),
        ]),
    )?;

    let json = registry.to_json_value(page);
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

use crate::interface::{Interface, RECORD};
use crate::registry::{Registry, TargetId};
use crate::value::Props;

/// Reserved initializer key under which an existing target is supplied.
pub const TARGET_PROPERTY: &str = "target";

/// The wrapper-type contract: one implementation per kind of instance the
/// registry can assemble.
///
/// An assembler declares, statically, everything construction needs to
/// route initializer entries:
///
/// - [`claims`](Self::claims) lists the keys stored on the instance itself;
/// - [`delegates`](Self::delegates) lists the keys passed through to the
///   bound target;
/// - [`interface`](Self::interface) names the record shape acceptable as a
///   target;
/// - [`value_property`](Self::value_property) names the entry a value-only
///   initializer stands in for;
/// - [`admits`](Self::admits) filters which initializer keys are applied at
///   all.
///
/// Keys in neither list still apply when the target's interface declares
/// them (or the target already carries them); anything else is a mismatch,
/// handled per the registry's [`MismatchPolicy`](crate::MismatchPolicy).
///
/// Assemblers are stateless static data; construction borrows them for the
/// lifetime of the registry entry.
///
/// ```
/// use armature::{Assembler, Init, Interface, Registry, Value};
///
/// static NOTE: Interface = Interface::new("note", &["text"]);
///
/// struct NoteAssembler;
///
/// impl Assembler for NoteAssembler {
///     fn name(&self) -> &'static str {
///         "note"
///     }
///     fn interface(&self) -> &'static Interface {
///         &NOTE
///     }
///     fn claims(&self) -> &'static [&'static str] {
///         &["id"]
///     }
/// }
///
/// static ASSEMBLER: NoteAssembler = NoteAssembler;
///
/// let mut registry = Registry::new();
/// let note = registry.assemble(
///     &ASSEMBLER,
///     Init::entries([("id", Value::from(7_i64)), ("text", Value::from("hi"))]),
/// )?;
/// let target = registry.target_of(note).unwrap();
/// assert_eq!(registry.property(note, "id"), Some(&Value::Int(7)));
/// assert_eq!(registry.record(target).get("text"), Some(&Value::from("hi")));
/// # Ok::<(), armature::AssembleError>(())
/// ```
pub trait Assembler {
    /// Name of this assembler type, used in error messages.
    fn name(&self) -> &'static str;

    /// The record interface acceptable as this assembler's target. Defaults
    /// to the open [`RECORD`] interface.
    fn interface(&self) -> &'static Interface {
        &RECORD
    }

    /// The key a value-only initializer is routed to. `None` (the default)
    /// means value-only initializers are dropped.
    fn value_property(&self) -> Option<&'static str> {
        None
    }

    /// The reserved key under which an initializer supplies an existing
    /// target instead of having one created. Defaults to
    /// [`TARGET_PROPERTY`].
    fn target_property(&self) -> &'static str {
        TARGET_PROPERTY
    }

    /// Keys claimed by instances of this assembler: their values are stored
    /// on the instance, never on the target.
    fn claims(&self) -> &'static [&'static str] {
        &[]
    }

    /// Keys delegated to the target: reads and writes through the instance
    /// pass straight to the bound record.
    fn delegates(&self) -> &'static [&'static str] {
        &[]
    }

    /// Extra keys suppressed during property application, on top of the
    /// reserved ones. Suppressed keys are skipped silently, not mismatched.
    fn excluded(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns `true` if an initializer entry under `key` should be applied
    /// during the main application pass.
    ///
    /// The default excludes the target property (already consumed by target
    /// acquisition), the value property (applied up front) and everything
    /// in [`excluded`](Self::excluded). Override for full predicate
    /// control.
    fn admits(&self, key: &str) -> bool {
        key != self.target_property()
            && self.value_property() != Some(key)
            && !self.excluded().contains(&key)
    }

    /// Creates a fresh target for an instance under construction. The
    /// normalized initializer entries are available for inspection.
    ///
    /// The default creates an empty record of [`interface`](Self::interface).
    fn create(&self, registry: &mut Registry, _props: &Props) -> TargetId {
        registry.create_target(self.interface())
    }
}

/// The built-in assembler with every default: open interface, no claimed
/// or delegated keys, no value property.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

/// Shared [`Plain`] instance for call sites that need a `&'static` assembler.
pub static PLAIN: Plain = Plain;

impl Assembler for Plain {
    fn name(&self) -> &'static str {
        "plain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Valued;

    impl Assembler for Valued {
        fn name(&self) -> &'static str {
            "valued"
        }
        fn value_property(&self) -> Option<&'static str> {
            Some("content")
        }
        fn excluded(&self) -> &'static [&'static str] {
            &["secret"]
        }
    }

    /// Tests the default admission predicate against the reserved keys and
    /// the stop-list.
    #[test]
    fn default_admits_excludes_reserved_keys() {
        let assembler = Valued;
        assert!(assembler.admits("anything"));
        assert!(!assembler.admits("target"));
        assert!(!assembler.admits("content"));
        assert!(!assembler.admits("secret"));
    }

    /// Tests that the plain assembler admits everything but the target key.
    #[test]
    fn plain_admits_all_but_target() {
        assert!(PLAIN.admits("content"));
        assert!(PLAIN.admits("secret"));
        assert!(!PLAIN.admits("target"));
    }
}

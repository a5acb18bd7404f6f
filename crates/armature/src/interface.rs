use std::fmt;

/// The open record interface: no declared keys, accepts every target.
///
/// Assemblers that do not declare a stricter interface use this as their
/// default, so any record can serve as their target.
pub static RECORD: Interface = Interface::new("record", &[]);

/// A named structural type for records.
///
/// An interface declares which property keys its records are expected to
/// carry. Interfaces form single-inheritance chains; a record of a derived
/// interface also counts as a record of every ancestor.
///
/// Interfaces are compared nominally by name, so each interface in a
/// program should carry a unique name. They are plain static data and are
/// normally defined as `static` items:
///
/// ```
/// use armature::Interface;
///
/// static ELEMENT: Interface = Interface::new("element", &["tag", "children"]);
/// static INPUT: Interface = Interface::extending("input", &["name", "value"], &ELEMENT);
///
/// assert!(INPUT.declares("tag"));
/// assert!(ELEMENT.accepts(&INPUT));
/// assert!(!INPUT.accepts(&ELEMENT));
/// ```
#[derive(Debug)]
pub struct Interface {
    name: &'static str,
    keys: &'static [&'static str],
    parent: Option<&'static Self>,
}

impl Interface {
    /// Creates a root interface with the given declared keys.
    #[must_use]
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            name,
            keys,
            parent: None,
        }
    }

    /// Creates an interface deriving from `parent`, adding `keys` to the
    /// parent's declared keys.
    #[must_use]
    pub const fn extending(name: &'static str, keys: &'static [&'static str], parent: &'static Self) -> Self {
        Self {
            name,
            keys,
            parent: Some(parent),
        }
    }

    /// Returns the interface name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the keys declared directly on this interface, excluding
    /// inherited ones.
    #[must_use]
    pub const fn own_keys(&self) -> &'static [&'static str] {
        self.keys
    }

    /// Returns the parent interface, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&'static Self> {
        self.parent
    }

    /// Returns `true` if this interface or any ancestor declares `key`.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        let mut current = Some(self);
        while let Some(interface) = current {
            if interface.keys.contains(&key) {
                return true;
            }
            current = interface.parent;
        }
        false
    }

    /// Returns `true` if a record of interface `other` is acceptable where
    /// this interface is required.
    ///
    /// The check is nominal: `other` must be this interface or derive from
    /// it. The open [`RECORD`] interface accepts everything.
    #[must_use]
    pub fn accepts(&self, other: &Self) -> bool {
        if self.name == RECORD.name {
            return true;
        }
        let mut current = Some(other);
        while let Some(interface) = current {
            if interface.name == self.name {
                return true;
            }
            current = interface.parent;
        }
        false
    }

    /// Iterates over all declared keys, own first, then inherited.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        let mut current = Some(self);
        std::iter::from_fn(move || {
            let interface = current?;
            current = interface.parent;
            Some(interface.keys.iter().copied())
        })
        .flatten()
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Interface {}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: Interface = Interface::new("base", &["foo", "bar"]);
    static DERIVED: Interface = Interface::extending("derived", &["baz"], &BASE);

    /// Tests that key declarations are visible through the parent chain.
    #[test]
    fn declares_walks_the_chain() {
        assert!(BASE.declares("foo"));
        assert!(!BASE.declares("baz"));
        assert!(DERIVED.declares("baz"));
        assert!(DERIVED.declares("foo"));
        assert!(!DERIVED.declares("nope"));
    }

    /// Tests the nominal acceptance rules, including the open root.
    #[test]
    fn accepts_is_nominal_and_directional() {
        assert!(BASE.accepts(&BASE));
        assert!(BASE.accepts(&DERIVED));
        assert!(!DERIVED.accepts(&BASE));
        assert!(RECORD.accepts(&BASE));
        assert!(!BASE.accepts(&RECORD));
    }

    /// Tests that `keys` yields own keys before inherited ones.
    #[test]
    fn keys_iterates_own_then_inherited() {
        let keys: Vec<&str> = DERIVED.keys().collect();
        assert_eq!(keys, vec!["baz", "foo", "bar"]);
    }

    /// Tests that the derivation metadata keeps own keys apart from
    /// inherited ones.
    #[test]
    fn own_keys_and_parent_expose_the_derivation() {
        assert_eq!(BASE.own_keys(), &["foo", "bar"]);
        assert_eq!(DERIVED.own_keys(), &["baz"]);
        assert_eq!(DERIVED.parent(), Some(&BASE));
        assert!(BASE.parent().is_none());
        assert!(RECORD.own_keys().is_empty());
    }
}

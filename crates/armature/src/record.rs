use crate::interface::Interface;
use crate::value::{Props, Value};

/// Fallback for reads of declared-but-unset keys.
static NULL: Value = Value::Null;

/// A target: the plain domain object an assembler builds and fills.
///
/// A record carries its [`Interface`] and an insertion-ordered map of own
/// properties. Reading a key the interface declares but no one has written
/// yet yields [`Value::Null`] rather than nothing, so a freshly created
/// record already answers for its declared shape.
///
/// Records live in a [`Registry`](crate::Registry) arena and are addressed
/// by [`TargetId`](crate::TargetId); the registry hands out `&Record` /
/// `&mut Record` for host-side access.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    interface: &'static Interface,
    props: Props,
}

impl Record {
    /// Creates an empty record of the given interface.
    #[must_use]
    pub fn new(interface: &'static Interface) -> Self {
        Self {
            interface,
            props: Props::new(),
        }
    }

    /// Returns the record's interface.
    #[must_use]
    pub fn interface(&self) -> &'static Interface {
        self.interface
    }

    /// Reads a property.
    ///
    /// Returns the own value if one was written, [`Value::Null`] if the
    /// interface declares the key, and `None` otherwise.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.props.get(key) {
            Some(value) => Some(value),
            None if self.interface.declares(key) => Some(&NULL),
            None => None,
        }
    }

    /// Writes a property. Writing [`Value::Undefined`] removes the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if value.is_undefined() {
            self.props.shift_remove(&key);
        } else {
            self.props.insert(key, value);
        }
    }

    /// Returns `true` if the record carries an own value for `key`
    /// (declared-only keys do not count).
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Iterates over own keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// Iterates over own entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of own properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns `true` if the record has no own properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Converts the own properties to a JSON object without resolving
    /// handle values.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .props
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json_value()))
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::RECORD;

    static SHAPED: Interface = Interface::new("shaped", &["foo", "bar"]);

    /// Tests that declared keys read as null before any write.
    #[test]
    fn declared_keys_default_to_null() {
        let record = Record::new(&SHAPED);
        assert_eq!(record.get("foo"), Some(&Value::Null));
        assert_eq!(record.get("nope"), None);
        assert!(record.is_empty());
    }

    /// Tests that writing undefined removes the key instead of storing it.
    #[test]
    fn undefined_write_removes() {
        let mut record = Record::new(&RECORD);
        record.set("a", 1_i64);
        assert!(record.has("a"));
        record.set("a", Value::Undefined);
        assert!(!record.has("a"));
        assert_eq!(record.get("a"), None);
    }

    /// Tests that own entries keep insertion order through the JSON dump.
    #[test]
    fn json_dump_preserves_insertion_order() {
        let mut record = Record::new(&RECORD);
        record.set("z", 1_i64);
        record.set("a", 2_i64);
        let json = serde_json::to_string(&record.to_json_value()).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2}"#);
    }
}

use std::fmt;

use indexmap::IndexMap;

use crate::registry::{InstanceId, TargetId};

/// Insertion-ordered property map shared by initializers, records and
/// instances. Application order is the iteration order of this map.
pub type Props = IndexMap<String, Value>;

/// A dynamic property value.
///
/// This is the currency of the assembly protocol: initializer entries,
/// record properties and instance properties all hold `Value`s. It owns all
/// its data and can be freely cloned and serialized; handles to registry
/// entities are plain ids, never references.
///
/// # JSON Serialization
///
/// [`Value::to_json_value`] maps scalars and containers to their natural
/// JSON counterparts. Handles have no natural mapping and serialize as
/// tagged markers:
/// - `Target` → `{"$target": n}`
/// - `Instance` → `{"$instance": n}`
///
/// Use [`Registry::to_json_value`] to resolve handles into the records they
/// point at.
///
/// [`Registry::to_json_value`]: crate::Registry::to_json_value
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// The absent value. Property application skips `Undefined` entries and
    /// writing `Undefined` to a record removes the key; it is never stored.
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit IEEE 754 float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered list of values.
    List(Vec<Self>),
    /// Nested insertion-ordered map.
    Map(Props),
    /// Handle to a record owned by a [`Registry`](crate::Registry).
    Target(TargetId),
    /// Handle to an assembled instance owned by a
    /// [`Registry`](crate::Registry).
    Instance(InstanceId),
}

/// Discriminant of a [`Value`], used in error messages and type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Target,
    Instance,
}

impl Value {
    /// Returns the discriminant of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Target(_) => ValueKind::Target,
            Self::Instance(_) => ValueKind::Instance,
        }
    }

    /// Returns the lowercase name of this value's kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind().into()
    }

    /// Returns `true` for [`Value::Undefined`].
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Converts this value to a `serde_json::Value` without resolving
    /// handles.
    ///
    /// `Undefined` maps to JSON `null`, as do non-finite floats (JSON has no
    /// representation for either).
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::{Value as JV, json};
        match self {
            Self::Undefined | Self::Null => JV::Null,
            Self::Bool(b) => JV::Bool(*b),
            Self::Int(i) => json!(i),
            Self::Float(f) => {
                if f.is_nan() || f.is_infinite() {
                    JV::Null
                } else {
                    json!(f)
                }
            }
            Self::Str(s) => JV::String(s.clone()),
            Self::List(items) => JV::Array(items.iter().map(Self::to_json_value).collect()),
            Self::Map(props) => {
                let map: serde_json::Map<String, JV> =
                    props.iter().map(|(k, v)| (k.clone(), v.to_json_value())).collect();
                JV::Object(map)
            }
            Self::Target(id) => json!({"$target": id.index()}),
            Self::Instance(id) => json!({"$instance": id.index()}),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(n) => {
                // Keep a decimal point so floats read as floats.
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(props) => {
                f.write_str("{")?;
                for (i, (key, value)) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Target(id) => write!(f, "<target {}>", id.index()),
            Self::Instance(id) => write!(f, "<instance {}>", id.index()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<Props> for Value {
    fn from(v: Props) -> Self {
        Self::Map(v)
    }
}

impl From<TargetId> for Value {
    fn from(id: TargetId) -> Self {
        Self::Target(id)
    }
}

impl From<InstanceId> for Value {
    fn from(id: InstanceId) -> Self {
        Self::Instance(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that kind names render lowercase for error messages.
    #[test]
    fn kind_names_are_lowercase() {
        assert_eq!(Value::Int(1).kind_name(), "int");
        assert_eq!(Value::Str(String::new()).kind_name(), "str");
        assert_eq!(Value::Undefined.kind_name(), "undefined");
        assert_eq!(Value::Target(TargetId::new(0)).kind_name(), "target");
    }

    /// Tests the natural JSON mappings, including the null collapse for
    /// undefined and non-finite floats.
    #[test]
    fn json_conversion_is_shallow_and_total() {
        assert_eq!(Value::Undefined.to_json_value(), serde_json::Value::Null);
        assert_eq!(Value::Float(f64::NAN).to_json_value(), serde_json::Value::Null);
        assert_eq!(Value::from(3_i64).to_json_value(), serde_json::json!(3));

        let handle = Value::Target(TargetId::new(7));
        assert_eq!(handle.to_json_value(), serde_json::json!({"$target": 7}));
    }

    /// Tests that display output reads as a JSON-flavoured literal.
    #[test]
    fn display_renders_literals() {
        let mut props = Props::new();
        props.insert("a".to_owned(), Value::from(1_i64));
        props.insert("b".to_owned(), Value::from(2.0));
        let value = Value::List(vec![Value::Map(props), Value::from("x")]);
        assert_eq!(value.to_string(), "[{\"a\": 1, \"b\": 2.0}, \"x\"]");
    }
}

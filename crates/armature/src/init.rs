use crate::value::{Props, Value};

/// An initializer: the description an instance is assembled from.
///
/// Construction accepts either a structured set of named entries or a bare
/// value. A bare [`Value::Map`] is indistinguishable from a structured
/// initializer and converts to [`Init::Entries`]; every other value stays
/// value-only and is routed through the assembler's declared value
/// property at normalization time.
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// Named entries, applied in insertion order.
    Entries(Props),
    /// A single value standing in for the whole initializer.
    Value(Value),
}

impl Init {
    /// The omitted initializer: no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::Entries(Props::new())
    }

    /// Builds a structured initializer from `(key, value)` pairs.
    #[must_use]
    pub fn entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Entries(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Normalizes this initializer into plain entries for the given
    /// assembler configuration.
    ///
    /// A value-only initializer becomes a single entry under
    /// `value_property`. When the assembler declares no value property the
    /// value has nowhere to go and is dropped; the result is the empty
    /// entry set, same as an omitted initializer. [`Value::Undefined`]
    /// always normalizes to the empty entry set.
    #[must_use]
    pub fn normalize(self, value_property: Option<&str>) -> Props {
        match self {
            Self::Entries(props) | Self::Value(Value::Map(props)) => props,
            Self::Value(Value::Undefined) => Props::new(),
            Self::Value(value) => match value_property {
                Some(name) => {
                    let mut props = Props::new();
                    props.insert(name.to_owned(), value);
                    props
                }
                None => Props::new(),
            },
        }
    }
}

impl From<Value> for Init {
    fn from(value: Value) -> Self {
        match value {
            Value::Map(props) => Self::Entries(props),
            other => Self::Value(other),
        }
    }
}

impl From<Props> for Init {
    fn from(props: Props) -> Self {
        Self::Entries(props)
    }
}

impl From<&str> for Init {
    fn from(v: &str) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<String> for Init {
    fn from(v: String) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<bool> for Init {
    fn from(v: bool) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<i64> for Init {
    fn from(v: i64) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<f64> for Init {
    fn from(v: f64) -> Self {
        Self::Value(Value::from(v))
    }
}

impl From<Vec<Value>> for Init {
    fn from(v: Vec<Value>) -> Self {
        Self::Value(Value::from(v))
    }
}

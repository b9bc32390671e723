//! Variable values and dotted-path resolution.
//!
//! Variables arrive as JSON or YAML trees from the host. They are converted
//! once into [`Value`], which the renderer walks by reference. Looking up a
//! path never fails: a missing key, an out-of-range index or indexing into a
//! scalar all produce `None`, which renders as an empty string and branches
//! as false.

use std::collections::BTreeMap;

/// A variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// Truthiness for `{% if %}`.
    ///
    /// `false`, `null`, the empty string and numeric zero (or NaN) are
    /// falsy. Everything else is truthy, including empty sequences and
    /// mappings.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Sequence(_) | Value::Mapping(_) => true,
        }
    }

    /// The text an interpolation of this value produces.
    ///
    /// Structured values have no text form and render as an empty string.
    pub fn render_to_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Sequence(_) | Value::Mapping(_) => String::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Index into this value with one path segment.
    ///
    /// Mappings are indexed by key, sequences by a decimal index.
    pub fn get(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(segment),
            Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Follow the remaining segments of a path from this value.
    pub fn lookup<'s, I>(&self, segments: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'s str>,
    {
        segments
            .into_iter()
            .try_fold(self, |value, segment| value.get(segment))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .filter_map(|(key, value)| yaml_key(key).map(|k| (k, Value::from(value))))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// Scalar YAML keys become strings; structured keys cannot be addressed by
/// a dotted path and are dropped.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returned when a variable tree's root is not a mapping.
#[derive(thiserror::Error, Debug)]
#[error("variables must be a mapping at the top level, found {found}")]
pub struct NotAMapping {
    pub found: &'static str,
}

/// The root variable context of a render.
///
/// Read-only during rendering; safe to share between concurrent renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    root: BTreeMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a top-level variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.root.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Merge another set of variables into this one; `other` wins on
    /// conflicting top-level names.
    pub fn merge(&mut self, other: Variables) {
        self.root.extend(other.root);
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for Variables {
    fn from(root: BTreeMap<String, Value>) -> Self {
        Self { root }
    }
}

impl TryFrom<Value> for Variables {
    type Error = NotAMapping;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            other => Err(NotAMapping {
                found: other.type_name(),
            }),
        }
    }
}

impl TryFrom<serde_json::Value> for Variables {
    type Error = NotAMapping;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Variables::try_from(Value::from(value))
    }
}

impl TryFrom<serde_yaml::Value> for Variables {
    type Error = NotAMapping;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        // An empty YAML document is an empty variable set.
        if value.is_null() {
            return Ok(Self::new());
        }
        Variables::try_from(Value::from(value))
    }
}

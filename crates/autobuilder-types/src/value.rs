//! Generated value tree.
//!
//! Every generation strategy produces a [`Value`]. `Value::Null` is the absent
//! value: it is what an unconstructible composite yields and what reference
//! typed members hold until populated.

use crate::type_expr::TypeExpr;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Fixed-point decimal: `mantissa / 10^scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Decimal {
    pub mantissa: i128,
    pub scale: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    pub fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Round `value` to `scale` fractional digits.
    pub fn from_f64(value: f64, scale: u32) -> Self {
        let factor = 10f64.powi(scale as i32);
        Self {
            mantissa: (value * factor).round() as i128,
            scale,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let divisor = 10i128.pow(self.scale);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let abs = self.mantissa.unsigned_abs();
        let divisor = divisor as u128;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / divisor,
            abs % divisor,
            width = self.scale as usize
        )
    }
}

/// One selected enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
}

/// List-like container: list, collection, set or plain sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub ty: TypeExpr,
    pub items: Vec<Value>,
    /// Set semantics: inserting an equal item is a no-op.
    pub unique: bool,
}

impl Sequence {
    pub fn new(ty: TypeExpr) -> Self {
        Self {
            ty,
            items: Vec::new(),
            unique: false,
        }
    }

    pub fn set(ty: TypeExpr) -> Self {
        Self {
            ty,
            items: Vec::new(),
            unique: true,
        }
    }

    /// Append an item. Returns `false` if set semantics rejected a duplicate.
    pub fn insert(&mut self, item: Value) -> bool {
        if self.unique && self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Key/value container. Keys are unique; insertion order is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    pub ty: TypeExpr,
    pub entries: Vec<(Value, Value)>,
    pub read_only: bool,
}

impl MapValue {
    pub fn new(ty: TypeExpr) -> Self {
        Self {
            ty,
            entries: Vec::new(),
            read_only: false,
        }
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert unless the key is already present. Returns whether it was inserted.
    pub fn try_insert(&mut self, key: Value, value: Value) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Instance of a composite type: member name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub ty: TypeExpr,
    fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(ty: TypeExpr) -> Self {
        Self {
            ty,
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    Text(String),
    Enum(EnumValue),
    Array(Vec<Value>),
    Sequence(Sequence),
    Map(MapValue),
    Object(Object),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Member lookup on an object value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(name))
    }

    /// Element count for arrays, sequences and maps.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            Value::Sequence(s) => Some(s.len()),
            Value::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::DateTime(_) => "datetime",
            Value::Guid(_) => "guid",
            Value::Text(_) => "string",
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
            Value::Sequence(_) => "sequence",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// Convert to JSON so generated trees can be handed to `serde` types.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => Json::from(*f as f64),
            Value::Double(d) => Json::from(*d),
            Value::Decimal(d) => Json::from(d.to_f64()),
            Value::DateTime(dt) => Json::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Guid(g) => Json::String(g.hyphenated().to_string()),
            Value::Text(s) => Json::String(s.clone()),
            Value::Enum(e) => Json::String(e.variant.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Sequence(s) => Json::Array(s.items.iter().map(Value::to_json).collect()),
            Value::Map(m) => Json::Object(
                m.entries
                    .iter()
                    .map(|(k, v)| (k.key_text(), v.to_json()))
                    .collect(),
            ),
            Value::Object(o) => Json::Object(
                o.fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn key_text(&self) -> String {
        match self.to_json() {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

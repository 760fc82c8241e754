//! Typed access to dictionary-backed parameters.
//!
//! A [`Schema`] lists each field once: its name, the key it is stored
//! under, its kind and its default. [`Params`] binds a JSON object to a
//! schema. Reads never fail on bad data: a missing key or a value of the
//! wrong kind yields the field's default. Writes are checked against the
//! schema and copy the underlying object only when it is shared.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::color::parse_hex;

/// Errors from schema lookups and writes.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("unknown parameter `{0}`")]
    UnknownField(String),

    #[error("parameter `{field}` is {expected:?}, not {found:?}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("parameters are read-only")]
    Immutable,

    #[error("parameters must be a JSON object")]
    NotAnObject,

    #[error("invalid parameter JSON")]
    Json(#[from] serde_json::Error),
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    String,
    Array,
    Dictionary,
}

impl FieldKind {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self::Integer),
            Value::Number(_) => Some(Self::Float),
            Value::String(_) => Some(Self::String),
            Value::Array(_) => Some(Self::Array),
            Value::Object(_) => Some(Self::Dictionary),
            Value::Null => None,
        }
    }

    /// Whether a value of kind `found` may be stored in a field of this kind.
    const fn accepts(self, found: Self) -> bool {
        matches!(
            (self, found),
            (Self::Bool, Self::Bool)
                | (Self::Integer, Self::Integer)
                | (Self::Float, Self::Float | Self::Integer)
                | (Self::String, Self::String)
                | (Self::Array, Self::Array)
                | (Self::Dictionary, Self::Dictionary)
        )
    }
}

/// One schema entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub key: &'static str,
    pub kind: FieldKind,
    pub default: Value,
}

impl Field {
    pub fn new(name: &'static str, key: &'static str, kind: FieldKind, default: Value) -> Self {
        Self {
            name,
            key,
            kind,
            default,
        }
    }
}

/// An ordered set of fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(
        mut self,
        name: &'static str,
        key: &'static str,
        kind: FieldKind,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(Field::new(name, key, kind, default.into()));
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Result<&Field, ParamsError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| ParamsError::UnknownField(name.to_string()))
    }
}

/// Values bound to a schema.
#[derive(Debug, Clone)]
pub struct Params {
    schema: Arc<Schema>,
    values: Arc<Map<String, Value>>,
    mutable: bool,
}

impl Params {
    /// Read-only parameters over `values`.
    pub fn new(schema: Arc<Schema>, values: Map<String, Value>) -> Self {
        Self {
            schema,
            values: Arc::new(values),
            mutable: false,
        }
    }

    /// Writable parameters over `values`.
    pub fn new_mutable(schema: Arc<Schema>, values: Map<String, Value>) -> Self {
        Self {
            mutable: true,
            ..Self::new(schema, values)
        }
    }

    /// Read-only parameters with no stored values.
    pub fn empty(schema: Arc<Schema>) -> Self {
        Self::new(schema, Map::new())
    }

    /// Parse a JSON object.
    pub fn from_json_str(schema: Arc<Schema>, json: &str) -> Result<Self, ParamsError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(values) => Ok(Self::new(schema, values)),
            _ => Err(ParamsError::NotAnObject),
        }
    }

    /// A writable copy sharing storage until the first write.
    #[must_use]
    pub fn to_mutable(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            values: Arc::clone(&self.values),
            mutable: true,
        }
    }

    /// A read-only view sharing storage.
    #[must_use]
    pub fn to_immutable(&self) -> Self {
        Self {
            mutable: false,
            ..self.clone()
        }
    }

    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The stored values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn to_json_string(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(&*self.values)?)
    }

    /// Whether a value is stored for `name`.
    pub fn exists(&self, name: &str) -> Result<bool, ParamsError> {
        let field = self.schema.get(name)?;
        let exists = self.values.contains_key(field.key);
        tracing::debug!(field = name, key = field.key, exists, "param exists");
        Ok(exists)
    }

    /// The stored value if it matches the field kind, else the default.
    fn value(&self, name: &str, kind: FieldKind) -> Result<&Value, ParamsError> {
        let field = self.schema.get(name)?;
        if field.kind != kind {
            return Err(ParamsError::KindMismatch {
                field: name.to_string(),
                expected: field.kind,
                found: kind,
            });
        }
        let stored = self
            .values
            .get(field.key)
            .filter(|value| FieldKind::of(value).is_some_and(|found| kind.accepts(found)));
        Ok(stored.unwrap_or(&field.default))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ParamsError> {
        let field = self.schema.get(name)?;
        if field.kind != FieldKind::Bool {
            return Err(ParamsError::KindMismatch {
                field: name.to_string(),
                expected: field.kind,
                found: FieldKind::Bool,
            });
        }
        let default = field.default.as_bool().unwrap_or(false);
        let value = self
            .values
            .get(field.key)
            .map_or(default, |value| safe_bool(value, default));
        tracing::debug!(field = name, value, "got bool param");
        Ok(value)
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, ParamsError> {
        let value = self.value(name, FieldKind::Integer)?.as_i64().unwrap_or(0);
        tracing::debug!(field = name, value, "got integer param");
        Ok(value)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, ParamsError> {
        let value = self.value(name, FieldKind::Float)?.as_f64().unwrap_or(0.0);
        tracing::debug!(field = name, value, "got float param");
        Ok(value)
    }

    pub fn get_str(&self, name: &str) -> Result<&str, ParamsError> {
        let value = self.value(name, FieldKind::String)?.as_str().unwrap_or("");
        tracing::debug!(field = name, value, "got string param");
        Ok(value)
    }

    pub fn get_array(&self, name: &str) -> Result<&[Value], ParamsError> {
        let value = self
            .value(name, FieldKind::Array)?
            .as_array()
            .map_or(&[][..], Vec::as_slice);
        tracing::debug!(field = name, len = value.len(), "got array param");
        Ok(value)
    }

    pub fn get_dictionary(&self, name: &str) -> Result<Option<&Map<String, Value>>, ParamsError> {
        let value = self.value(name, FieldKind::Dictionary)?.as_object();
        tracing::debug!(field = name, len = ?value.map(Map::len), "got dictionary param");
        Ok(value)
    }

    /// An integer stored as a hex string (`"#FF8800"`), or the default.
    pub fn get_hex(&self, name: &str) -> Result<u64, ParamsError> {
        let field = self.schema.get(name)?;
        let parse = |value: &Value| match value {
            Value::String(s) => parse_hex(s),
            Value::Number(n) => n.as_u64(),
            _ => None,
        };
        Ok(self
            .values
            .get(field.key)
            .and_then(parse)
            .or_else(|| parse(&field.default))
            .unwrap_or(0))
    }

    /// Decode a dictionary field into `T`.
    ///
    /// A stored value that does not decode is skipped in favor of the
    /// default; a default that does not decode is an error.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ParamsError> {
        let field = self.schema.get(name)?;
        if let Some(stored) = self.values.get(field.key) {
            match serde_json::from_value(stored.clone()) {
                Ok(value) => return Ok(value),
                Err(err) => tracing::debug!(field = name, %err, "stored param does not decode"),
            }
        }
        Ok(serde_json::from_value(field.default.clone())?)
    }

    /// Encode `value` and store it.
    pub fn set_as<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), ParamsError> {
        self.set(name, serde_json::to_value(value)?)
    }

    /// Store `value` under the field's key.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ParamsError> {
        if !self.mutable {
            return Err(ParamsError::Immutable);
        }
        let field = self.schema.get(name)?;
        let value = value.into();
        if let Some(found) = FieldKind::of(&value)
            && !field.kind.accepts(found)
        {
            return Err(ParamsError::KindMismatch {
                field: name.to_string(),
                expected: field.kind,
                found,
            });
        }
        tracing::debug!(field = name, key = field.key, value = %value, "set param");
        let key = field.key.to_string();
        if value.is_null() {
            Arc::make_mut(&mut self.values).remove(&key);
        } else {
            Arc::make_mut(&mut self.values).insert(key, value);
        }
        Ok(())
    }

    /// Remove the stored value so reads return the default again.
    pub fn clear(&mut self, name: &str) -> Result<(), ParamsError> {
        self.set(name, Value::Null)
    }
}

/// Lenient bool conversion.
///
/// Numbers are true when non-zero. Strings follow the usual property-list
/// reading: skip leading whitespace, sign and zeros, then `Y`, `y`, `T`,
/// `t` or a digit `1`-`9` means true, and any other string is false.
/// Only arrays, objects and null yield `default`.
pub fn safe_bool(value: &Value, default: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let rest = s
                .trim_start()
                .trim_start_matches(['+', '-'])
                .trim_start_matches('0');
            rest.chars()
                .next()
                .is_some_and(|c| matches!(c, 'Y' | 'y' | 'T' | 't' | '1'..='9'))
        }
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new()
                .field("title", "Title", FieldKind::String, "Untitled")
                .field("count", "Count", FieldKind::Integer, 3)
                .field("scale", "Scale", FieldKind::Float, 1.5)
                .field("enabled", "Enabled", FieldKind::Bool, true)
                .field("tags", "Tags", FieldKind::Array, json!([]))
                .field("extra", "Extra", FieldKind::Dictionary, json!({}))
                .field("tint", "Tint", FieldKind::String, "#000000"),
        )
    }

    fn values(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_missing_values_use_defaults() {
        let params = Params::empty(schema());
        assert_eq!(params.get_str("title").unwrap(), "Untitled");
        assert_eq!(params.get_i64("count").unwrap(), 3);
        assert!((params.get_f64("scale").unwrap() - 1.5).abs() < f64::EPSILON);
        assert!(params.get_bool("enabled").unwrap());
        assert!(params.get_array("tags").unwrap().is_empty());
        assert!(!params.exists("title").unwrap());
    }

    #[test]
    fn test_stored_values_are_read_by_key() {
        let params = Params::new(
            schema(),
            values(json!({"Title": "Hi", "Count": 7, "Tags": ["a"], "Extra": {"k": 1}})),
        );
        assert_eq!(params.get_str("title").unwrap(), "Hi");
        assert_eq!(params.get_i64("count").unwrap(), 7);
        assert_eq!(params.get_array("tags").unwrap(), &[json!("a")]);
        assert_eq!(params.get_dictionary("extra").unwrap().unwrap().len(), 1);
        assert!(params.exists("title").unwrap());
    }

    #[test]
    fn test_wrong_stored_kind_falls_back_to_default() {
        let params = Params::new(schema(), values(json!({"Title": 12, "Count": "many"})));
        assert_eq!(params.get_str("title").unwrap(), "Untitled");
        assert_eq!(params.get_i64("count").unwrap(), 3);
    }

    #[test]
    fn test_float_field_accepts_integer() {
        let params = Params::new(schema(), values(json!({"Scale": 2})));
        assert!((params.get_f64("scale").unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_field_and_kind_errors() {
        let params = Params::empty(schema());
        assert!(matches!(
            params.get_str("nope"),
            Err(ParamsError::UnknownField(name)) if name == "nope"
        ));
        assert!(matches!(
            params.get_i64("title"),
            Err(ParamsError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_immutable_refuses_writes() {
        let mut params = Params::empty(schema());
        assert!(matches!(
            params.set("title", "x"),
            Err(ParamsError::Immutable)
        ));
    }

    #[test]
    fn test_mutable_copy_on_write() {
        let original = Params::new(schema(), values(json!({"Title": "Original"})));
        let mut copy = original.to_mutable();
        copy.set("title", "Changed").unwrap();
        copy.set("count", 9).unwrap();
        assert_eq!(copy.get_str("title").unwrap(), "Changed");
        assert_eq!(copy.get_i64("count").unwrap(), 9);
        assert_eq!(original.get_str("title").unwrap(), "Original");
        assert!(!original.exists("count").unwrap());
        assert!(!copy.to_immutable().is_mutable());
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut params = Params::new_mutable(schema(), Map::new());
        let err = params.set("count", "seven").unwrap_err();
        assert!(matches!(
            err,
            ParamsError::KindMismatch {
                expected: FieldKind::Integer,
                found: FieldKind::String,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "parameter `count` is Integer, not String"
        );
    }

    #[test]
    fn test_clear_restores_default() {
        let mut params = Params::new_mutable(schema(), Map::new());
        params.set("title", "Temp").unwrap();
        params.clear("title").unwrap();
        assert_eq!(params.get_str("title").unwrap(), "Untitled");
        assert!(!params.exists("title").unwrap());
    }

    #[test]
    fn test_hex_values() {
        let params = Params::new(schema(), values(json!({"Tint": "#FF8800"})));
        assert_eq!(params.get_hex("tint").unwrap(), 0xFF_8800);
        assert_eq!(Params::empty(schema()).get_hex("tint").unwrap(), 0);
    }

    #[test]
    fn test_json_round_trip_through_text() {
        let params = Params::from_json_str(schema(), r#"{"Title": "From JSON"}"#).unwrap();
        assert_eq!(params.get_str("title").unwrap(), "From JSON");
        let text = params.to_json_string().unwrap();
        assert!(text.contains("From JSON"));
    }

    #[test]
    fn test_json_must_be_object() {
        assert!(matches!(
            Params::from_json_str(schema(), "[1, 2]"),
            Err(ParamsError::NotAnObject)
        ));
        assert!(matches!(
            Params::from_json_str(schema(), "{"),
            Err(ParamsError::Json(_))
        ));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Window {
        width: u32,
        height: u32,
    }

    #[test]
    fn test_typed_dictionary_round_trip() {
        let schema = Arc::new(Schema::new().field(
            "window",
            "Window",
            FieldKind::Dictionary,
            json!({"width": 640, "height": 480}),
        ));
        let mut params = Params::empty(schema).to_mutable();
        assert_eq!(
            params.get_as::<Window>("window").unwrap(),
            Window {
                width: 640,
                height: 480
            }
        );

        let wide = Window {
            width: 1920,
            height: 480,
        };
        params.set_as("window", &wide).unwrap();
        assert_eq!(params.get_as::<Window>("window").unwrap(), wide);
        assert_eq!(params.values()["Window"]["width"], json!(1920));
    }

    #[test]
    fn test_typed_read_skips_undecodable_value() {
        let schema = Arc::new(Schema::new().field(
            "window",
            "Window",
            FieldKind::Dictionary,
            json!({"width": 1, "height": 2}),
        ));
        let params = Params::from_json_str(schema, r#"{"Window": {"width": "wide"}}"#).unwrap();
        assert_eq!(params.get_as::<Window>("window").unwrap().width, 1);
    }

    #[test]
    fn test_field_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(FieldKind::Dictionary).unwrap(),
            json!("dictionary")
        );
        let kind: FieldKind = serde_json::from_value(json!("float")).unwrap();
        assert_eq!(kind, FieldKind::Float);
    }

    #[test]
    fn test_safe_bool() {
        assert!(safe_bool(&json!(true), false));
        assert!(safe_bool(&json!(1), false));
        assert!(!safe_bool(&json!(0), true));
        assert!(safe_bool(&json!("YES"), false));
        assert!(safe_bool(&json!("true"), false));
        assert!(safe_bool(&json!("  007"), false));
        assert!(!safe_bool(&json!("no"), true));
        assert!(!safe_bool(&json!("000"), true));
        assert!(safe_bool(&json!(null), true));
        assert!(!safe_bool(&json!([1]), false));
        assert!(safe_bool(&json!({"on": true}), true));
    }

    #[test]
    fn test_bool_field_reads_strings_leniently() {
        let params = Params::new(schema(), values(json!({"Enabled": "no"})));
        assert!(!params.get_bool("enabled").unwrap());
    }
}

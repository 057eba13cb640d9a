use std::borrow::Cow;

use indexmap::IndexMap;

use crate::{Type, write_float, write_string};

/// The members of an object, in the order they first appeared.
pub type Map = IndexMap<String, Value>;

/// A JSON value, independent of any type it may later be bound to.
///
/// Each value exclusively owns its children, so a tree of values is always acyclic.
#[derive(Clone, PartialEq, Default, Debug)]
pub enum Value {
  /// `null`.
  #[default]
  Null,
  /// `true` or `false`.
  Bool(bool),
  /// A numeral without a decimal marker.
  Integer(i64),
  /// A numeral with a decimal marker.
  Float(f64),
  /// A string, with its escape sequences translated.
  String(String),
  /// An array.
  Array(Vec<Value>),
  /// An object.
  ///
  /// If a key was present multiple times, the last value is kept at the key's first position.
  Object(Map),
}

impl Value {
  /// The type of this value.
  pub fn kind(&self) -> Type {
    match self {
      Value::Null => Type::Null,
      Value::Bool(_) => Type::Bool,
      Value::Integer(_) | Value::Float(_) => Type::Number,
      Value::String(_) => Type::String,
      Value::Array(_) => Type::Array,
      Value::Object(_) => Type::Object,
    }
  }

  /// If this value is `null`.
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// This value as a `bool`, if it is one.
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as an `i64`, if it's an integer.
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Integer(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as an `f64`, if it's a number.
  #[allow(clippy::cast_precision_loss)]
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Integer(value) => Some(*value as f64),
      Value::Float(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as a `str`, if it's a string.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(value) => Some(value),
      _ => None,
    }
  }

  /// This value's items, if it's an array.
  pub fn as_array(&self) -> Option<&[Value]> {
    match self {
      Value::Array(items) => Some(items),
      _ => None,
    }
  }

  /// This value's members, if it's an object.
  pub fn as_object(&self) -> Option<&Map> {
    match self {
      Value::Object(members) => Some(members),
      _ => None,
    }
  }

  /// Fetch a member of this value, if it's an object with such a member.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.as_object()?.get(key)
  }

  /// The textual form of this value.
  ///
  /// Strings are yielded as-is. Numbers are written in decimal, independent of locale, with
  /// integral floats written without a fractional part. Booleans are `true` or `false` and `null`
  /// is the empty string. Arrays and objects are written as compact JSON.
  pub fn text(&self) -> Cow<'_, str> {
    match self {
      Value::Null => Cow::Borrowed(""),
      Value::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
      Value::Integer(value) => Cow::Owned(value.to_string()),
      Value::Float(value) => Cow::Owned(value.to_string()),
      Value::String(value) => Cow::Borrowed(value),
      Value::Array(_) | Value::Object(_) => Cow::Owned(self.to_string()),
    }
  }

  /// Write this value as compact JSON.
  pub fn write_json(&self, out: &mut String) {
    match self {
      Value::Null => out.push_str("null"),
      Value::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
      Value::Integer(value) => out.push_str(&value.to_string()),
      Value::Float(value) => write_float(out, *value),
      Value::String(value) => write_string(out, value),
      Value::Array(items) => {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
          if i != 0 {
            out.push(',');
          }
          item.write_json(out);
        }
        out.push(']');
      }
      Value::Object(members) => {
        out.push('{');
        for (i, (key, value)) in members.iter().enumerate() {
          if i != 0 {
            out.push(',');
          }
          write_string(out, key);
          out.push(':');
          value.write_json(out);
        }
        out.push('}');
      }
    }
  }
}

impl core::fmt::Display for Value {
  /// Display this value as compact JSON.
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let mut out = String::new();
    self.write_json(&mut out);
    f.write_str(&out)
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}
impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Integer(value)
  }
}
impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
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
impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(items: Vec<T>) -> Self {
    Value::Array(items.into_iter().map(Into::into).collect())
  }
}
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
  /// Collect members into an object, the last value for a repeated key winning.
  fn from_iter<I: IntoIterator<Item = (K, V)>>(members: I) -> Self {
    Value::Object(members.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
  }
}

#[test]
fn textual_form() {
  assert_eq!(Value::Null.text(), "");
  assert_eq!(Value::Bool(false).text(), "false");
  assert_eq!(Value::Integer(-12).text(), "-12");
  assert_eq!(Value::Float(3.0).text(), "3");
  assert_eq!(Value::Float(4.5).text(), "4.5");
  assert_eq!(Value::from("text").text(), "text");
  assert_eq!(Value::from(vec![Value::Null, Value::from(1.5)]).text(), "[null,1.5]");
}

#[test]
fn compact_json() {
  let object: Value = [("b", Value::from(1i64)), ("a", Value::from("x\"y")), ("c", Value::Null)]
    .into_iter()
    .collect();
  assert_eq!(object.to_string(), r#"{"b":1,"a":"x\"y","c":null}"#);
  assert_eq!(object.get("a").and_then(Value::as_str), Some("x\"y"));
  assert_eq!(object.kind(), Type::Object);
}

#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub use json_bind::*;

mod kind;
pub use kind::FieldKind;
mod schema;
pub use schema::{FieldDescriptor, Schema, describe, is_sequence_type, is_keyed_map_type};
mod context;
pub use context::{Mode, NullStyle, DateTimeFormat, Context, set_date_time_format, set_default_context};
mod registry;
pub use registry::{
  Composite, CompositeConverter, ConverterRegistry, Registered, register_composite,
  deserialize_composite, serialize_composite,
};
mod fields;
pub use fields::{Fields, FieldWriter};

mod primitives;
mod float;
mod string;
mod temporal;
pub use temporal::DateTime;
mod enumerated;
pub use enumerated::{JsonEnum, deserialize_enum, serialize_enum};
mod sequences;
mod maps;
mod option;
mod boxed;
mod raw;

/// An error when binding or emitting.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum JsonError {
  /// An enumerated field held a name which isn't one of its variants.
  ///
  /// This is reported regardless of the mode.
  #[error("`{name}` isn't a variant of `{type_name}`")]
  UnknownVariant {
    /// The enumerated type.
    type_name: &'static str,
    /// The name which was present.
    name: String,
  },
  /// A composite field's type wasn't present within the context's registry.
  ///
  /// This is reported regardless of the mode.
  #[error("`{0}` isn't a registered composite type")]
  UnregisteredComposite(&'static str),
  /// The JSON was malformed.
  #[error("malformed JSON: {0}")]
  Parse(#[from] ParseError),
  /// A leaf's textual form couldn't be converted to the field's type.
  #[error("`{text}` couldn't be read as `{type_name}`")]
  InvalidLeaf {
    /// The type being converted to.
    type_name: &'static str,
    /// The textual form of the value.
    text: String,
  },
  /// A value had a shape other than the one expected.
  #[error("expected {expected}, found {found}")]
  UnexpectedShape {
    /// The expected type.
    expected: Type,
    /// The type present.
    found: Type,
  },
  /// A composite value was missing one of its components.
  #[error("`{type_name}` was missing its `{component}` component")]
  IncompleteComposite {
    /// The registered name of the composite type.
    type_name: &'static str,
    /// The missing component.
    component: &'static str,
  },
  /// A fixed-length array was bound from an array of another length.
  #[error("expected an array of length {expected}, found one of length {found}")]
  LengthMismatch {
    /// The length of the fixed-length array.
    expected: usize,
    /// The length of the array present.
    found: usize,
  },
  /// The field's type can't be bound.
  #[error("binding {0} is unsupported")]
  Unsupported(&'static str),
  /// A date/time format description couldn't be parsed.
  #[error("invalid date/time format: {0}")]
  InvalidDateTimeFormat(String),
}

/// An item which can be bound from a `Value`.
pub trait JsonDeserialize: Sized {
  /// The kind of field this is.
  fn kind() -> FieldKind;

  /// Bind this item from a `Value`.
  ///
  /// Within a lenient context, a malformed value yields a default.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError>;
}

/// An item which can be emitted as JSON.
pub trait JsonSerialize {
  /// Write this item as JSON.
  fn serialize(&self, context: &Context, out: &mut String);
}

/// A structure of named fields, represented as a JSON object.
///
/// This is expected to be derived with `json_bind_derive::JsonStructure`.
pub trait JsonStructure: 'static + Default + JsonDeserialize + JsonSerialize {
  /// The bindable fields of this structure.
  ///
  /// [`describe`] should be preferred, as it caches the result.
  fn schema() -> Schema;

  /// Bind the present fields onto this structure.
  ///
  /// Fields without a corresponding member are left as-is.
  fn bind_fields(&mut self, fields: &Fields<'_>) -> Result<(), JsonError>;

  /// Write each field of this structure.
  fn emit_fields(&self, fields: &mut FieldWriter<'_>);

  /// Deserialize this structure from JSON, with the process-wide default context.
  ///
  /// This method SHOULD NOT be overriden.
  fn deserialize_structure(json: &str) -> Result<Self, JsonError> {
    deserialize(json)
  }

  /// Deserialize this structure from JSON.
  ///
  /// This method SHOULD NOT be overriden.
  fn deserialize_structure_with(json: &str, context: &Context) -> Result<Self, JsonError> {
    deserialize_with(json, context)
  }

  /// Serialize this structure as JSON, with the process-wide default context.
  ///
  /// This method SHOULD NOT be overriden.
  fn serialize_structure(&self) -> String {
    serialize(self)
  }
}

/// Bind a structure from a `Value`.
///
/// `null` yields the default structure, as does any other non-object (unless the context is
/// strict). Members without a corresponding field are ignored.
pub fn bind<T: JsonStructure>(value: &Value, context: &Context) -> Result<T, JsonError> {
  let mut result = T::default();
  let members = match value {
    Value::Object(members) => members,
    Value::Null => return Ok(result),
    _ => {
      context.unexpected_shape(Type::Object, value)?;
      return Ok(result);
    }
  };

  let schema = describe::<T>();
  for key in members.keys() {
    if schema.field(key).is_none() {
      tracing::trace!(type_name = schema.type_name(), key = key.as_str(), "ignored unknown key");
    }
  }

  result.bind_fields(&Fields::new(members, context))?;
  Ok(result)
}

/// Write a structure as a JSON object.
pub fn emit_structure<T: JsonStructure>(value: &T, context: &Context, out: &mut String) {
  out.push('{');
  value.emit_fields(&mut FieldWriter::new(out, context));
  // Every field is followed by a separator, so the last one is trimmed
  if out.ends_with(',') {
    out.pop();
  }
  out.push('}');
}

/// Deserialize an item from JSON, with the process-wide default context.
///
/// Within a lenient context, this only fails if an enumerated field held an unknown name or a
/// composite field's type wasn't registered. JSON which doesn't describe the item yields its
/// default.
pub fn deserialize<T: JsonDeserialize>(json: &str) -> Result<T, JsonError> {
  deserialize_with(json, &Context::current())
}

/// Deserialize an item from JSON.
pub fn deserialize_with<T: JsonDeserialize>(json: &str, context: &Context) -> Result<T, JsonError> {
  let parser = Parser::new(json).with_max_depth(context.max_depth());
  let value = match context.mode() {
    Mode::Lenient => parser.lenient(),
    Mode::Strict => parser.strict()?,
  };
  T::deserialize(&value, context)
}

/// Serialize an item as JSON, with the process-wide default context.
pub fn serialize<T: ?Sized + JsonSerialize>(value: &T) -> String {
  serialize_with(value, &Context::current())
}

/// Serialize an item as JSON.
pub fn serialize_with<T: ?Sized + JsonSerialize>(value: &T, context: &Context) -> String {
  let mut out = String::new();
  value.serialize(context, &mut out);
  out
}

#[test]
fn facade() {
  let strict = Context::new().with_mode(Mode::Strict);
  assert_eq!(deserialize_with::<Vec<i32>>("[1, 2, 3]", &strict), Ok(vec![1, 2, 3]));
  assert!(matches!(
    deserialize_with::<Vec<i32>>("[1, 2", &strict),
    Err(JsonError::Parse(ParseError { kind: ParseErrorKind::UnexpectedEnd, .. }))
  ));
  assert_eq!(deserialize_with::<Vec<i32>>("[1, 2", &Context::new()), Ok(vec![]));
  assert_eq!(serialize_with(&[1.5f64, 2.0][..], &Context::new()), "[1.5,2.0]");
}

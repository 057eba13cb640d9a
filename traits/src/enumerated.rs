use crate::{Value, write_string, JsonError, Context};

/// A set of named constants, represented as their names.
///
/// This is expected to be derived with `json_bind_derive::JsonEnum`, which also implements
/// `JsonDeserialize` and `JsonSerialize` via [`deserialize_enum`] and [`serialize_enum`].
pub trait JsonEnum: 'static + Sized {
  /// The names of the constants.
  const VARIANTS: &'static [&'static str];

  /// The constant with this name, if there is one.
  ///
  /// Names are case-sensitive.
  fn from_name(name: &str) -> Option<Self>;

  /// The name of this constant.
  fn name(&self) -> &'static str;
}

/// Bind a constant from the textual form of a `Value`.
///
/// A name which isn't one of the constants is always an error, regardless of the mode.
pub fn deserialize_enum<T: JsonEnum>(value: &Value, _context: &Context) -> Result<T, JsonError> {
  let name = value.text();
  T::from_name(&name).ok_or_else(|| JsonError::UnknownVariant {
    type_name: core::any::type_name::<T>(),
    name: name.into_owned(),
  })
}

/// Write a constant as its name.
pub fn serialize_enum<T: JsonEnum>(value: &T, out: &mut String) {
  write_string(out, value.name());
}

use crate::{Type, Value, write_string, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

impl JsonDeserialize for String {
  fn kind() -> FieldKind {
    FieldKind::Text
  }

  /// This accepts the textual form of any scalar, with `null` being the empty string.
  ///
  /// Arrays and objects are accepted as their JSON unless the context is strict.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    if matches!(value, Value::Array(_) | Value::Object(_)) {
      context.unexpected_shape(Type::String, value)?;
    }
    Ok(value.text().into_owned())
  }
}

impl JsonDeserialize for char {
  fn kind() -> FieldKind {
    FieldKind::Text
  }

  /// This accepts a textual form which is a single character, with `null` being `'\0'`.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    if value.is_null() {
      return Ok(char::default());
    }
    let text = value.text();
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
      (Some(char), None) => Ok(char),
      _ => {
        context.invalid_leaf("char", value)?;
        Ok(char::default())
      }
    }
  }
}

impl JsonSerialize for str {
  fn serialize(&self, _context: &Context, out: &mut String) {
    write_string(out, self);
  }
}

impl JsonSerialize for String {
  fn serialize(&self, context: &Context, out: &mut String) {
    self.as_str().serialize(context, out);
  }
}

impl JsonSerialize for char {
  fn serialize(&self, _context: &Context, out: &mut String) {
    write_string(out, self.encode_utf8(&mut [0; 4]));
  }
}

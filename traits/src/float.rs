use crate::{Value, write_float, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};
use crate::primitives::read_number;

impl JsonDeserialize for f64 {
  fn kind() -> FieldKind {
    FieldKind::Float
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    match value {
      Value::Float(float) => Ok(*float),
      _ => read_number(value, context),
    }
  }
}

impl JsonDeserialize for f32 {
  fn kind() -> FieldKind {
    FieldKind::Float
  }
  /// This reads the nearest `f32` to the number's decimal representation.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    read_number(value, context)
  }
}

impl JsonSerialize for f64 {
  /// Non-finite values are written as `null`.
  fn serialize(&self, _context: &Context, out: &mut String) {
    write_float(out, *self);
  }
}

impl JsonSerialize for f32 {
  /// Non-finite values are written as `null`.
  fn serialize(&self, _context: &Context, out: &mut String) {
    write_float(out, *self);
  }
}

use crate::{Value, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

/// Read a number from the textual form of a value.
///
/// `null` reads as the default without complaint.
pub(crate) fn read_number<T: core::str::FromStr + Default>(
  value: &Value,
  context: &Context,
) -> Result<T, JsonError> {
  if value.is_null() {
    return Ok(T::default());
  }
  match value.text().trim().parse() {
    Ok(number) => Ok(number),
    Err(_) => {
      context.invalid_leaf(core::any::type_name::<T>(), value)?;
      Ok(T::default())
    }
  }
}

macro_rules! integer {
  ($($integer: ty),*) => {
    $(
      impl JsonDeserialize for $integer {
        fn kind() -> FieldKind {
          FieldKind::Integer
        }
        fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
          read_number(value, context)
        }
      }

      impl JsonSerialize for $integer {
        fn serialize(&self, _context: &Context, out: &mut String) {
          out.push_str(&self.to_string());
        }
      }
    )*
  };
}
integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl JsonDeserialize for bool {
  fn kind() -> FieldKind {
    FieldKind::Boolean
  }

  /// This accepts a boolean or the text `true`/`false`.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    match value {
      Value::Bool(value) => Ok(*value),
      Value::Null => Ok(false),
      _ => match &*value.text() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => {
          context.invalid_leaf("bool", value)?;
          Ok(false)
        }
      },
    }
  }
}

impl JsonSerialize for bool {
  fn serialize(&self, _context: &Context, out: &mut String) {
    out.push_str(if *self { "true" } else { "false" });
  }
}

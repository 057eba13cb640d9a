use crate::{Value, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

impl JsonDeserialize for Value {
  fn kind() -> FieldKind {
    FieldKind::Raw
  }
  /// This takes the value as-is.
  fn deserialize(value: &Value, _context: &Context) -> Result<Self, JsonError> {
    Ok(value.clone())
  }
}

impl JsonSerialize for Value {
  /// A `null` value is written per the context's `NullStyle`. Any `null` within an array or object
  /// is written as the literal.
  fn serialize(&self, context: &Context, out: &mut String) {
    match self {
      Value::Null => context.write_null(out),
      _ => self.write_json(out),
    }
  }
}

#[test]
fn raw() {
  use crate::{parse, serialize_with};

  let context = Context::new();
  let value = parse(r#"{"a":[1,null,{"b":"c"}]}"#);
  assert_eq!(Value::deserialize(&value, &context).as_ref(), Ok(&value));
  assert_eq!(serialize_with(&value, &context), r#"{"a":[1,null,{"b":"c"}]}"#);
  assert_eq!(serialize_with(&Value::Null, &context), r#""null""#);
}

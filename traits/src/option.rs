use crate::{Value, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

impl<T: JsonDeserialize> JsonDeserialize for Option<T> {
  fn kind() -> FieldKind {
    FieldKind::Optional { inner: Box::new(T::kind()) }
  }
  /// This will accept `null` as a representation of `None`.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    if value.is_null() {
      return Ok(None);
    }
    T::deserialize(value, context).map(Some)
  }
}

impl<T: JsonSerialize> JsonSerialize for Option<T> {
  /// This will serialize `Some(value)` as `value` and `None` per the context's `NullStyle`.
  fn serialize(&self, context: &Context, out: &mut String) {
    match self {
      Some(value) => value.serialize(context, out),
      None => context.write_null(out),
    }
  }
}

#[test]
fn optional() {
  use crate::{NullStyle, serialize_with};

  let context = Context::new();
  assert_eq!(Option::<u8>::deserialize(&Value::Null, &context), Ok(None));
  assert_eq!(Option::<u8>::deserialize(&Value::Integer(3), &context), Ok(Some(3)));
  assert_eq!(Option::<String>::deserialize(&Value::from(""), &context), Ok(Some(String::new())));

  assert_eq!(serialize_with(&Some(3u8), &context), "3");
  assert_eq!(serialize_with(&None::<u8>, &context), r#""null""#);
  assert_eq!(serialize_with(&None::<u8>, &context.with_null_style(NullStyle::Literal)), "null");
}

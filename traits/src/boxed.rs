use crate::{Value, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

impl<T: JsonDeserialize> JsonDeserialize for Box<T> {
  fn kind() -> FieldKind {
    T::kind()
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    T::deserialize(value, context).map(Box::new)
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for Box<T> {
  fn serialize(&self, context: &Context, out: &mut String) {
    T::serialize(self, context, out);
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for &T {
  fn serialize(&self, context: &Context, out: &mut String) {
    T::serialize(self, context, out);
  }
}

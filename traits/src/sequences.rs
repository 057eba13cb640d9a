use std::collections::VecDeque;

use crate::{Type, Value, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

/// The items of a value expected to be an array.
///
/// `null` has no items. Any other non-array has none either, unless the context is strict.
fn items<'value>(value: &'value Value, context: &Context) -> Result<&'value [Value], JsonError> {
  match value {
    Value::Array(items) => Ok(items),
    Value::Null => Ok(&[]),
    _ => {
      context.unexpected_shape(Type::Array, value)?;
      Ok(&[])
    }
  }
}

/// Write items as a JSON array.
fn write_items<'a, T: 'a + JsonSerialize>(
  items: impl Iterator<Item = &'a T>,
  context: &Context,
  out: &mut String,
) {
  out.push('[');
  for (i, item) in items.enumerate() {
    if i != 0 {
      out.push(',');
    }
    item.serialize(context, out);
  }
  out.push(']');
}

impl<T: JsonDeserialize> JsonDeserialize for Vec<T> {
  fn kind() -> FieldKind {
    FieldKind::Sequence { element: Box::new(T::kind()) }
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    items(value, context)?.iter().map(|item| T::deserialize(item, context)).collect()
  }
}

impl<T: JsonDeserialize> JsonDeserialize for VecDeque<T> {
  fn kind() -> FieldKind {
    FieldKind::Sequence { element: Box::new(T::kind()) }
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    items(value, context)?.iter().map(|item| T::deserialize(item, context)).collect()
  }
}

impl<T: JsonDeserialize> JsonDeserialize for Box<[T]> {
  fn kind() -> FieldKind {
    FieldKind::Array { element: Box::new(T::kind()), len: None }
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    Vec::deserialize(value, context).map(Vec::into_boxed_slice)
  }
}

impl<T: Default + JsonDeserialize, const N: usize> JsonDeserialize for [T; N] {
  fn kind() -> FieldKind {
    FieldKind::Array { element: Box::new(T::kind()), len: Some(N) }
  }

  /// Items beyond the array's length are ignored, and missing items are left as their default,
  /// unless the context is strict.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    let items = items(value, context)?;
    if !(items.is_empty() || (items.len() == N)) {
      context.absorb(JsonError::LengthMismatch { expected: N, found: items.len() })?;
    }
    let mut result: Self = core::array::from_fn(|_| T::default());
    for (slot, item) in result.iter_mut().zip(items) {
      *slot = T::deserialize(item, context)?;
    }
    Ok(result)
  }
}

impl<T: JsonSerialize> JsonSerialize for [T] {
  fn serialize(&self, context: &Context, out: &mut String) {
    write_items(self.iter(), context, out);
  }
}

impl<T: JsonSerialize, const N: usize> JsonSerialize for [T; N] {
  fn serialize(&self, context: &Context, out: &mut String) {
    self.as_slice().serialize(context, out);
  }
}

impl<T: JsonSerialize> JsonSerialize for Vec<T> {
  fn serialize(&self, context: &Context, out: &mut String) {
    self.as_slice().serialize(context, out);
  }
}

impl<T: JsonSerialize> JsonSerialize for VecDeque<T> {
  fn serialize(&self, context: &Context, out: &mut String) {
    write_items(self.iter(), context, out);
  }
}

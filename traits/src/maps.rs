use core::hash::{Hash, BuildHasher};
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::{Value, write_string, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

/// Maps can't be bound, so they're always bound as empty.
fn unsupported(value: &Value, context: &Context) -> Result<(), JsonError> {
  if value.is_null() {
    return Ok(());
  }
  context.absorb(JsonError::Unsupported("maps"))
}

/// Write entries as a JSON object.
fn write_entries<'a, K: 'a + AsRef<str>, V: 'a + JsonSerialize>(
  entries: impl Iterator<Item = (&'a K, &'a V)>,
  context: &Context,
  out: &mut String,
) {
  out.push('{');
  for (i, (key, value)) in entries.enumerate() {
    if i != 0 {
      out.push(',');
    }
    write_string(out, key.as_ref());
    out.push(':');
    value.serialize(context, out);
  }
  out.push('}');
}

impl<K: Ord, V: JsonDeserialize> JsonDeserialize for BTreeMap<K, V> {
  fn kind() -> FieldKind {
    FieldKind::Map { value: Box::new(V::kind()) }
  }
  /// Maps are unsupported, so this always yields an empty map.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    unsupported(value, context)?;
    Ok(BTreeMap::new())
  }
}

impl<K: Eq + Hash, V: JsonDeserialize, S: BuildHasher + Default> JsonDeserialize
  for HashMap<K, V, S>
{
  fn kind() -> FieldKind {
    FieldKind::Map { value: Box::new(V::kind()) }
  }
  /// Maps are unsupported, so this always yields an empty map.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    unsupported(value, context)?;
    Ok(HashMap::default())
  }
}

impl<K: Eq + Hash, V: JsonDeserialize, S: BuildHasher + Default> JsonDeserialize
  for IndexMap<K, V, S>
{
  fn kind() -> FieldKind {
    FieldKind::Map { value: Box::new(V::kind()) }
  }
  /// Maps are unsupported, so this always yields an empty map.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    unsupported(value, context)?;
    Ok(IndexMap::default())
  }
}

impl<K: AsRef<str>, V: JsonSerialize> JsonSerialize for BTreeMap<K, V> {
  fn serialize(&self, context: &Context, out: &mut String) {
    write_entries(self.iter(), context, out);
  }
}

impl<K: AsRef<str>, V: JsonSerialize, S> JsonSerialize for HashMap<K, V, S> {
  /// Entries are written in the map's iteration order.
  fn serialize(&self, context: &Context, out: &mut String) {
    write_entries(self.iter(), context, out);
  }
}

impl<K: AsRef<str>, V: JsonSerialize, S> JsonSerialize for IndexMap<K, V, S> {
  fn serialize(&self, context: &Context, out: &mut String) {
    write_entries(self.iter(), context, out);
  }
}

use core::any::TypeId;
use std::{collections::HashMap, sync::{PoisonError, RwLock}};

use once_cell::sync::Lazy;

use crate::{FieldKind, JsonDeserialize, JsonStructure};

/// A bindable field of a structure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldDescriptor {
  name: &'static str,
  kind: FieldKind,
}

impl FieldDescriptor {
  /// Describe a field.
  pub fn new(name: &'static str, kind: FieldKind) -> Self {
    FieldDescriptor { name, kind }
  }

  /// The key this field is represented with.
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// The kind of this field.
  pub fn kind(&self) -> &FieldKind {
    &self.kind
  }
}

/// The bindable fields of a structure, in declaration order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Schema {
  type_name: &'static str,
  fields: Vec<FieldDescriptor>,
}

impl Schema {
  /// Create a schema.
  pub fn new(type_name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
    Schema { type_name, fields }
  }

  /// The name of the structure.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// The fields of the structure.
  pub fn fields(&self) -> &[FieldDescriptor] {
    &self.fields
  }

  /// The field represented with this key, if there is one.
  pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
    self.fields.iter().find(|field| field.name == name)
  }
}

static SCHEMAS: Lazy<RwLock<HashMap<TypeId, &'static Schema>>> =
  Lazy::new(|| RwLock::new(HashMap::new()));

/// The schema of a structure.
///
/// Schemas are computed once per type and then shared for the lifetime of the process. If multiple
/// threads race to compute a schema, the first one published is kept.
pub fn describe<T: JsonStructure>() -> &'static Schema {
  let id = TypeId::of::<T>();
  if let Some(schema) = SCHEMAS.read().unwrap_or_else(PoisonError::into_inner).get(&id).copied() {
    return schema;
  }

  // Computed without holding the lock, so this may run more than once
  let schema = T::schema();
  tracing::trace!(
    type_name = schema.type_name(),
    fields = schema.fields().len(),
    "resolved schema"
  );
  let mut schemas = SCHEMAS.write().unwrap_or_else(PoisonError::into_inner);
  *schemas.entry(id).or_insert_with(|| &*Box::leak(Box::new(schema)))
}

/// If this type is bound as an array or a sequence.
pub fn is_sequence_type<T: JsonDeserialize>() -> bool {
  T::kind().is_sequence()
}

/// If this type is bound as a map keyed by strings.
pub fn is_keyed_map_type<T: JsonDeserialize>() -> bool {
  T::kind().is_keyed_map()
}

#[test]
fn capabilities() {
  use std::collections::{BTreeMap, VecDeque};

  assert!(is_sequence_type::<Vec<u8>>());
  assert!(is_sequence_type::<VecDeque<String>>());
  assert!(is_sequence_type::<[f32; 3]>());
  assert!(is_sequence_type::<Box<[i64]>>());
  assert!(!is_sequence_type::<String>());
  assert!(!is_sequence_type::<Option<u8>>());

  assert!(is_keyed_map_type::<BTreeMap<String, u8>>());
  assert!(!is_keyed_map_type::<Vec<u8>>());
}

#[test]
fn fields() {
  let schema = Schema::new(
    "Point",
    vec![FieldDescriptor::new("x", FieldKind::Float), FieldDescriptor::new("y", FieldKind::Float)],
  );
  assert_eq!(schema.field("y").map(FieldDescriptor::kind), Some(&FieldKind::Float));
  assert!(schema.field("z").is_none());
  assert_eq!(schema.fields().iter().map(FieldDescriptor::name).collect::<Vec<_>>(), ["x", "y"]);
}

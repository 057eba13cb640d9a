use core::any::Any;

use crate::{
  Map, write_string, JsonError, JsonDeserialize, JsonSerialize, Context, deserialize_composite,
  serialize_composite,
};

/// The members of an object being bound onto a structure.
#[derive(Clone, Copy, Debug)]
pub struct Fields<'a> {
  members: &'a Map,
  context: &'a Context,
}

impl<'a> Fields<'a> {
  pub(crate) fn new(members: &'a Map, context: &'a Context) -> Self {
    Fields { members, context }
  }

  /// The context being bound with.
  pub fn context(&self) -> &'a Context {
    self.context
  }

  /// Bind the member with this key onto a field.
  ///
  /// If there's no such member, the field is left as-is.
  pub fn bind<T: JsonDeserialize>(&self, key: &str, field: &mut T) -> Result<(), JsonError> {
    let Some(value) = self.members.get(key) else {
      tracing::trace!(key, "skipped absent field");
      return Ok(());
    };
    *field = T::deserialize(value, self.context)?;
    Ok(())
  }

  /// Bind the member with this key onto a field of a composite type.
  ///
  /// If there's no such member, or the composite is absent, the field is left as-is.
  pub fn bind_composite<T: Any>(&self, key: &str, field: &mut T) -> Result<(), JsonError> {
    let Some(value) = self.members.get(key) else {
      tracing::trace!(key, "skipped absent field");
      return Ok(());
    };
    if let Some(composite) = deserialize_composite(value, self.context)? {
      *field = composite;
    }
    Ok(())
  }
}

/// A writer for the fields of a structure.
#[derive(Debug)]
pub struct FieldWriter<'a> {
  out: &'a mut String,
  context: &'a Context,
}

impl<'a> FieldWriter<'a> {
  pub(crate) fn new(out: &'a mut String, context: &'a Context) -> Self {
    FieldWriter { out, context }
  }

  /// The context being emitted with.
  pub fn context(&self) -> &'a Context {
    self.context
  }

  fn key(&mut self, key: &str) {
    write_string(self.out, key);
    self.out.push(':');
  }

  /// Write a field.
  pub fn field<T: ?Sized + JsonSerialize>(&mut self, key: &str, value: &T) {
    self.key(key);
    value.serialize(self.context, self.out);
    self.out.push(',');
  }

  /// Write a field of a composite type.
  pub fn composite<T: Any>(&mut self, key: &str, value: &T) {
    self.key(key);
    serialize_composite(value, self.context, self.out);
    self.out.push(',');
  }
}

use time::{PrimitiveDateTime, macros::datetime};

use crate::{Value, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

/// The date and time an unreadable value is read as.
const UNREADABLE: PrimitiveDateTime = datetime!(0001-01-01 0:00);

impl JsonDeserialize for PrimitiveDateTime {
  fn kind() -> FieldKind {
    FieldKind::Temporal
  }

  /// This parses the textual form of the value with the context's date/time format.
  ///
  /// Unreadable values are read as `0001-01-01 00:00:00`.
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    if value.is_null() {
      return Ok(UNREADABLE);
    }
    match context.date_time_format().parse(value.text().trim()) {
      Some(date_time) => Ok(date_time),
      None => {
        context.invalid_leaf("date/time", value)?;
        Ok(UNREADABLE)
      }
    }
  }
}

impl JsonSerialize for PrimitiveDateTime {
  /// This writes a string in the context's date/time format.
  fn serialize(&self, context: &Context, out: &mut String) {
    match context.date_time_format().format(*self) {
      Some(text) => text.serialize(context, out),
      None => {
        tracing::debug!(
          format = context.date_time_format().description(),
          "date/time format couldn't be applied"
        );
        context.write_null(out);
      }
    }
  }
}

/// A date and time, defaulting to `0001-01-01 00:00:00`.
///
/// This allows deriving `Default` for structures with temporal fields.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DateTime(pub PrimitiveDateTime);

impl Default for DateTime {
  fn default() -> Self {
    DateTime(UNREADABLE)
  }
}

impl From<PrimitiveDateTime> for DateTime {
  fn from(date_time: PrimitiveDateTime) -> Self {
    DateTime(date_time)
  }
}

impl From<DateTime> for PrimitiveDateTime {
  fn from(date_time: DateTime) -> Self {
    date_time.0
  }
}

impl core::ops::Deref for DateTime {
  type Target = PrimitiveDateTime;
  fn deref(&self) -> &PrimitiveDateTime {
    &self.0
  }
}

impl JsonDeserialize for DateTime {
  fn kind() -> FieldKind {
    FieldKind::Temporal
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    PrimitiveDateTime::deserialize(value, context).map(DateTime)
  }
}

impl JsonSerialize for DateTime {
  fn serialize(&self, context: &Context, out: &mut String) {
    self.0.serialize(context, out);
  }
}

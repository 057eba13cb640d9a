/// The kind of a bindable field.
///
/// This is resolved statically, per type, and determines how a field is converted to and from a
/// `Value`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FieldKind {
  /// An integer.
  Integer,
  /// A floating-point number.
  Float,
  /// Text.
  Text,
  /// A boolean.
  Boolean,
  /// A date and time, represented with the context's date/time format.
  Temporal,
  /// One of a set of named constants.
  Enumerated {
    /// The names of the constants.
    variants: &'static [&'static str],
  },
  /// A type registered with the `ConverterRegistry`, represented as an object of numbers.
  Composite {
    /// The name of the type.
    type_name: &'static str,
  },
  /// An array.
  Array {
    /// The kind of the elements.
    element: Box<FieldKind>,
    /// The length, if it's fixed.
    len: Option<usize>,
  },
  /// A growable sequence.
  Sequence {
    /// The kind of the elements.
    element: Box<FieldKind>,
  },
  /// A map keyed by strings.
  Map {
    /// The kind of the values.
    value: Box<FieldKind>,
  },
  /// A nested structure.
  Object {
    /// The name of the type.
    type_name: &'static str,
  },
  /// A field which may be `null`.
  Optional {
    /// The kind of the field when present.
    inner: Box<FieldKind>,
  },
  /// A `Value`, taken as-is.
  Raw,
}

impl FieldKind {
  /// If this is an array or a sequence.
  pub fn is_sequence(&self) -> bool {
    matches!(self, FieldKind::Array { .. } | FieldKind::Sequence { .. })
  }

  /// If this is a map keyed by strings.
  pub fn is_keyed_map(&self) -> bool {
    matches!(self, FieldKind::Map { .. })
  }

  /// A short name for this kind, as used within diagnostics.
  pub fn name(&self) -> &'static str {
    match self {
      FieldKind::Integer => "integer",
      FieldKind::Float => "float",
      FieldKind::Text => "text",
      FieldKind::Boolean => "boolean",
      FieldKind::Temporal => "date/time",
      FieldKind::Enumerated { .. } => "enumerated",
      FieldKind::Composite { .. } => "composite",
      FieldKind::Array { .. } => "array",
      FieldKind::Sequence { .. } => "sequence",
      FieldKind::Map { .. } => "map",
      FieldKind::Object { .. } => "object",
      FieldKind::Optional { .. } => "optional",
      FieldKind::Raw => "raw",
    }
  }
}

impl core::fmt::Display for FieldKind {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      FieldKind::Enumerated { variants } => write!(f, "enumerated {variants:?}"),
      FieldKind::Composite { type_name } | FieldKind::Object { type_name } => {
        write!(f, "{} `{type_name}`", self.name())
      }
      FieldKind::Array { element, len: Some(len) } => write!(f, "array of {len} {element}"),
      FieldKind::Array { element, len: None } => write!(f, "array of {element}"),
      FieldKind::Sequence { element } => write!(f, "sequence of {element}"),
      FieldKind::Map { value } => write!(f, "map of {value}"),
      FieldKind::Optional { inner } => write!(f, "optional {inner}"),
      _ => f.write_str(self.name()),
    }
  }
}

#[test]
fn display() {
  let kind = FieldKind::Sequence {
    element: Box::new(FieldKind::Array { element: Box::new(FieldKind::Text), len: Some(2) }),
  };
  assert!(kind.is_sequence());
  assert!(!kind.is_keyed_map());
  assert_eq!(kind.to_string(), "sequence of array of 2 text");
  assert_eq!(FieldKind::Object { type_name: "Point" }.to_string(), "object `Point`");
}

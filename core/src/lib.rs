#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod tokenizer;
mod string;
mod number;
mod value;
mod parser;

pub use tokenizer::{Token, Tokenizer};
pub use string::write_string;
pub use number::write_float;
pub use value::{Map, Value};
pub use parser::{DEFAULT_MAX_DEPTH, Parser, parse, parse_strict};

/// A failure absorbed while parsing.
///
/// The lenient entry points never surface these. They're recorded so strict parsing may report
/// the first one encountered.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
#[error("{kind} (at byte {offset})")]
pub struct ParseError {
  /// What went wrong.
  pub kind: ParseErrorKind,
  /// The byte offset within the text the failure was noticed at.
  pub offset: usize,
}

/// The kinds of failures the parser absorbs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ParseErrorKind {
  /// The text ended while a value, or the close of a structure, was expected.
  #[error("unexpected end of input")]
  UnexpectedEnd,
  /// A token which can't start a value was found where a value was expected.
  #[error("invalid value")]
  InvalidValue,
  /// The JSON had an invalid key.
  #[error("object key wasn't a string")]
  InvalidKey,
  /// The JSON had an invalid delimiter between the key and value (`:` expected).
  #[error("expected `:` between key and value")]
  InvalidKeyValueDelimiter,
  /// A numeral couldn't be read as a finite number.
  #[error("malformed number")]
  InvalidNumber,
  /// A string had an escape sequence which isn't defined by RFC 8259.
  #[error("invalid escape sequence")]
  InvalidEscape,
  /// The structures nested deeper than the parser's limit.
  #[error("nesting exceeded the depth limit")]
  DepthLimit,
}

/// The type of the value.
///
/// https://datatracker.ietf.org/doc/html/rfc8259#section-3 defines all possible values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Type {
  /// An object.
  Object,
  /// An array.
  Array,
  /// A string.
  String,
  /// A RFC-8259 number.
  Number,
  /// A boolean.
  Bool,
  /// The `null` unit value.
  Null,
}

impl core::fmt::Display for Type {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(match self {
      Type::Object => "object",
      Type::Array => "array",
      Type::String => "string",
      Type::Number => "number",
      Type::Bool => "boolean",
      Type::Null => "null",
    })
  }
}

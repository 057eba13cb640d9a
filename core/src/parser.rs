use tracing::debug;

use crate::{ParseError, ParseErrorKind, Token, Tokenizer, Map, Value, number, string};

/// The default bound on how deeply structures may nest.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A recursive-descent parser for JSON text.
///
/// Parsing is lenient. Structural failures make the offending subtree `null`, malformed numbers
/// read as zero, and stray commas are skipped wherever a value is expected. The first failure
/// absorbed is remembered so [`Parser::strict`] can report it.
#[derive(Debug)]
pub struct Parser<'text> {
  tokens: Tokenizer<'text>,
  max_depth: usize,
  depth: usize,
  error: Option<ParseError>,
}

impl<'text> Parser<'text> {
  /// Create a parser for the value at the start of the text.
  pub fn new(text: &'text str) -> Self {
    Parser { tokens: Tokenizer::new(text), max_depth: DEFAULT_MAX_DEPTH, depth: 0, error: None }
  }

  /// Bound how deeply structures may nest.
  ///
  /// Structures nested beyond this are skipped and read as `null`.
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Parse the value, absorbing any failures.
  ///
  /// Anything after the value is ignored.
  pub fn lenient(mut self) -> Value {
    self.value()
  }

  /// Parse the value, returning the first failure which would've been absorbed.
  ///
  /// Anything after the value is ignored.
  pub fn strict(mut self) -> Result<Value, ParseError> {
    let value = self.value();
    match self.error {
      Some(e) => Err(e),
      None => Ok(value),
    }
  }

  fn fail(&mut self, kind: ParseErrorKind) {
    let offset = self.tokens.offset();
    debug!(%kind, offset, "absorbed malformed JSON");
    if self.error.is_none() {
      self.error = Some(ParseError { kind, offset });
    }
  }

  /// Parse a value, skipping any commas before it.
  fn value(&mut self) -> Value {
    loop {
      match self.tokens.next() {
        Token::Comma => {}
        token => break self.value_from(token),
      }
    }
  }

  /// Parse the value started by `token`.
  fn value_from(&mut self, token: Token<'text>) -> Value {
    match token {
      Token::CurlyOpen => self.nested(Self::object),
      Token::SquareOpen => self.nested(Self::array),
      Token::String(raw) => Value::String(self.string(raw)),
      Token::Number(lexeme) => self.number(lexeme),
      Token::True => Value::Bool(true),
      Token::False => Value::Bool(false),
      Token::Null => Value::Null,
      Token::End => {
        self.fail(ParseErrorKind::UnexpectedEnd);
        Value::Null
      }
      Token::CurlyClose |
      Token::SquareClose |
      Token::Comma |
      Token::Colon |
      Token::Invalid(_) => {
        self.fail(ParseErrorKind::InvalidValue);
        Value::Null
      }
    }
  }

  /// Parse a structure whose opening token was just consumed, enforcing the depth limit.
  fn nested(&mut self, structure: fn(&mut Self) -> Value) -> Value {
    if self.depth == self.max_depth {
      self.fail(ParseErrorKind::DepthLimit);
      self.tokens.skip_open_structure();
      return Value::Null;
    }
    self.depth += 1;
    let value = structure(self);
    self.depth -= 1;
    value
  }

  fn object(&mut self) -> Value {
    let mut members = Map::new();
    loop {
      match self.tokens.next() {
        Token::Comma => {}
        Token::CurlyClose => break Value::Object(members),
        Token::String(raw) => {
          let key = self.string(raw);
          if self.tokens.next() != Token::Colon {
            self.fail(ParseErrorKind::InvalidKeyValueDelimiter);
            break Value::Null;
          }
          let value = self.value();
          // `IndexMap::insert` replaces the value of an existing key in place
          members.insert(key, value);
        }
        Token::End => {
          self.fail(ParseErrorKind::UnexpectedEnd);
          break Value::Null;
        }
        _ => {
          self.fail(ParseErrorKind::InvalidKey);
          break Value::Null;
        }
      }
    }
  }

  fn array(&mut self) -> Value {
    let mut items = vec![];
    loop {
      match self.tokens.next() {
        Token::Comma => {}
        Token::SquareClose => break Value::Array(items),
        Token::End => {
          self.fail(ParseErrorKind::UnexpectedEnd);
          break Value::Null;
        }
        Token::Invalid(_) => {
          self.fail(ParseErrorKind::InvalidValue);
          break Value::Null;
        }
        token => items.push(self.value_from(token)),
      }
    }
  }

  fn string(&mut self, raw: &str) -> String {
    let (string, clean) = string::unescape(raw);
    if !clean {
      self.fail(ParseErrorKind::InvalidEscape);
    }
    string
  }

  fn number(&mut self, lexeme: &str) -> Value {
    if number::is_float(lexeme) {
      Value::Float(number::parse_float(lexeme).unwrap_or_else(|| {
        self.fail(ParseErrorKind::InvalidNumber);
        0.0
      }))
    } else {
      Value::Integer(number::parse_integer(lexeme).unwrap_or_else(|| {
        self.fail(ParseErrorKind::InvalidNumber);
        0
      }))
    }
  }
}

/// Parse JSON text into a value, absorbing any failures.
///
/// This uses the default depth limit, [`DEFAULT_MAX_DEPTH`].
pub fn parse(text: &str) -> Value {
  Parser::new(text).lenient()
}

/// Parse JSON text into a value, failing on anything [`parse`] would've absorbed.
pub fn parse_strict(text: &str) -> Result<Value, ParseError> {
  Parser::new(text).strict()
}

//! Lexical analysis of JSON text.

/// Characters which terminate a number or a word, in addition to whitespace.
const WORD_BREAK: [char; 7] = ['{', '}', '[', ']', ',', ':', '"'];

#[inline(always)]
fn is_word_break(c: char) -> bool {
  c.is_whitespace() || WORD_BREAK.contains(&c)
}

/// A lexical token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Token<'text> {
  /// `{`
  CurlyOpen,
  /// `}`
  CurlyClose,
  /// `[`
  SquareOpen,
  /// `]`
  SquareClose,
  /// `,`
  Comma,
  /// `:`
  Colon,
  /// A string, with its quotes stripped yet its escape sequences left as-is.
  ///
  /// If the string was never terminated, this is the rest of the text.
  String(&'text str),
  /// The lexeme of a number.
  ///
  /// This is solely the run of characters starting with a digit or `-`. It isn't validated.
  Number(&'text str),
  /// `true`
  True,
  /// `false`
  False,
  /// `null`
  Null,
  /// A word which isn't one of the literals.
  Invalid(&'text str),
  /// The end of the text.
  End,
}

/// A cursor over JSON text, yielding tokens.
///
/// Tokenizing never fails. Unrecognized words are yielded as [`Token::Invalid`] and the end of the
/// text is yielded as [`Token::End`] (repeatedly, if asked again).
#[derive(Clone, Copy, Debug)]
pub struct Tokenizer<'text> {
  text: &'text str,
  offset: usize,
}

impl<'text> Tokenizer<'text> {
  /// Create a tokenizer positioned at the start of the text.
  pub fn new(text: &'text str) -> Self {
    Tokenizer { text, offset: 0 }
  }

  /// The byte offset of the cursor within the text.
  pub fn offset(&self) -> usize {
    self.offset
  }

  #[inline(always)]
  fn rest(&self) -> &'text str {
    &self.text[self.offset ..]
  }

  fn skip_whitespace(&mut self) {
    let rest = self.rest();
    self.offset += rest.len() - rest.trim_start().len();
  }

  /// Take the run of characters up to the next word break.
  fn take_word(&mut self) -> &'text str {
    let rest = self.rest();
    let len = rest.find(is_word_break).unwrap_or(rest.len());
    self.offset += len;
    &rest[.. len]
  }

  /// Take a string, assuming the cursor is on its opening quote.
  fn take_string(&mut self) -> &'text str {
    self.offset += '"'.len_utf8();
    let rest = self.rest();
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
      if escaped {
        escaped = false;
        continue;
      }
      match c {
        '\\' => escaped = true,
        '"' => {
          self.offset += i + '"'.len_utf8();
          return &rest[.. i];
        }
        _ => {}
      }
    }
    self.offset = self.text.len();
    rest
  }

  /// Peek at the next token without advancing.
  pub fn peek(&self) -> Token<'text> {
    let mut lookahead = *self;
    lookahead.next()
  }

  /// Advance past the next token, returning it.
  ///
  /// Whitespace preceding the token is skipped.
  #[allow(clippy::should_implement_trait)]
  pub fn next(&mut self) -> Token<'text> {
    self.skip_whitespace();
    let Some(c) = self.rest().chars().next() else { return Token::End };

    let punctuation = match c {
      '{' => Some(Token::CurlyOpen),
      '}' => Some(Token::CurlyClose),
      '[' => Some(Token::SquareOpen),
      ']' => Some(Token::SquareClose),
      ',' => Some(Token::Comma),
      ':' => Some(Token::Colon),
      _ => None,
    };
    if let Some(punctuation) = punctuation {
      self.offset += c.len_utf8();
      return punctuation;
    }

    match c {
      '"' => Token::String(self.take_string()),
      '0' ..= '9' | '-' => Token::Number(self.take_word()),
      // Whitespace and word breaks were handled above, so this word is non-empty
      _ => match self.take_word() {
        "true" => Token::True,
        "false" => Token::False,
        "null" => Token::Null,
        word => Token::Invalid(word),
      },
    }
  }

  /// Skip the remainder of a structure whose opening token was just consumed.
  ///
  /// This is iterative, so it's safe to call on arbitrarily deep structures. Opening and closing
  /// tokens are counted without checking they pair up.
  pub fn skip_open_structure(&mut self) {
    let mut depth = 1usize;
    while depth != 0 {
      match self.next() {
        Token::CurlyOpen | Token::SquareOpen => depth += 1,
        Token::CurlyClose | Token::SquareClose => depth -= 1,
        Token::End => break,
        _ => {}
      }
    }
  }
}

#[test]
fn tokens() {
  let mut tokens = Tokenizer::new(" {\"a\\\"b\" : [-1.5e3, true,false ,null, nope]} ");
  assert_eq!(tokens.next(), Token::CurlyOpen);
  assert_eq!(tokens.peek(), Token::String("a\\\"b"));
  assert_eq!(tokens.next(), Token::String("a\\\"b"));
  assert_eq!(tokens.next(), Token::Colon);
  assert_eq!(tokens.next(), Token::SquareOpen);
  assert_eq!(tokens.next(), Token::Number("-1.5e3"));
  assert_eq!(tokens.next(), Token::Comma);
  assert_eq!(tokens.next(), Token::True);
  assert_eq!(tokens.next(), Token::Comma);
  assert_eq!(tokens.next(), Token::False);
  assert_eq!(tokens.next(), Token::Comma);
  assert_eq!(tokens.next(), Token::Null);
  assert_eq!(tokens.next(), Token::Comma);
  assert_eq!(tokens.next(), Token::Invalid("nope"));
  assert_eq!(tokens.next(), Token::SquareClose);
  assert_eq!(tokens.next(), Token::CurlyClose);
  assert_eq!(tokens.next(), Token::End);
  assert_eq!(tokens.next(), Token::End);
}

#[test]
fn unterminated_string() {
  let mut tokens = Tokenizer::new("\"abc");
  assert_eq!(tokens.next(), Token::String("abc"));
  assert_eq!(tokens.next(), Token::End);
}

#[test]
fn skip_structure() {
  let mut tokens = Tokenizer::new("[[{\"]\": []}], 1] 2");
  assert_eq!(tokens.next(), Token::SquareOpen);
  tokens.skip_open_structure();
  assert_eq!(tokens.next(), Token::Number("2"));
}

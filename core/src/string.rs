use core::str::Chars;

/// Read the four hex digits following `\u`.
///
/// Four characters are always consumed, even if some of them aren't hex digits.
fn read_hex(chars: &mut Chars<'_>) -> Option<u16> {
  let mut result = 0u16;
  let mut valid = true;
  for _ in 0 .. 4 {
    match chars.next().and_then(|c| c.to_digit(16)).and_then(|nibble| u16::try_from(nibble).ok()) {
      Some(nibble) => result = (result << 4) | nibble,
      None => valid = false,
    }
  }
  valid.then_some(result)
}

/// Read the remainder of a `\uXXXX` escape, combining UTF-16 surrogate pairs.
///
/// Returns `None` if the escape didn't specify a valid character.
fn read_unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
  let first = read_hex(chars)?;
  match first {
    0xd800 ..= 0xdbff => {
      // A high surrogate must be immediately followed by an escaped low surrogate
      let mut lookahead = chars.clone();
      if (lookahead.next() != Some('\\')) || (lookahead.next() != Some('u')) {
        None?;
      }
      let second = read_hex(&mut lookahead)?;
      let decoded = char::decode_utf16([first, second]).next()?.ok()?;
      *chars = lookahead;
      Some(decoded)
    }
    0xdc00 ..= 0xdfff => None,
    _ => char::from_u32(u32::from(first)),
  }
}

/// Translate the escape sequences within a string's raw contents.
///
/// Any character following `\` other than those defined by RFC 8259 is dropped. A malformed
/// `\u` escape becomes U+FFFD. The returned `bool` is `false` if either occurred.
pub(crate) fn unescape(raw: &str) -> (String, bool) {
  let mut result = String::with_capacity(raw.len());
  let mut clean = true;

  let mut chars = raw.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      result.push(c);
      continue;
    }
    // A trailing backslash is only possible within an unterminated string
    let Some(escaped) = chars.next() else {
      clean = false;
      break;
    };
    match escaped {
      '"' | '\\' | '/' => result.push(escaped),
      'b' => result.push('\x08'),
      'f' => result.push('\x0c'),
      'n' => result.push('\n'),
      'r' => result.push('\r'),
      't' => result.push('\t'),
      'u' => match read_unicode_escape(&mut chars) {
        Some(c) => result.push(c),
        None => {
          result.push(char::REPLACEMENT_CHARACTER);
          clean = false;
        }
      },
      _ => clean = false,
    }
  }

  (result, clean)
}

/// Write a string as a quoted JSON string.
///
/// `"`, `\`, and control characters are escaped. All other characters are written as-is.
pub fn write_string(out: &mut String, value: &str) {
  out.reserve(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\x08' => out.push_str("\\b"),
      '\x0c' => out.push_str("\\f"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\0' ..= '\x1f' => out.push_str(&format!("\\u{:04x}", u32::from(c))),
      _ => out.push(c),
    }
  }
  out.push('"');
}

#[test]
fn escapes() {
  assert_eq!(unescape("a\\n\\\"b"), ("a\n\"b".to_string(), true));
  assert_eq!(unescape("\\/\\b\\f\\r\\t\\\\"), ("/\x08\x0c\r\t\\".to_string(), true));
  assert_eq!(unescape("\\u00e9\\u20AC"), ("é€".to_string(), true));
  assert_eq!(unescape("\\ud83d\\ude00"), ("😀".to_string(), true));
}

#[test]
fn lenient_escapes() {
  // Unknown escapes are dropped
  assert_eq!(unescape("a\\qb"), ("ab".to_string(), false));
  // Lone surrogates and bad hex are replaced
  assert_eq!(unescape("\\ud83dx"), ("\u{fffd}x".to_string(), false));
  assert_eq!(unescape("\\uzzzz"), ("\u{fffd}".to_string(), false));
  assert_eq!(unescape("abc\\"), ("abc".to_string(), false));
}

#[test]
fn write_strings() {
  let mut out = String::new();
  write_string(&mut out, "a\"b\\c\nd\u{1}é");
  assert_eq!(out, r#""a\"b\\c\nd\u0001é""#);
}

//! The number policy.
//!
//! A numeral containing `.` or `,` is a float. Any other numeral is a 64-bit signed integer.
//! Numerals which can't be read as such are reported so the caller may substitute zero.
//!
//! A `,` always ends a numeral within a document, so the tokenizer never yields one containing it.
//! Floats are read with `.` as the decimal point, independent of locale, and `,` isn't accepted
//! within one.

/// If this numeral is to be read as a float.
#[inline(always)]
pub(crate) fn is_float(lexeme: &str) -> bool {
  lexeme.contains(['.', ','])
}

/// Read an integer numeral.
pub(crate) fn parse_integer(lexeme: &str) -> Option<i64> {
  lexeme.parse().ok()
}

/// Read a float numeral, independent of locale.
///
/// Non-finite results (such as from an exponent overflowing) are rejected.
pub(crate) fn parse_float(lexeme: &str) -> Option<f64> {
  let float = lexeme.parse::<f64>().ok()?;
  float.is_finite().then_some(float)
}

/// Write a finite float such that it reads back as a float of the same value.
///
/// This is the shortest representation which round-trips (at the float's own precision), always
/// containing a `.` so the number policy reads it back as a float. Non-finite values aren't
/// representable within JSON and are written as `null`.
pub fn write_float<F: Copy + Into<f64> + core::fmt::Debug>(out: &mut String, value: F) {
  if !value.into().is_finite() {
    out.push_str("null");
    return;
  }

  // `Debug` yields the shortest representation which round-trips, switching to scientific
  // notation for large and small magnitudes
  let start = out.len();
  out.push_str(&format!("{value:?}"));
  if !out[start ..].contains('.') {
    match out[start ..].find('e') {
      Some(exponent) => out.insert_str(start + exponent, ".0"),
      None => out.push_str(".0"),
    }
  }
}

#[test]
fn number_policy() {
  assert!(!is_float("1250"));
  assert!(is_float("1.245"));
  assert!(is_float("1,245"));
  assert_eq!(parse_integer("1250"), Some(1250));
  assert_eq!(parse_integer("-3"), Some(-3));
  assert_eq!(parse_integer("1e5"), None);
  assert_eq!(parse_integer("99999999999999999999"), None);
  assert_eq!(parse_float("1.245"), Some(1.245));
  assert_eq!(parse_float("1,5"), None);
  assert_eq!(parse_float("-2.5e2"), Some(-250.0));
  assert_eq!(parse_float("1.0e999"), None);
  assert_eq!(parse_float("1.2.3"), None);
}

#[test]
fn floats() {
  let write = |value: f64| {
    let mut out = String::new();
    write_float(&mut out, value);
    out
  };
  assert_eq!(write(12.0), "12.0");
  assert_eq!(write(-0.5), "-0.5");
  assert_eq!(write(1e20), "1.0e20");
  assert_eq!(write(1.5e-7), "1.5e-7");
  assert_eq!(write(f64::NAN), "null");
  for value in [0.1, 1.245, 123456789.101112, f64::MAX, f64::MIN_POSITIVE] {
    assert_eq!(parse_float(&write(value)), Some(value));
  }

  let mut out = String::new();
  write_float(&mut out, 0.1f32);
  assert_eq!(out, "0.1");
}

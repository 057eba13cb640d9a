use serde_json::Value;

/*
  Checks for equivalence between `json_bind::Value` and `serde_json::Value`. `serde_json` is
  treated as the reference for any document within the subset of JSON the number policy agrees
  with RFC 8259 upon (integers within `i64`, floats written with a `.`).
*/

fn check_float(number: f64, expected: f64) {
  // 0.1% of the smaller number
  let allowed_deviation = number.min(expected).abs() / 1000.0;
  assert!((number - expected).abs() <= allowed_deviation, "{number} != {expected}");
}

/// Check a `json_bind::Value` is equivalent to a `serde_json::Value`.
pub fn check_equivalent(value: &json_bind::Value, expected: &Value) {
  match (value, expected) {
    (json_bind::Value::Null, Value::Null) => {}
    (json_bind::Value::Bool(value), Value::Bool(expected)) => assert_eq!(value, expected),
    (json_bind::Value::Integer(value), Value::Number(expected)) => {
      assert_eq!(Some(*value), expected.as_i64());
    }
    (json_bind::Value::Float(value), Value::Number(expected)) => {
      assert!(expected.is_f64(), "{value} was read as a float yet {expected} wasn't");
      check_float(*value, expected.as_f64().unwrap());
    }
    (json_bind::Value::String(value), Value::String(expected)) => assert_eq!(value, expected),
    (json_bind::Value::Array(items), Value::Array(expected)) => {
      assert_eq!(items.len(), expected.len());
      for (item, expected) in items.iter().zip(expected) {
        check_equivalent(item, expected);
      }
    }
    (json_bind::Value::Object(members), Value::Object(expected)) => {
      assert_eq!(members.len(), expected.len());
      // Both preserve the order members were written in
      for ((key, value), (expected_key, expected)) in members.iter().zip(expected) {
        assert_eq!(key, expected_key);
        check_equivalent(value, expected);
      }
    }
    _ => panic!("{value} wasn't equivalent to {expected}"),
  }
}

/// Check `json-bind` reads the encoding of a `serde_json::Value` as the same value.
pub fn check_value(encoding: &str, expected: &Value) {
  let value = json_bind::parse_strict(encoding).unwrap();
  check_equivalent(&value, expected);
  // The lenient parser agrees on well-formed input
  assert_eq!(json_bind::parse(encoding), value);
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;
  use rand_core::{RngCore, OsRng};
  use super::*;

  #[allow(clippy::cast_possible_truncation)]
  fn random_string() -> String {
    let mut res = String::new();
    for _ in 0 .. (OsRng.next_u64() % 128) {
      if (OsRng.next_u64() % 2) == 1 {
        // ASCII
        res.push(char::from_u32((OsRng.next_u64() % 128) as u32).unwrap());
      } else {
        // Unicode
        res.push(loop {
          if let Some(char) = char::from_u32(OsRng.next_u64() as u32) {
            // Skip ASCII as those are intended to be included by the other branch
            // Skip the byte-order mark as implementations are allowed to ignore/reject it
            if char.is_ascii() || (char == '\u{feff}') {
              continue;
            }
            break char;
          }
        });
      }
    }
    res
  }

  #[allow(clippy::cast_possible_wrap)]
  fn random_number() -> serde_json::Number {
    match OsRng.next_u64() % 3 {
      0 => serde_json::Number::from(OsRng.next_u64() as i64),
      1 => serde_json::Number::from(OsRng.next_u64() % 1000),
      2 => loop {
        let Some(float) = serde_json::Number::from_f64(f64::from_bits(OsRng.next_u64())) else {
          continue;
        };
        // Numerals in exponent form without a `.` are integers under the number policy
        if float.to_string().contains('.') {
          break float;
        }
      },
      _ => unreachable!(),
    }
  }

  fn random_value(depth: usize) -> Value {
    let modulus = if depth == 8 { 4 } else { 6 };
    match OsRng.next_u64() % modulus {
      0 => Value::Null,
      1 => Value::Bool((OsRng.next_u64() % 2) == 1),
      2 => Value::Number(random_number()),
      3 => Value::String(random_string()),
      4 => Value::Array({
        let mut res = vec![];
        for _ in 0 .. (OsRng.next_u64() % 8) {
          res.push(random_value(depth + 1));
        }
        res
      }),
      5 => Value::Object({
        let mut res = serde_json::Map::new();
        for _ in 0 .. (OsRng.next_u64() % 8) {
          res.insert(random_string(), random_value(depth + 1));
        }
        res
      }),
      _ => unreachable!(),
    }
  }

  #[test]
  fn fuzz() {
    for i in 0 .. 100 {
      dbg!(i);
      let value = dbg!(loop {
        let value = random_value(0);
        if matches!(value, Value::Object(_) | Value::Array(_)) {
          break value;
        }
      });

      check_value(&value.to_string(), &value);

      // `serde_json` reads what `json-bind` writes as the same value
      let written = json_bind::parse_strict(&value.to_string()).unwrap().to_string();
      check_equivalent(&json_bind::parse_strict(&written).unwrap(), &value);
      let reread = Value::from_str(&written).unwrap();
      check_equivalent(&json_bind::parse_strict(&written).unwrap(), &reread);
    }
  }

  #[test]
  fn documents() {
    let documents = [
      r#"{"Image":{"Width":800,"Height":600,"Title":"View from 15th Floor","Thumbnail":{"Url":"http://www.example.com/image/481989943","Height":125,"Width":100},"Animated":false,"IDs":[116,943,234,38793]}}"#,
      r#"[{"precision":"zip","Latitude":37.7668,"Longitude":-122.3959,"Address":"","City":"SAN FRANCISCO","State":"CA","Zip":"94107","Country":"US"}]"#,
      r#"  [ "é😀\n\t\"\\\/" , -0.0 , 1.5e-7 , null , true ] "#,
      "{}",
      "[]",
    ];
    for document in documents {
      check_value(document, &Value::from_str(document).unwrap());
    }
  }

  #[test]
  fn leniency() {
    // Malformed documents `serde_json` rejects yet which are still read
    for (document, expected) in [
      ("[1,2,]", "[1,2]"),
      ("[,1,,2]", "[1,2]"),
      (r#"{"a":1,}"#, r#"{"a":1}"#),
      ("[1,5]", "[1,5]"),
      (r#"{"a":[1,"#, "null"),
    ] {
      check_equivalent(&json_bind::parse(document), &Value::from_str(expected).unwrap());
    }
    assert!(Value::from_str("[1,2,]").is_err());
    assert!(json_bind::parse_strict(r#"{"a":[1,"#).is_err());
  }
}

//! Small utility helpers used across modules.

/// Stored memory units per displayed KB.
pub const MEMORY_SCALE: i64 = 1000;

/// Parse an integer the way a lenient form field does: skip leading whitespace,
/// take an optional sign and the leading run of decimal digits, ignore the rest.
/// Returns `fallback` when there are no digits or the number does not fit `i32`.
///
/// `"42"` -> 42, `" 7kb"` -> 7, `"3.9"` -> 3, `"abc"` -> fallback, `""` -> fallback.
pub fn parse_bounded_int(raw: &str, fallback: i32) -> i32 {
  let s = raw.trim_start();
  let (negative, digits) = match s.as_bytes().first() {
    Some(b'-') => (true, &s[1..]),
    Some(b'+') => (false, &s[1..]),
    _ => (false, s),
  };
  let end = digits
    .char_indices()
    .find(|(_, c)| !c.is_ascii_digit())
    .map(|(i, _)| i)
    .unwrap_or(digits.len());
  if end == 0 {
    return fallback;
  }
  let text = if negative { format!("-{}", &digits[..end]) } else { digits[..end].to_string() };
  text.parse::<i32>().unwrap_or(fallback)
}

/// Displayed KB -> stored memory limit. Exact for every `i32` KB value.
pub fn kb_to_stored(kb: i32) -> i64 {
  i64::from(kb) * MEMORY_SCALE
}

/// Stored memory limit -> displayed KB (floor division, lossless for multiples of 1000).
/// Stored values outside the `i32` KB range only arrive through deserialization and are clamped.
pub fn stored_to_kb(stored: i64) -> i32 {
  let kb = stored.div_euclid(MEMORY_SCALE);
  i32::try_from(kb).unwrap_or(if kb < 0 { i32::MIN } else { i32::MAX })
}

/// Parse a textual switch value.
pub fn parse_flag(raw: &str) -> Option<bool> {
  match raw.trim() {
    s if s.eq_ignore_ascii_case("true") => Some(true),
    s if s.eq_ignore_ascii_case("false") => Some(false),
    _ => None,
  }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    Some((byte_idx, _)) => format!("{}… ({} bytes total)", &s[..byte_idx], s.len()),
    None => s.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_bounded_int_behaves_like_a_form_field() {
    assert_eq!(parse_bounded_int("42", 0), 42);
    assert_eq!(parse_bounded_int("abc", 0), 0);
    assert_eq!(parse_bounded_int("", 0), 0);
    assert_eq!(parse_bounded_int("  17", 0), 17);
    assert_eq!(parse_bounded_int("3.9", 0), 3);
    assert_eq!(parse_bounded_int("128kb", 0), 128);
    assert_eq!(parse_bounded_int("-5", 0), -5);
    assert_eq!(parse_bounded_int("+5", 0), 5);
    assert_eq!(parse_bounded_int("-", 9), 9);
    assert_eq!(parse_bounded_int("x12", 9), 9);
  }

  #[test]
  fn parse_bounded_int_rejects_overflow() {
    assert_eq!(parse_bounded_int("99999999999", 0), 0);
    assert_eq!(parse_bounded_int("2147483647", 0), i32::MAX);
  }

  #[test]
  fn memory_round_trip() {
    assert_eq!(kb_to_stored(128), 128_000);
    assert_eq!(stored_to_kb(128_000), 128);
    assert_eq!(stored_to_kb(kb_to_stored(512)), 512);
    assert_eq!(stored_to_kb(128_999), 128);
  }

  #[test]
  fn memory_round_trip_holds_for_every_kb_value() {
    for kb in [i32::MIN, -1, 0, 3_000_000, i32::MAX] {
      assert_eq!(kb_to_stored(kb), i64::from(kb) * 1000);
      assert_eq!(stored_to_kb(kb_to_stored(kb)), kb);
    }
    assert_eq!(stored_to_kb(i64::MAX), i32::MAX);
  }

  #[test]
  fn flags() {
    assert_eq!(parse_flag("TRUE"), Some(true));
    assert_eq!(parse_flag(" false "), Some(false));
    assert_eq!(parse_flag("yes"), None);
  }

  #[test]
  fn truncation_counts_chars() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert_eq!(trunc_for_log("abcdef", 3), "abc… (6 bytes total)");
  }
}

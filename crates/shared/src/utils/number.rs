/// Reads the integer at the start of `text`, ignoring anything after it.
///
/// Leading whitespace and a single sign are allowed. `"30"`, `" 30 "` and
/// `"30min"` all read as 30. Text that doesn't start with a digit reads as
/// `None`, as does a value that overflows an `i64`.
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

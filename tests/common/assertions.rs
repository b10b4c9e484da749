//! Custom assertion utilities for tests.
//!
//! Provides assertion helpers that give better error messages than bare
//! `assert!` when checking generated values.

use autobuilder::Value;

/// Assert that a result is Ok and return the inner value.
///
/// # Panics
///
/// Panics with a descriptive message if the result is `Err`.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that an error message contains expected text (case-insensitive).
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    let expected_lower = expected_text.to_lowercase();

    assert!(
        error_str.contains(&expected_lower),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

/// Assert that a value is within an expected range.
#[allow(dead_code)]
pub fn assert_in_range<T: PartialOrd + std::fmt::Debug>(value: T, min: T, max: T, context: &str) {
    assert!(
        value >= min && value <= max,
        "{}: expected value in range [{:?}, {:?}], got {:?}",
        context,
        min,
        max,
        value
    );
}

/// Assert that `value.member` exists and is not null, and return it.
#[allow(dead_code)]
pub fn assert_field_populated<'a>(value: &'a Value, member: &str) -> &'a Value {
    match value.field(member) {
        Some(Value::Null) => panic!("{} should be populated, got null", member),
        Some(field) => field,
        None => panic!("{} is missing from {:?}", member, value.kind_name()),
    }
}

/// Assert that `value` is text of exactly `length` characters from `a`-`z`.
#[allow(dead_code)]
pub fn assert_lowercase_text(value: &Value, length: usize, context: &str) {
    let Some(text) = value.as_str() else {
        panic!("{}: expected text, got {}", context, value.kind_name());
    };
    assert_eq!(text.chars().count(), length, "{}: unexpected length of '{}'", context, text);
    assert!(
        text.chars().all(|c| c.is_ascii_lowercase()),
        "{}: '{}' has characters outside a-z",
        context,
        text
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_ok() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(result, "test operation"), 42);
    }

    #[test]
    #[should_panic(expected = "test operation failed")]
    fn test_assert_ok_fails() {
        let result: Result<i32, &str> = Err("error");
        assert_ok(result, "test operation");
    }

    #[test]
    fn test_assert_lowercase_text() {
        assert_lowercase_text(&Value::Text("abcde".into()), 5, "text");
    }

    #[test]
    #[should_panic(expected = "outside a-z")]
    fn test_assert_lowercase_text_rejects_digits() {
        assert_lowercase_text(&Value::Text("abc1".into()), 4, "text");
    }
}

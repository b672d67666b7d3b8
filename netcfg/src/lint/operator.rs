//! Match-mode operator semantics.
//!
//! Values are compared the way rule authors expect from loosely-typed rule
//! documents: `contains` on a scalar is a substring test over the value's
//! string form, `greaterThan` coerces both sides to numbers, and `exists`
//! treats an empty string as absent. `None` stands for a path that did not
//! resolve.

use regex::Regex;
use serde_json::Value;

use super::rule::{Condition, Operator};
use super::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub passed: bool,
    pub message: String,
}

/// Apply `condition` to the value resolved at `path`.
pub fn apply(
    path: &str,
    actual: Option<&Value>,
    condition: &Condition,
) -> Result<MatchOutcome, EvalError> {
    let expected = condition.expected.as_ref();
    let shown = display(expected);
    let (passed, message) = match condition.operator {
        Operator::Equals => (
            strict_eq(actual, expected),
            format!("Expected {path} to equal {shown}"),
        ),
        Operator::NotEquals => (
            !strict_eq(actual, expected),
            format!("Expected {path} to not equal {shown}"),
        ),
        Operator::GreaterThan => (
            to_number(actual) > to_number(expected),
            format!("Expected {path} > {shown}"),
        ),
        Operator::Contains => (
            contains(actual, expected),
            format!("Expected {path} to contain {shown}"),
        ),
        Operator::NotContains => (
            !contains(actual, expected),
            format!("Expected {path} to not contain {shown}"),
        ),
        Operator::Exists => (!is_blank(actual), format!("Expected {path} to exist")),
        Operator::NotExists => (is_blank(actual), format!("Expected {path} to not exist")),
        Operator::NotEmpty => (
            is_not_empty(actual),
            format!("Expected {path} to not be empty"),
        ),
        Operator::Empty => (!is_not_empty(actual), format!("Expected {path} to be empty")),
        Operator::Matches => {
            let pattern = match expected {
                Some(Value::String(p)) => p.as_str(),
                _ => return Err(EvalError::PatternNotString),
            };
            let re = Regex::new(pattern).map_err(|source| EvalError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;
            (
                re.is_match(&display(actual)),
                format!("Expected {path} to match pattern {pattern}"),
            )
        }
    };
    Ok(MatchOutcome { passed, message })
}

fn strict_eq(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(b)) => value_eq(a, b),
        _ => false,
    }
}

/// Structural equality; numbers compare by value so `2` equals `2.0`.
fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| value_eq(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).is_some_and(|y| value_eq(x, y)))
        }
        _ => a == b,
    }
}

fn contains(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match actual {
        Some(Value::Array(items)) => match expected {
            Some(needle) => items.iter().any(|item| value_eq(item, needle)),
            None => false,
        },
        _ => display(actual).contains(&display(expected)),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn is_not_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

/// String form used for substring tests, regex matching and messages.
///
/// Missing is `undefined`, arrays join their elements with `,` and objects
/// render as `[object Object]`.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => display_value(v),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Numeric coercion; anything without a numeric reading is NaN, which makes
/// every comparison false.
fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [only] => parse_number(&display_value(only)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Reads decimal and exponent forms, unsigned `0x`/`0o`/`0b` integers and
/// signed `Infinity`. Blank text is zero.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    }
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn check(op: Operator, actual: Option<Value>, expected: Option<Value>) -> bool {
        let condition = Condition {
            operator: op,
            expected,
        };
        apply("$.x", actual.as_ref(), &condition)
            .expect("apply")
            .passed
    }

    #[test]
    fn equality_is_strict_on_type() {
        assert!(check(Operator::Equals, Some(json!(2)), Some(json!(2))));
        assert!(check(Operator::Equals, Some(json!(2.0)), Some(json!(2))));
        assert!(!check(Operator::Equals, Some(json!("2")), Some(json!(2))));
        assert!(check(Operator::Equals, None, None));
        assert!(!check(Operator::Equals, Some(json!(null)), None));
        assert!(check(Operator::NotEquals, Some(json!(1)), Some(json!(2))));
    }

    #[test]
    fn contains_branches_on_arrays() {
        assert!(check(Operator::Contains, Some(json!(["a", "b"])), Some(json!("b"))));
        assert!(!check(Operator::Contains, Some(json!(["ab"])), Some(json!("b"))));
        assert!(check(Operator::Contains, Some(json!("v3")), Some(json!("3"))));
        assert!(check(Operator::Contains, Some(json!(12345)), Some(json!(234))));
        assert!(check(Operator::NotContains, Some(json!("v2c")), Some(json!("3"))));
    }

    #[test]
    fn exists_treats_empty_string_as_absent() {
        assert!(check(Operator::Exists, Some(json!(false)), None));
        assert!(!check(Operator::Exists, Some(json!("")), None));
        assert!(!check(Operator::Exists, None, None));
        assert!(check(Operator::NotExists, Some(json!(null)), None));
    }

    #[test]
    fn empty_covers_collections() {
        assert!(check(Operator::Empty, Some(json!([])), None));
        assert!(check(Operator::Empty, Some(json!({})), None));
        assert!(check(Operator::Empty, None, None));
        assert!(check(Operator::NotEmpty, Some(json!(0)), None));
        assert!(!check(Operator::NotEmpty, Some(json!("")), None));
    }

    #[test]
    fn greater_than_coerces_and_fails_on_nan() {
        assert!(check(Operator::GreaterThan, Some(json!(2)), Some(json!(1))));
        assert!(check(Operator::GreaterThan, Some(json!("10")), Some(json!(9))));
        assert!(!check(Operator::GreaterThan, Some(json!("ten")), Some(json!(1))));
        assert!(!check(Operator::GreaterThan, None, Some(json!(0))));
        assert!(!check(Operator::GreaterThan, Some(json!(1)), Some(json!(1))));
    }

    #[test]
    fn numeric_strings_accept_radix_prefixes_and_infinity() {
        assert_eq!(parse_number("0x10"), 16.0);
        assert_eq!(parse_number(" 0b101 "), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert!(parse_number("-0x10").is_nan());
        assert!(parse_number("0xfg").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(check(Operator::GreaterThan, Some(json!("Infinity")), Some(json!("0x10"))));
    }

    #[test]
    fn matches_uses_string_form() {
        assert!(check(
            Operator::Matches,
            Some(json!("edge-rtr-01")),
            Some(json!("^edge-"))
        ));
        assert!(!check(Operator::Matches, None, Some(json!("^edge-"))));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let condition = Condition {
            operator: Operator::Matches,
            expected: Some(json!("(unclosed")),
        };
        let err = apply("$.x", Some(&json!("a")), &condition).unwrap_err();
        assert!(matches!(err, EvalError::InvalidRegex { .. }));
    }

    #[test]
    fn messages_render_expected_values() {
        let condition = Condition {
            operator: Operator::Equals,
            expected: Some(json!(2)),
        };
        let out = apply("$.mgmt.ssh.version", Some(&json!(1)), &condition).expect("apply");
        assert_eq!(out.message, "Expected $.mgmt.ssh.version to equal 2");
        assert_eq!(display(Some(&json!(["a", null, 3]))), "a,,3");
        assert_eq!(display(Some(&json!({"k": 1}))), "[object Object]");
        assert_eq!(display(None), "undefined");
    }
}

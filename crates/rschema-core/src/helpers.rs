//! JSON value helpers shared by keyword validators.

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

/// JSON Schema equality: numbers compare by value (`1 == 1.0`), objects
/// ignore member order, everything else is structural.
pub fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => objects_equal(a, b),
        _ => left == right,
    }
}

fn objects_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(k, v)| b.get(k).map_or(false, |other| equal(v, other)))
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    compare_numbers(a, b) == Some(Ordering::Equal)
}

/// Compare two JSON numbers, exactly when both are integers.
pub fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    // Mixed sign with a u64 above i64::MAX.
    if a.as_u64().is_some() && b.as_i64().map_or(false, |y| y < 0) {
        return Some(Ordering::Greater);
    }
    if b.as_u64().is_some() && a.as_i64().map_or(false, |x| x < 0) {
        return Some(Ordering::Less);
    }
    let x = a.as_f64()?;
    let y = b.as_f64()?;
    x.partial_cmp(&y)
}

/// Draft-06+ integer semantics: any number without a fractional part.
pub fn is_integer(n: &Number) -> bool {
    n.is_u64() || n.is_i64() || n.as_f64().map_or(false, |f| f.fract() == 0.0)
}

/// Interpret a keyword value as a non-negative integer limit.
///
/// `2.0` is accepted as `2`; negative or fractional values are not.
pub fn as_limit(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    let f = v.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return Some(f as u64);
    }
    None
}

/// Whether `v` holds a floating-point number anywhere.
///
/// Without floats, structural equality (`==`) and [`equal`] agree, so
/// float-free values can be compared through their serialized form.
pub fn contains_float(v: &Value) -> bool {
    match v {
        Value::Number(n) => n.is_f64(),
        Value::Array(items) => items.iter().any(contains_float),
        Value::Object(map) => map.values().any(contains_float),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_equality_ignores_representation() {
        assert!(equal(&json!(1), &json!(1.0)));
        assert!(!equal(&json!(1), &json!(1.5)));
        assert!(equal(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
    }

    #[test]
    fn object_equality_ignores_order() {
        let a: Value = serde_json::from_str(r#"{"x":1,"y":2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y":2,"x":1}"#).unwrap();
        assert!(equal(&a, &b));
        assert!(!equal(&json!({"x": 1}), &json!({"x": 1, "y": 2})));
    }

    #[test]
    fn distinct_kinds_are_not_equal() {
        assert!(!equal(&json!("1"), &json!(1)));
        assert!(!equal(&json!(null), &json!(false)));
    }

    #[test]
    fn compare_mixed_integers() {
        let big = Number::from(u64::MAX);
        let neg = Number::from(-1i64);
        assert_eq!(compare_numbers(&big, &neg), Some(Ordering::Greater));
        assert_eq!(compare_numbers(&neg, &big), Some(Ordering::Less));
    }

    #[test]
    fn integer_detection() {
        assert!(is_integer(&Number::from(3)));
        assert!(is_integer(&Number::from_f64(3.0).unwrap()));
        assert!(!is_integer(&Number::from_f64(3.5).unwrap()));
    }

    #[test]
    fn limits() {
        assert_eq!(as_limit(&json!(2)), Some(2));
        assert_eq!(as_limit(&json!(2.0)), Some(2));
        assert_eq!(as_limit(&json!(-1)), None);
        assert_eq!(as_limit(&json!(1.5)), None);
        assert_eq!(as_limit(&json!("1")), None);
    }

    #[test]
    fn float_detection_is_deep() {
        assert!(!contains_float(&json!({"a": [1, -2, "x", null]})));
        assert!(contains_float(&json!({"a": [1, {"b": 2.5}]})));
        assert!(contains_float(&json!(1.0)));
    }
}

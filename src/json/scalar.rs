use crate::json::path::{lookup, parse_document};
use crate::strings::{string_to_f64, string_to_i64};
use crate::utils::{Result, UtilError};
use serde_json::{Number, Value};

/// Strings pass through and numbers keep their literal text. `null` reads
/// as absent.
pub fn value_as_string(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(UtilError::InvalidJsonString),
    }
}

/// Numbers and numeric strings, fractions truncated toward zero. Empty
/// strings and `null` read as absent. Integer literals outside the `i64`
/// range are rejected instead of saturating.
pub fn value_as_i64(value: &Value) -> Result<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => string_to_i64(s).map(Some),
        Value::Number(n) => number_as_i64(n).map(Some),
        _ => Err(UtilError::InvalidJsonInt),
    }
}

fn number_as_i64(n: &Number) -> Result<i64> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }

    let text = n.to_string();
    if n.is_u64() || !text.contains(['.', 'e', 'E']) {
        return Err(UtilError::InvalidNumber(text));
    }
    n.as_f64().map(|f| f as i64).ok_or(UtilError::InvalidNumber(text))
}

pub fn value_as_f64(value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => string_to_f64(s).map(Some),
        Value::Number(n) => n.as_f64().map(Some).ok_or(UtilError::InvalidJsonFloat),
        _ => Err(UtilError::InvalidJsonFloat),
    }
}

/// Everything to bool: `null` is `false`, numbers compare against zero,
/// strings accept `true`/`false` in any case or a number.
pub fn value_as_bool(value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Null => Ok(Some(false)),
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(_) => Ok(value_as_i64(value)?.map(|n| n != 0)),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => {
            let lowered = s.to_lowercase();
            match lowered.as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Ok(Some(string_to_i64(&lowered)? != 0)),
            }
        }
        _ => Err(UtilError::InvalidJsonBool),
    }
}

pub fn lookup_string(root: &Value, keys: &[&str]) -> Result<Option<String>> {
    lookup(root, keys).map_or(Ok(None), value_as_string)
}

pub fn lookup_i64(root: &Value, keys: &[&str]) -> Result<Option<i64>> {
    lookup(root, keys).map_or(Ok(None), value_as_i64)
}

pub fn lookup_f64(root: &Value, keys: &[&str]) -> Result<Option<f64>> {
    lookup(root, keys).map_or(Ok(None), value_as_f64)
}

pub fn lookup_bool(root: &Value, keys: &[&str]) -> Result<Option<bool>> {
    lookup(root, keys).map_or(Ok(None), value_as_bool)
}

pub fn get_json_string(data: &[u8], keys: &[&str]) -> Result<Option<String>> {
    lookup_string(&parse_document(data)?, keys)
}

pub fn get_json_int(data: &[u8], keys: &[&str]) -> Result<Option<i64>> {
    lookup_i64(&parse_document(data)?, keys)
}

pub fn get_json_float(data: &[u8], keys: &[&str]) -> Result<Option<f64>> {
    lookup_f64(&parse_document(data)?, keys)
}

pub fn get_json_bool(data: &[u8], keys: &[&str]) -> Result<Option<bool>> {
    lookup_bool(&parse_document(data)?, keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_json_string() {
        assert_eq!(
            get_json_string(br#"{"abc":"123"}"#, &["abc"]).unwrap(),
            Some("123".to_string())
        );
        assert_eq!(
            get_json_string(br#"{"abc":123}"#, &["abc"]).unwrap(),
            Some("123".to_string())
        );
        assert_eq!(
            get_json_string(br#"{"abc":123.456}"#, &["abc"]).unwrap(),
            Some("123.456".to_string())
        );
        assert_eq!(get_json_string(br#"{"abc":null}"#, &["abc"]).unwrap(), None);
        assert_eq!(
            get_json_string(br#"{"abc":1.50}"#, &["abc"]).unwrap(),
            Some("1.50".to_string())
        );
        assert_eq!(
            get_json_string(br#"{"abc":1e2}"#, &["abc"]).unwrap(),
            Some("1e2".to_string())
        );
        assert_eq!(
            get_json_string(br#"{"abc":100.0}"#, &["abc"]).unwrap(),
            Some("100.0".to_string())
        );
        assert_eq!(
            get_json_string(r#"{"abc":"a\"bé"}"#.as_bytes(), &["abc"]).unwrap(),
            Some("a\"bé".to_string())
        );
        assert!(matches!(
            get_json_string(br#"{"abc":[1]}"#, &["abc"]),
            Err(UtilError::InvalidJsonString)
        ));
    }

    #[test]
    fn test_get_json_int() {
        assert_eq!(get_json_int(br#"{"abc":"123"}"#, &["abc"]).unwrap(), Some(123));
        assert_eq!(get_json_int(br#"{"abc":123}"#, &["abc"]).unwrap(), Some(123));
        assert_eq!(get_json_int(br#"{"abc":123.456}"#, &["abc"]).unwrap(), Some(123));
        assert_eq!(get_json_int(br#"{"abc":"123.456"}"#, &["abc"]).unwrap(), Some(123));
        assert_eq!(get_json_int(br#"{"abc":""}"#, &["abc"]).unwrap(), None);
        assert_eq!(get_json_int(br#"{"abc":null}"#, &["abc"]).unwrap(), None);
        assert_eq!(get_json_int(br#"{"abc":1}"#, &["zzz"]).unwrap(), None);
        assert!(matches!(
            get_json_int(br#"{"abc":true}"#, &["abc"]),
            Err(UtilError::InvalidJsonInt)
        ));
        assert!(matches!(
            get_json_int(br#"{"abc":"twelve"}"#, &["abc"]),
            Err(UtilError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_get_json_int_out_of_range() {
        assert_eq!(
            get_json_int(br#"{"abc":9223372036854775807}"#, &["abc"]).unwrap(),
            Some(i64::MAX)
        );
        assert!(matches!(
            get_json_int(br#"{"abc":18446744073709551615}"#, &["abc"]),
            Err(UtilError::InvalidNumber(text)) if text == "18446744073709551615"
        ));
        assert!(matches!(
            get_json_int(br#"{"abc":-9223372036854775809}"#, &["abc"]),
            Err(UtilError::InvalidNumber(_))
        ));
        assert_eq!(get_json_int(br#"{"abc":1e2}"#, &["abc"]).unwrap(), Some(100));
    }

    #[test]
    fn test_get_json_float() {
        assert_eq!(get_json_float(br#"{"abc":"123"}"#, &["abc"]).unwrap(), Some(123.0));
        assert_eq!(get_json_float(br#"{"abc":123}"#, &["abc"]).unwrap(), Some(123.0));
        assert_eq!(
            get_json_float(br#"{"abc":123.456}"#, &["abc"]).unwrap(),
            Some(123.456)
        );
        assert_eq!(
            get_json_float(br#"{"abc":"123.456"}"#, &["abc"]).unwrap(),
            Some(123.456)
        );
        assert_eq!(get_json_float(br#"{"abc":""}"#, &["abc"]).unwrap(), None);
        assert_eq!(get_json_float(br#"{"abc":null}"#, &["abc"]).unwrap(), None);
        assert!(matches!(
            get_json_float(br#"{"abc":{}}"#, &["abc"]),
            Err(UtilError::InvalidJsonFloat)
        ));
    }

    #[test]
    fn test_get_json_bool() {
        assert_eq!(get_json_bool(br#"{"abc":true}"#, &["abc"]).unwrap(), Some(true));
        assert_eq!(get_json_bool(br#"{"abc":null}"#, &["abc"]).unwrap(), Some(false));
        assert_eq!(get_json_bool(br#"{"abc":0}"#, &["abc"]).unwrap(), Some(false));
        assert_eq!(get_json_bool(br#"{"abc":2}"#, &["abc"]).unwrap(), Some(true));
        assert_eq!(get_json_bool(br#"{"abc":"True"}"#, &["abc"]).unwrap(), Some(true));
        assert_eq!(get_json_bool(br#"{"abc":"FALSE"}"#, &["abc"]).unwrap(), Some(false));
        assert_eq!(get_json_bool(br#"{"abc":"1"}"#, &["abc"]).unwrap(), Some(true));
        assert_eq!(get_json_bool(br#"{"abc":""}"#, &["abc"]).unwrap(), None);
        assert_eq!(get_json_bool(br#"{"abc":true}"#, &["x"]).unwrap(), None);
        assert!(matches!(
            get_json_bool(br#"{"abc":[]}"#, &["abc"]),
            Err(UtilError::InvalidJsonBool)
        ));
        assert!(get_json_bool(br#"{"abc":"yes"}"#, &["abc"]).is_err());
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            get_json_int(br#"{"abc":"#, &["abc"]),
            Err(UtilError::Json(_))
        ));
    }
}

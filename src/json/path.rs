use crate::utils::Result;
use serde_json::Value;

/// Parses a raw JSON document. Malformed input surfaces as `UtilError::Json`.
pub fn parse_document(data: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(data)?)
}

/// Follows a key path from `root`.
///
/// A segment written as `[N]` indexes into an array; anything else is an
/// object key. Returns `None` as soon as a segment does not resolve.
pub fn lookup<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(root, |current, key| match array_index(key) {
        Some(index) => current.as_array()?.get(index),
        None => current.as_object()?.get(*key),
    })
}

fn array_index(segment: &str) -> Option<usize> {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .and_then(|s| s.parse::<usize>().ok())
}

/// True when the path resolves, including to an explicit `null`.
pub fn has_json_key(data: &[u8], keys: &[&str]) -> bool {
    match parse_document(data) {
        Ok(root) => lookup(&root, keys).is_some(),
        Err(e) => {
            tracing::debug!(?keys, error = %e, "has_json_key: malformed document");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_json_key() {
        assert!(has_json_key(br#"{"abc":"123"}"#, &["abc"]));
        assert!(!has_json_key(br#"{"abc":123}"#, &["ab"]));
        assert!(has_json_key(br#"{"abc":null}"#, &["abc"]));
        assert!(!has_json_key(br#"{"abc":null}"#, &["ab"]));
        assert!(!has_json_key(br#"{"abc":"#, &["abc"]));
    }

    #[test]
    fn test_lookup_nested_and_indexed() {
        let doc = json!({"a": {"b": [10, {"c": "deep"}]}});

        assert_eq!(lookup(&doc, &["a", "b", "[0]"]), Some(&json!(10)));
        assert_eq!(lookup(&doc, &["a", "b", "[1]", "c"]), Some(&json!("deep")));
        assert_eq!(lookup(&doc, &["a", "b", "[2]"]), None);
        assert_eq!(lookup(&doc, &["a", "x"]), None);
        assert_eq!(lookup(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_bracket_key_on_object_is_a_plain_key() {
        let doc = json!({"[0]": 1});
        assert_eq!(lookup(&doc, &["[0]"]), None);

        let doc = json!({"[x]": 1});
        assert_eq!(lookup(&doc, &["[x]"]), Some(&json!(1)));
    }
}

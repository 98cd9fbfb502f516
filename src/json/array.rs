use crate::json::path::{lookup, parse_document};
use crate::json::scalar::value_as_i64;
use crate::utils::{Result, UtilError};
use serde_json::Value;

type Convert<T> = fn(&Value) -> Result<Option<T>>;

fn to_i32(value: &Value) -> Result<Option<i32>> {
    match value_as_i64(value)? {
        Some(n) => i32::try_from(n)
            .map(Some)
            .map_err(|_| UtilError::InvalidNumber(n.to_string())),
        None => Ok(None),
    }
}

fn resolve_array<'a>(root: &'a Value, keys: &[&str]) -> Result<Option<&'a Vec<Value>>> {
    match lookup(root, keys) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => {
            tracing::error!(?keys, kind = json_kind(other), "expected a json array");
            Err(UtilError::InvalidJsonArray)
        }
    }
}

/// Coerces every element, skipping (and logging) the ones that fail.
/// `null` and empty-string elements become zero.
fn coerce_flat<T: Default>(items: &[Value], convert: Convert<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());

    for (offset, item) in items.iter().enumerate() {
        match convert(item) {
            Ok(v) => out.push(v.unwrap_or_default()),
            Err(e) => {
                tracing::error!(offset = offset, error = %e, "json array element skipped");
            }
        }
    }

    out
}

fn coerce_nested<T: Default>(items: &[Value], convert: Convert<T>) -> Vec<Vec<T>> {
    items
        .iter()
        .enumerate()
        .filter_map(|(offset, item)| match item {
            Value::Array(inner) => Some(coerce_flat(inner, convert)),
            other => {
                tracing::error!(
                    offset = offset,
                    kind = json_kind(other),
                    "json nested array entry skipped"
                );
                None
            }
        })
        .collect()
}

fn coerce_nested3<T: Default>(items: &[Value], convert: Convert<T>) -> Vec<Vec<Vec<T>>> {
    items
        .iter()
        .enumerate()
        .filter_map(|(offset, item)| match item {
            Value::Array(inner) => Some(coerce_nested(inner, convert)),
            other => {
                tracing::error!(
                    offset = offset,
                    kind = json_kind(other),
                    "json nested array entry skipped"
                );
                None
            }
        })
        .collect()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

pub fn lookup_int_arr(root: &Value, keys: &[&str]) -> Result<Option<Vec<i32>>> {
    Ok(resolve_array(root, keys)?.map(|items| coerce_flat(items, to_i32)))
}

pub fn lookup_i64_arr(root: &Value, keys: &[&str]) -> Result<Option<Vec<i64>>> {
    Ok(resolve_array(root, keys)?.map(|items| coerce_flat(items, value_as_i64)))
}

pub fn get_json_int_arr(data: &[u8], keys: &[&str]) -> Result<Option<Vec<i32>>> {
    lookup_int_arr(&parse_document(data)?, keys)
}

pub fn get_json_i64_arr(data: &[u8], keys: &[&str]) -> Result<Option<Vec<i64>>> {
    lookup_i64_arr(&parse_document(data)?, keys)
}

pub fn get_json_int_arr2(data: &[u8], keys: &[&str]) -> Result<Option<Vec<Vec<i32>>>> {
    let root = parse_document(data)?;
    Ok(resolve_array(&root, keys)?.and_then(|items| non_empty(coerce_nested(items, to_i32))))
}

pub fn get_json_i64_arr2(data: &[u8], keys: &[&str]) -> Result<Option<Vec<Vec<i64>>>> {
    let root = parse_document(data)?;
    Ok(resolve_array(&root, keys)?
        .and_then(|items| non_empty(coerce_nested(items, value_as_i64))))
}

pub fn get_json_int_arr3(data: &[u8], keys: &[&str]) -> Result<Option<Vec<Vec<Vec<i32>>>>> {
    let root = parse_document(data)?;
    Ok(resolve_array(&root, keys)?.and_then(|items| non_empty(coerce_nested3(items, to_i32))))
}

pub fn get_json_i64_arr3(data: &[u8], keys: &[&str]) -> Result<Option<Vec<Vec<Vec<i64>>>>> {
    let root = parse_document(data)?;
    Ok(resolve_array(&root, keys)?
        .and_then(|items| non_empty(coerce_nested3(items, value_as_i64))))
}

/// Calls `cb(offset, element)` for every element of the array at `keys`.
/// A missing path is not an error.
pub fn for_each_json_array<F>(data: &[u8], keys: &[&str], mut cb: F) -> Result<()>
where
    F: FnMut(usize, &Value),
{
    let root = parse_document(data)?;
    if let Some(items) = resolve_array(&root, keys)? {
        for (offset, item) in items.iter().enumerate() {
            cb(offset, item);
        }
    }
    Ok(())
}

/// Calls `cb(key, value)` for every member of the object at `keys`, in
/// document order. Stops at the first callback error.
pub fn for_each_json_object<F>(data: &[u8], keys: &[&str], mut cb: F) -> Result<()>
where
    F: FnMut(&str, &Value) -> Result<()>,
{
    let root = parse_document(data)?;
    let object = match lookup(&root, keys) {
        None => return Ok(()),
        Some(Value::Object(object)) => object,
        Some(other) => {
            tracing::error!(?keys, kind = json_kind(other), "expected a json object");
            return Err(UtilError::InvalidJsonObject);
        }
    };

    for (key, value) in object {
        if let Err(e) = cb(key, value) {
            tracing::error!(key = %key, error = %e, "for_each_json_object: callback failed");
            return Err(e);
        }
    }

    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

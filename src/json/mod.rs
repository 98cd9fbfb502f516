//! Typed reads from loosely-typed JSON.
//!
//! Producers of the documents this module reads are inconsistent about
//! types: numbers arrive as strings, booleans as `0`/`1` or `"True"`. Every
//! accessor here takes a key path and coerces what it finds, returning
//! `Ok(None)` when the path is missing instead of an error.

pub mod array;
pub mod path;
pub mod scalar;

pub use array::{
    for_each_json_array, for_each_json_object, get_json_i64_arr, get_json_i64_arr2,
    get_json_i64_arr3, get_json_int_arr, get_json_int_arr2, get_json_int_arr3, lookup_i64_arr,
    lookup_int_arr,
};
pub use path::{has_json_key, lookup, parse_document};
pub use scalar::{
    get_json_bool, get_json_float, get_json_int, get_json_string, lookup_bool, lookup_f64,
    lookup_i64, lookup_string, value_as_bool, value_as_f64, value_as_i64, value_as_string,
};

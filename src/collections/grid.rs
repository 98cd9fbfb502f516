use crate::utils::{Result, UtilError};
use std::collections::HashMap;

/// Row-major flat buffer into `y` rows of width `x`.
pub fn i32_to_arr2(arr: &[i32], x: usize, y: usize) -> Result<Vec<Vec<i64>>> {
    let expected = x * y;
    if arr.len() != expected || x == 0 {
        tracing::error!(len = arr.len(), x = x, y = y, "i32_to_arr2: invalid array length");
        return Err(UtilError::InvalidArrayLength {
            len: arr.len(),
            expected,
        });
    }

    Ok(arr
        .chunks_exact(x)
        .map(|row| row.iter().map(|&v| i64::from(v)).collect())
        .collect())
}

/// Flattens rows and returns `(flat, width, height)`; width is taken from the
/// first row.
pub fn arr2_to_i32(arr: &[Vec<i64>]) -> (Vec<i32>, usize, usize) {
    let flat = arr.iter().flatten().map(|&v| v as i32).collect();
    let width = arr.first().map_or(0, Vec::len);
    (flat, width, arr.len())
}

/// Flat buffer into `z` planes of `y` rows of width `x`, so that
/// `out[cz][cy][cx] == arr[cz * x * y + cy * x + cx]`.
pub fn i32_to_arr3(arr: &[i32], x: usize, y: usize, z: usize) -> Result<Vec<Vec<Vec<i64>>>> {
    let expected = x * y * z;
    if arr.len() != expected || x == 0 || y == 0 {
        tracing::error!(
            len = arr.len(),
            x = x,
            y = y,
            z = z,
            "i32_to_arr3: invalid array length"
        );
        return Err(UtilError::InvalidArrayLength {
            len: arr.len(),
            expected,
        });
    }

    Ok(arr
        .chunks_exact(x * y)
        .map(|plane| {
            plane
                .chunks_exact(x)
                .map(|row| row.iter().map(|&v| i64::from(v)).collect())
                .collect()
        })
        .collect())
}

/// Flattens planes and returns `(flat, x, y, z)` measured from the first
/// plane and row.
pub fn arr3_to_i32(arr: &[Vec<Vec<i64>>]) -> (Vec<i32>, usize, usize, usize) {
    let flat = arr.iter().flatten().flatten().map(|&v| v as i32).collect();
    let y = arr.first().map_or(0, Vec::len);
    let x = arr
        .first()
        .and_then(|plane| plane.first())
        .map_or(0, Vec::len);
    (flat, x, y, arr.len())
}

pub fn map_to_i32(map: &HashMap<i64, i64>) -> HashMap<i32, i32> {
    map.iter().map(|(&k, &v)| (k as i32, v as i32)).collect()
}

/// First position of `value` at or after `start`. A negative start searches
/// from the beginning.
pub fn index_of<T: PartialEq>(arr: &[T], value: &T, start: isize) -> Option<usize> {
    let start = start.max(0) as usize;
    arr.get(start..)?
        .iter()
        .position(|v| v == value)
        .map(|i| i + start)
}

/// Searches a flat `[x0, y0, x1, y1, ...]` slice for the pair `(x, y)`,
/// starting at pair index `start`. Returns the pair index.
pub fn index_of_pair<T: PartialEq>(arr: &[T], x: &T, y: &T, start: isize) -> Option<usize> {
    let start = start.max(0) as usize;
    arr.chunks_exact(2)
        .enumerate()
        .skip(start)
        .find(|(_, pair)| pair[0] == *x && pair[1] == *y)
        .map(|(i, _)| i)
}

/// Pushes `value` unless it is already present. Returns whether it was added.
pub fn insert_unique<T: PartialEq>(arr: &mut Vec<T>, value: T) -> bool {
    if arr.contains(&value) {
        return false;
    }
    arr.push(value);
    true
}

/// Searches a flat slice of `(x, y, z)` triples and returns the offset of the
/// first element of the match. Slices whose length is not a multiple of three
/// never match.
pub fn find_triple<T: PartialEq>(arr: &[T], x: &T, y: &T, z: &T) -> Option<usize> {
    if arr.len() % 3 != 0 {
        return None;
    }

    arr.chunks_exact(3)
        .position(|t| t[0] == *x && t[1] == *y && t[2] == *z)
        .map(|i| i * 3)
}

pub fn find_row<T: PartialEq>(rows: &[Vec<T>], values: &[T]) -> Option<usize> {
    rows.iter().position(|row| row.as_slice() == values)
}

/// `[x, y, z]` rows become `[x, y, z, value]`.
pub fn append_to_rows<T: Clone>(rows: &[Vec<T>], value: T) -> Vec<Vec<T>> {
    rows.iter()
        .map(|row| {
            let mut next = Vec::with_capacity(row.len() + 1);
            next.extend_from_slice(row);
            next.push(value.clone());
            next
        })
        .collect()
}

pub fn is_same_arr2<T: PartialEq>(a: &[Vec<T>], b: &[Vec<T>]) -> bool {
    a == b
}

/// Row counts and row lengths must match; only the first `n` columns of each
/// row are compared.
pub fn is_same_arr2_prefix<T: PartialEq>(a: &[Vec<T>], b: &[Vec<T>], n: usize) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(ra, rb)| {
            ra.len() == rb.len() && ra.iter().zip(rb).take(n).all(|(va, vb)| va == vb)
        })
}

pub fn is_same_arr2_i32(a: &[Vec<i64>], b: &[Vec<i32>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(ra, rb)| {
            ra.len() == rb.len() && ra.iter().zip(rb).all(|(va, vb)| *va == i64::from(*vb))
        })
}

pub fn clone_arr2<T: Clone>(rows: &[Vec<T>]) -> Vec<Vec<T>> {
    rows.to_vec()
}

pub fn clone_arr3<T: Clone>(planes: &[Vec<Vec<T>>]) -> Vec<Vec<Vec<T>>> {
    planes.to_vec()
}

/// Transposes `arr[x][y]` into `arr[y][x]`. Ragged input, where some row
/// length differs from the first, yields an empty result.
pub fn flip_arr2<T: Clone>(arr: &[Vec<T>]) -> Vec<Vec<T>> {
    let Some(first) = arr.first() else {
        return Vec::new();
    };
    if arr.iter().any(|row| row.len() != first.len()) {
        tracing::warn!(rows = arr.len(), "flip_arr2: ragged input");
        return Vec::new();
    }

    (0..first.len())
        .map(|y| arr.iter().map(|column| column[y].clone()).collect())
        .collect()
}

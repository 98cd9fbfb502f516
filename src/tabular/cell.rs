const CELL_NAME: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Zero-based `(column, row)` to an A1-style reference.
///
/// `(0, 0)` is `A1`, `(26, 0)` is `AA1`. Columns past `ZZ` and negative
/// coordinates have no name.
pub fn pos_to_cell(x: i32, y: i32) -> Option<String> {
    if x < 0 || y < 0 {
        return None;
    }

    let (x, row) = (x as usize, y as i64 + 1);
    let letters = CELL_NAME.len();

    if x < letters {
        return Some(format!("{}{}", CELL_NAME[x] as char, row));
    }

    let high = x / letters;
    if high <= letters {
        let low = x % letters;
        return Some(format!(
            "{}{}{}",
            CELL_NAME[high - 1] as char,
            CELL_NAME[low] as char,
            row
        ));
    }

    None
}

use crate::utils::{Result, UtilError};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::Path;

/// Walks one worksheet: the first used row names the columns, every later
/// cell under a named column is passed to `on_data(x, y, header, value)`.
///
/// `x` and `y` are absolute sheet positions, `A1` being `(0, 0)`, so they
/// line up with [`pos_to_cell`](super::pos_to_cell) even when the data does
/// not start in the corner.
///
/// `on_header(x, text)` may rewrite the header text before it is stored.
/// With no `sheet` (or an empty name) the first sheet of the workbook is used.
pub fn load_excel<P, H, D>(
    path: P,
    sheet: Option<&str>,
    mut on_header: H,
    mut on_data: D,
) -> Result<()>
where
    P: AsRef<Path>,
    H: FnMut(usize, &str) -> String,
    D: FnMut(usize, usize, &str, &str) -> Result<()>,
{
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "load_excel: open failed");
        UtilError::Excel(e.to_string())
    })?;

    let sheet_name = match sheet {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| UtilError::Excel(format!("{} has no sheets", path.display())))?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        tracing::error!(
            path = %path.display(),
            sheet = %sheet_name,
            error = %e,
            "load_excel: worksheet_range failed"
        );
        UtilError::Excel(e.to_string())
    })?;

    let (row0, col0) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or_default();
    let mut column_names: HashMap<usize, String> = HashMap::new();

    for (offset, row) in range.rows().enumerate() {
        let cells = trim_trailing_empty(row);
        let y = row0 + offset;

        if offset == 0 {
            for (i, cell) in cells.iter().enumerate() {
                let x = col0 + i;
                column_names.insert(x, on_header(x, &cell.to_string()));
            }
            continue;
        }

        for (i, cell) in cells.iter().enumerate() {
            let x = col0 + i;
            let Some(header) = column_names.get(&x) else {
                continue;
            };

            let value = cell.to_string();
            if let Err(e) = on_data(x, y, header, &value) {
                tracing::error!(
                    x = x,
                    y = y,
                    header = %header,
                    val = %value,
                    error = %e,
                    "load_excel: data callback failed"
                );
                return Err(e);
            }
        }
    }

    Ok(())
}

fn trim_trailing_empty(row: &[Data]) -> &[Data] {
    let end = row
        .iter()
        .rposition(|cell| !is_empty_cell(cell))
        .map(|i| i + 1)
        .unwrap_or(0);
    &row[..end]
}

fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

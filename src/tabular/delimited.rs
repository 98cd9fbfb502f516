use crate::utils::Result;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Column index to header name, filled from every row the caller marks as a
/// head row.
pub type HeaderMap = HashMap<usize, String>;

/// Streams every record of a CSV file through two callbacks.
///
/// `is_head_row(i, row)` decides whether record `i` is a header; header cells
/// are stored by column index. Every other record goes to
/// `proc_row(i, row, headers)`. The index counts all records, header rows
/// included. The first callback error stops the load and is returned.
pub fn load_csv_file<P, H, F>(path: P, mut is_head_row: H, mut proc_row: F) -> Result<()>
where
    P: AsRef<Path>,
    H: FnMut(usize, &[String]) -> bool,
    F: FnMut(usize, &[String], &HeaderMap) -> Result<()>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "load_csv_file: open failed");
        e
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut headers = HeaderMap::new();
    let mut record = StringRecord::new();
    let mut index = 0usize;

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::error!(i = index, error = %e, "load_csv_file: read failed");
                return Err(e.into());
            }
        }

        let row = string_record_to_vec(&record);

        if is_head_row(index, &row) {
            for (col, value) in row.into_iter().enumerate() {
                headers.insert(col, value);
            }
        } else if let Err(e) = proc_row(index, &row, &headers) {
            tracing::error!(i = index, error = %e, "load_csv_file: row callback failed");
            return Err(e);
        }

        index += 1;
    }

    Ok(())
}

/// Loads a CSV file whose first record is the header and returns the header
/// names plus one name-to-cell map per data row. Cells beyond the header
/// width are dropped.
pub fn load_csv_records<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<String>, Vec<HashMap<String, String>>)> {
    let mut column_names: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    load_csv_file(
        path,
        |i, row| {
            if i == 0 {
                column_names = row.to_vec();
                true
            } else {
                false
            }
        },
        |_, row, headers| {
            let mut map = HashMap::with_capacity(headers.len());
            for (col, value) in row.iter().enumerate() {
                if let Some(name) = headers.get(&col) {
                    map.insert(name.clone(), value.clone());
                }
            }
            rows.push(map);
            Ok(())
        },
    )?;

    Ok((column_names, rows))
}

pub fn string_record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}

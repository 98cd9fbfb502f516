pub mod cell;
pub mod delimited;
pub mod excel;

pub use cell::pos_to_cell;
pub use delimited::{load_csv_file, load_csv_records, string_record_to_vec, HeaderMap};
pub use excel::load_excel;

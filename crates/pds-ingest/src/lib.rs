pub mod csv_table;
pub mod frame;
pub mod write;

pub use csv_table::{CsvTable, ReadOptions, SourceEncoding, read_csv_table};
pub use frame::{
    build_string_frame, build_string_frame_with_columns, cast_f64_column, parse_f64,
    parse_f64_locale, parse_i64,
};
pub use write::write_frame_csv;

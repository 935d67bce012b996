//! Run log parsing: file-name configuration, line scanning, series storage.

pub mod filename;
pub mod parse;
pub mod series;
pub mod value;

pub use filename::RunConfig;
pub use parse::LineScanner;
pub use series::SeriesTable;
pub use value::Number;

//! Report rendering.

pub mod json;
pub mod table;

pub use json::render_json_report;
pub use table::render_table_report;

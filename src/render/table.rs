use crate::Result;
use crate::model::{ReportTable, RunResult};

use std::fmt::Write;

/// Column header line; the mean/sigma pairs each name only their first column.
pub const HEADER: &str = "nodes\tranks_per_node\tcollectors\tranks\tmessages_per_second\t\tworker_wait_time\t\tmerge_time";

/// Render the fixed-column text report, one row per table entry in table order.
///
/// Integers are right-aligned in 10 columns; floats likewise with 4 decimals.
pub fn render_table_report(table: &ReportTable) -> Result<String> {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for (_, result) in table.iter() {
        write_row(&mut out, result)?;
    }
    Ok(out)
}

fn write_row(out: &mut String, r: &RunResult) -> Result<()> {
    let c = &r.config;
    writeln!(
        out,
        "{:10}\t{:10}\t{:10}\t{:10}\t{:10.4}\t{:10.4}\t{:10.4}\t{:10.4}\t{:10.4}\t{:10.4}",
        c.nodes()?,
        c.ranks_per_node()?,
        c.collectors()?,
        c.ranks()?,
        r.messages_per_second.mean,
        r.messages_per_second.sigma,
        r.worker_wait_time.mean,
        r.worker_wait_time.sigma,
        r.merge_time.mean,
        r.merge_time.sigma,
    )?;
    Ok(())
}

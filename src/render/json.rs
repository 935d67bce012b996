use crate::Result;
use crate::log::{RunConfig, SeriesTable};
use crate::model::{ReportTable, SummaryStat};

use serde::Serialize;

#[derive(Debug, Serialize)]
struct RowView<'a> {
    descr: &'a str,
    ranks: i64,
    config: &'a RunConfig,
    messages_per_second: SummaryStat,
    worker_wait_time: SummaryStat,
    merge_time: SummaryStat,
    probe_time: SummaryStat,
    series: &'a SeriesTable,
}

/// Render the report as a pretty-printed JSON array in table order.
pub fn render_json_report(table: &ReportTable) -> Result<String> {
    let mut rows = Vec::with_capacity(table.len());
    for (descr, r) in table.iter() {
        rows.push(RowView {
            descr,
            ranks: r.config.ranks()?,
            config: &r.config,
            messages_per_second: r.messages_per_second,
            worker_wait_time: r.worker_wait_time,
            merge_time: r.merge_time,
            probe_time: r.probe_time,
            series: &r.series,
        });
    }
    let mut json = serde_json::to_string_pretty(&rows)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Number;
    use crate::model::RunResult;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_carry_config_and_series() {
        let mut series = SeriesTable::default();
        series.add_column("messages_per_second");
        series.push_row(&[Number::Float(10.5)]).unwrap();
        series.append_column("worker_wait_time", vec![Number::Float(0.25)]);

        let s = SummaryStat {
            mean: 1.0,
            sigma: 0.0,
        };
        let mut table = ReportTable::default();
        table.insert(
            "4r_2n_8c",
            RunResult {
                config: RunConfig::from_path("job1.4r_2n_8c.log").unwrap(),
                series,
                worker_wait_time: s,
                messages_per_second: s,
                merge_time: s,
                probe_time: s,
            },
        );

        let out = render_json_report(&table).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        let row = &v[0];
        assert_eq!(row["descr"], "4r_2n_8c");
        assert_eq!(row["ranks"], 8);
        assert_eq!(row["config"]["jobid"], "job1");
        assert_eq!(row["config"]["collectors"], 8);
        assert_eq!(row["messages_per_second"]["mean"], 1.0);
        assert_eq!(row["series"]["messages_per_second"][0], 10.5);
        assert_eq!(row["series"]["worker_wait_time"][0], 0.25);
    }
}

//! Aggregation model: one summarized result per run log, collected into a report table.

pub mod stats;

pub use stats::{SummaryStat, summarize};

use crate::Result;
use crate::log::filename::{DESCR, JOBID};
use crate::log::{LineScanner, Number, RunConfig, SeriesTable};

use anyhow::{Context, anyhow};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub const WORKER_WAIT_TIME: &str = "worker_wait_time";
pub const MESSAGES_PER_SECOND: &str = "messages_per_second";
pub const MERGE_TIME: &str = "merge_time";
pub const PROBE_TIME: &str = "probe_time";

/// Fully computed result of one run log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub config: RunConfig,
    pub series: SeriesTable,
    pub worker_wait_time: SummaryStat,
    pub messages_per_second: SummaryStat,
    pub merge_time: SummaryStat,
    pub probe_time: SummaryStat,
}

/// Run results keyed by description, in first-insertion order.
///
/// Re-inserting a description replaces the stored result in place.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    rows: Vec<(String, RunResult)>,
    index: HashMap<String, usize>,
}

impl ReportTable {
    /// Insert `result` under `descr`, returning the result it replaced.
    pub fn insert(&mut self, descr: impl Into<String>, result: RunResult) -> Option<RunResult> {
        let descr = descr.into();
        match self.index.get(&descr) {
            Some(&i) => Some(std::mem::replace(&mut self.rows[i].1, result)),
            None => {
                self.index.insert(descr.clone(), self.rows.len());
                self.rows.push((descr, result));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RunResult)> {
        self.rows.iter().map(|(d, r)| (d.as_str(), r))
    }
}

/// Parse one run log into a summarized [`RunResult`].
pub fn process_file(scanner: &LineScanner, path: &str) -> Result<RunResult> {
    info!("processing {}", path);

    let mut config = RunConfig::from_path(path)?;
    info!(
        "processing file: {}; job {} with {} rpn, {} nodes, {} collectors",
        path,
        config.text(JOBID)?,
        config.ranks_per_node()?,
        config.nodes()?,
        config.collectors()?
    );

    let scanned = scanner.scan_file(path, &mut config)?;
    let mut series = scanned.series;

    let worker_wait_time = summarize(&scanned.wait_times)
        .with_context(|| format!("{}: {}", path, WORKER_WAIT_TIME))?;
    series.append_column(
        WORKER_WAIT_TIME,
        scanned.wait_times.into_iter().map(Number::Float).collect(),
    );

    let messages_per_second = summarize_series(&series, MESSAGES_PER_SECOND, path)?;
    let merge_time = summarize_series(&series, MERGE_TIME, path)?;
    let probe_time = summarize_series(&series, PROBE_TIME, path)?;

    info!("worker_wait_time:    {:?}", worker_wait_time);
    info!("messages_per_second: {:?}", messages_per_second);
    info!("merge_time:          {:?}", merge_time);
    info!("probe_time:          {:?}", probe_time);

    Ok(RunResult {
        config,
        series,
        worker_wait_time,
        messages_per_second,
        merge_time,
        probe_time,
    })
}

fn summarize_series(series: &SeriesTable, name: &str, path: &str) -> Result<SummaryStat> {
    let values = series
        .floats(name)
        .with_context(|| format!("{}: required series not found", path))?;
    summarize(&values).with_context(|| format!("{}: {}", path, name))
}

/// Process `paths` in order; the first failure aborts the whole batch.
pub fn aggregate<P: AsRef<Path>>(paths: &[P]) -> Result<ReportTable> {
    let scanner = LineScanner::new()?;
    let mut table = ReportTable::default();
    for path in paths {
        let path = path.as_ref().to_string_lossy();
        let result = process_file(&scanner, &path)?;
        // An override may have turned descr into an integer; key by its display form.
        let descr = result
            .config
            .get(DESCR)
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("{}: config key {} is missing", path, DESCR))?;
        if table.insert(descr.clone(), result).is_some() {
            warn!("{} replaces an earlier run with descr {}", path, descr);
        }
    }
    Ok(table)
}

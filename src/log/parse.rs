use crate::Result;
use crate::log::filename::RunConfig;
use crate::log::series::SeriesTable;
use crate::log::value::{ConfigValue, Number};

use anyhow::{Context, anyhow};
use regex::Regex;
use std::fs;
use tracing::{debug, error};

/// Prefix of series header and data lines.
pub const SERIES_PREFIX: &str = "CCT ";

/// Data lines containing this are repeated headers and are skipped.
const RUN_TIME_MARKER: &str = "run time";

const WAIT_TIME_MARKER: &str = "wait time:";

/// Everything pulled out of one log file's lines.
#[derive(Debug, Clone, Default)]
pub struct ScannedLog {
    pub series: SeriesTable,
    pub wait_times: Vec<f64>,
}

/// Line classifier for one run log.
///
/// Lines are classified in order, first match wins:
/// - `CCT <name>\t<name>...` (first one only): series schema
/// - `CCT <v> <v> ...` (without "run time"): one sample per series
/// - `... running with <key>: <int>`: config override
/// - `... wait time: <float>`: worker wait sample
///
/// Anything else is ignored.
pub struct LineScanner {
    config_re: Regex,
}

impl LineScanner {
    pub fn new() -> Result<Self> {
        // Key runs up to the first ':' after the marker; value is the rest of the line.
        let config_re = Regex::new(r" running with ([^:]*)(?::(.*))?$")?;
        Ok(Self { config_re })
    }

    /// Read `path` and scan all of its lines into `config` and the returned series.
    pub fn scan_file(&self, path: &str, config: &mut RunConfig) -> Result<ScannedLog> {
        let text = fs::read_to_string(path).with_context(|| format!("read log file {}", path))?;
        self.scan_lines(path, text.lines(), config)
    }

    /// Scan `lines`; `source` only labels diagnostics.
    ///
    /// The first failing line is logged at ERROR with its text and aborts the scan.
    pub fn scan_lines<'a>(
        &self,
        source: &str,
        lines: impl IntoIterator<Item = &'a str>,
        config: &mut RunConfig,
    ) -> Result<ScannedLog> {
        let mut out = ScannedLog::default();

        for (lineno, line) in lines.into_iter().enumerate() {
            let lno = lineno + 1;
            if let Err(err) = self.scan_line(line, config, &mut out) {
                error!(file = source, line = lno, "received error for line {:?}: {:#}", line, err);
                return Err(err.context(format!(
                    "line parse error at {}:{}: {:?}",
                    source, lno, line
                )));
            }
        }

        Ok(out)
    }

    fn scan_line(&self, line: &str, config: &mut RunConfig, out: &mut ScannedLog) -> Result<()> {
        if let Some(rest) = line.strip_prefix(SERIES_PREFIX) {
            if !out.series.has_schema() {
                for field in rest.split('\t') {
                    out.series.add_column(normalize_name(field));
                }
                debug!(names = ?out.series.names(), "series schema");
            } else if !line.contains(RUN_TIME_MARKER) {
                let width = out.series.names().len();
                // Token 0 is the prefix itself.
                let values = line
                    .split_whitespace()
                    .skip(1)
                    .take(width)
                    .map(Number::parse)
                    .collect::<Result<Vec<_>>>()?;
                out.series.push_row(&values)?;
            }
        } else if let Some(caps) = self.config_re.captures(line) {
            let key = normalize_name(&caps[1]);
            let raw = caps
                .get(2)
                .ok_or_else(|| anyhow!("config {} has no ':' before its value", key))?
                .as_str()
                .trim();
            let value: i64 = raw
                .parse()
                .with_context(|| format!("config {} has non-integer value {:?}", key, raw))?;
            debug!(key = %key, value, "config override");
            config.set(key, ConfigValue::Int(value));
        } else if line.contains(WAIT_TIME_MARKER) {
            let start = line
                .find(':')
                .ok_or_else(|| anyhow!("wait time line without ':'"))?;
            let raw = line[start + 1..].trim();
            let value: f64 = raw
                .parse()
                .with_context(|| format!("invalid wait time {:?}", raw))?;
            out.wait_times.push(value);
        }
        Ok(())
    }
}

/// Trim and replace spaces with underscores: "messages per second" -> "messages_per_second".
pub fn normalize_name(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

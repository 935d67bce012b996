//! Run configuration encoded in log file names.
//!
//! Expected shape: `<jobid>.<descr>.<...>` where `descr` reads like `4r_2n_8c_extra`:
//! ranks per node before `r_`, node count before `n_`, collector count before `c`.

use crate::Result;
use crate::log::value::ConfigValue;

use anyhow::{Context, anyhow, bail};
use serde::Serialize;
use std::collections::BTreeMap;

pub const JOBID: &str = "jobid";
pub const DESCR: &str = "descr";
pub const RANKS_PER_NODE: &str = "ranks_per_node";
pub const NODES: &str = "nodes";
pub const COLLECTORS: &str = "collectors";

/// Per-run configuration: file-name fields plus keys found on `running with` lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RunConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl RunConfig {
    /// Parse the configuration encoded in `path`.
    ///
    /// The path is split on `.` as given, so directory components containing dots
    /// shift the fields.
    pub fn from_path(path: &str) -> Result<Self> {
        parse_file_name(path).with_context(|| format!("malformed file name {}", path))
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Insert or overwrite a key.
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    /// Integer value of `key`; fails when absent or not an integer.
    pub fn int(&self, key: &str) -> Result<i64> {
        match self.get(key) {
            Some(v) => v
                .as_int()
                .ok_or_else(|| anyhow!("config key {} is not an integer: {}", key, v)),
            None => bail!("config key {} is missing", key),
        }
    }

    /// Text value of `key`; fails when absent or not text.
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(v) => v
                .as_text()
                .ok_or_else(|| anyhow!("config key {} is not text: {}", key, v)),
            None => bail!("config key {} is missing", key),
        }
    }

    pub fn ranks_per_node(&self) -> Result<i64> {
        self.int(RANKS_PER_NODE)
    }

    pub fn nodes(&self) -> Result<i64> {
        self.int(NODES)
    }

    pub fn collectors(&self) -> Result<i64> {
        self.int(COLLECTORS)
    }

    /// Total ranks of the run: ranks per node times nodes.
    pub fn ranks(&self) -> Result<i64> {
        let rpn = self.ranks_per_node()?;
        let nodes = self.nodes()?;
        rpn.checked_mul(nodes)
            .ok_or_else(|| anyhow!("ranks overflow: {} * {}", rpn, nodes))
    }
}

fn parse_file_name(path: &str) -> Result<RunConfig> {
    let mut parts = path.split('.');
    let jobid = parts.next().unwrap_or_default();
    let descr = parts
        .next()
        .ok_or_else(|| anyhow!("no '.'-separated description field"))?;

    let r = find_marker(descr, "r_")?;
    let n = find_marker(descr, "n_")?;
    let c = find_marker(descr, "c")?;

    let ranks_per_node = parse_between(descr, 0, r, RANKS_PER_NODE)?;
    let nodes = parse_between(descr, r + 2, n, NODES)?;
    let collectors = parse_between(descr, n + 2, c, COLLECTORS)?;

    let mut config = RunConfig::default();
    config.set(JOBID, ConfigValue::Text(jobid.to_string()));
    config.set(DESCR, ConfigValue::Text(descr.to_string()));
    config.set(RANKS_PER_NODE, ConfigValue::Int(ranks_per_node));
    config.set(NODES, ConfigValue::Int(nodes));
    config.set(COLLECTORS, ConfigValue::Int(collectors));
    Ok(config)
}

fn find_marker(descr: &str, marker: &str) -> Result<usize> {
    descr
        .find(marker)
        .ok_or_else(|| anyhow!("description {:?} has no {:?} marker", descr, marker))
}

fn parse_between(descr: &str, start: usize, end: usize, field: &str) -> Result<i64> {
    let s = descr.get(start..end).ok_or_else(|| {
        anyhow!(
            "description {:?}: markers out of order for {} ({}..{})",
            descr,
            field,
            start,
            end
        )
    })?;
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("description {:?}: bad {} {:?}", descr, field, s))
}

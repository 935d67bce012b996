use crate::Result;
use crate::log::value::Number;

use anyhow::{anyhow, bail};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Named numeric series of one run log.
///
/// The schema (column names in header order) is fixed by the first `CCT ` line;
/// every later data line contributes one sample per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    names: Vec<String>,
    columns: BTreeMap<String, Vec<Number>>,
}

impl SeriesTable {
    pub fn has_schema(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Record a column name, starting it with an empty sequence.
    ///
    /// A repeated name resets that column and keeps both schema positions.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.columns.insert(name.clone(), Vec::new());
        self.names.push(name);
    }

    /// Append one sample per schema column, taken positionally from `values`.
    pub fn push_row(&mut self, values: &[Number]) -> Result<()> {
        if values.len() < self.names.len() {
            bail!(
                "row has {} values but the schema has {} columns",
                values.len(),
                self.names.len()
            );
        }
        for (name, value) in self.names.iter().zip(values) {
            self.columns.entry(name.clone()).or_default().push(*value);
        }
        Ok(())
    }

    /// Append a column after the scan; it becomes the last schema entry.
    pub fn append_column(&mut self, name: impl Into<String>, values: Vec<Number>) {
        let name = name.into();
        self.columns.insert(name.clone(), values);
        self.names.push(name);
    }

    pub fn get(&self, name: &str) -> Option<&[Number]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Samples of `name` as floats; fails when the column does not exist.
    pub fn floats(&self, name: &str) -> Result<Vec<f64>> {
        self.get(name)
            .map(|vs| vs.iter().map(|v| v.as_f64()).collect())
            .ok_or_else(|| anyhow!("missing series {}", name))
    }
}

/// Serializes as a map in schema order.
impl Serialize for SeriesTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seen = std::collections::BTreeSet::new();
        let mut map = serializer.serialize_map(None)?;
        for name in &self.names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            if let Some(values) = self.columns.get(name) {
                map.serialize_entry(name, values)?;
            }
        }
        map.end()
    }
}

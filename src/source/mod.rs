//! Tabular data source: JSON tables with named columns.
//!
//! A workbook file is a JSON object with an `inventory` array and an optional
//! `cves` array, each an array of objects keyed by column name. The core
//! reads fields by configured column name and writes classification results
//! back to result columns.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result columns written back to the inventory table.
pub const COL_FILE_EXISTS: &str = "FileExists";
pub const COL_FILE_STATUS: &str = "FileStatus";
pub const COL_RESOLVED_PATH: &str = "ResolvedPath";
pub const COL_REPAIR_NOTE: &str = "RepairNote";
pub const COL_FILE_MOD_DATE: &str = "FileModificationDate";
pub const COL_VERSION_EXTRACTION: &str = "VersionExtraction";

/// Result columns written back to the CVE table.
pub const COL_WEBLOGIC_FLAG: &str = "WeblogicFlag";
pub const COL_WEBLOGIC_SIGNAL: &str = "WeblogicSignal";
pub const COL_ORACLE_ADVISORIES: &str = "OracleAdvisories";

/// Ordered rows with named columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Map<String, Value>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a cell as a string. Missing cells return an empty string;
    /// numeric and boolean cells are coerced.
    pub fn get(&self, row: usize, column: &str) -> String {
        let Some(value) = self.rows.get(row).and_then(|r| r.get(column)) else {
            return String::new();
        };
        match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => {
                // Whole numbers render without a trailing ".0".
                match n.as_i64() {
                    Some(i) => i.to_string(),
                    None => n.to_string(),
                }
            }
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn set(&mut self, row: usize, column: &str, value: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            r.insert(column.to_string(), Value::String(value.to_string()));
        }
    }

    /// A column exists if any row carries it.
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|r| r.contains_key(column))
    }

    /// Names of required columns absent from the table.
    pub fn missing_columns<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .copied()
            .collect()
    }
}

/// The two tables of one input file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub inventory: Table,
    #[serde(default)]
    pub cves: Table,
}

impl Workbook {
    pub fn load(path: &Path) -> Result<Workbook> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let workbook: Workbook = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if workbook.inventory.is_empty() {
            bail!("{}: inventory table is empty", path.display());
        }
        Ok(workbook)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

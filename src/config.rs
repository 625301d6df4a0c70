//! Dataset configuration: which file/sheet/range to read and how each column
//! is classified. Loaded from YAML or JSON so new dataset variants need no
//! code changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};
use crate::load::{ColumnRange, LoadRequest};

/// How a column is treated from normalization through display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Verbatim text, shown with emphasis. One per schema.
    Identifier,
    /// Verbatim text (country, category …).
    Text,
    /// Fraction of 1, shown as `x.y%`.
    Percentage,
    /// Unscaled number, shown as `x.y`.
    Plain,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Percentage | ColumnKind::Plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// Absence of a required column aborts the render instead of degrading.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Ordered, validated list of canonical columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnSpec>", into = "Vec<ColumnSpec>")]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Config("schema has no columns".into()));
        }
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Config(format!("duplicate column `{}`", col.name)));
            }
        }
        let identifiers = columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Identifier)
            .count();
        if identifiers != 1 {
            return Err(Error::Config(format!(
                "expected exactly one identifier column, found {}",
                identifiers
            )));
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub(crate) fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of every column classified as `kind`, in schema order.
    pub fn names_of(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl TryFrom<Vec<ColumnSpec>> for ColumnSchema {
    type Error = Error;

    fn try_from(columns: Vec<ColumnSpec>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<ColumnSchema> for Vec<ColumnSpec> {
    fn from(schema: ColumnSchema) -> Self {
        schema.columns
    }
}

/// Whether the header row of the range can be trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Ignore the labels: assign schema names left to right.
    #[default]
    Positional,
    /// Match schema names against the labels.
    ByName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Date the source sheet was last refreshed.
    #[serde(default)]
    pub updated: Option<NaiveDate>,
    pub source: PathBuf,
    pub sheet: String,
    pub columns: ColumnRange,
    #[serde(default)]
    pub header_row: usize,
    #[serde(default)]
    pub max_rows: Option<usize>,
    #[serde(default)]
    pub header: HeaderMode,
    pub schema: ColumnSchema,
}

impl DatasetConfig {
    /// Read a `.yaml`/`.yml` or `.json` config. A relative `source` is
    /// resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let mut cfg = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        if cfg.source.is_relative() {
            if let Some(dir) = path.parent() {
                cfg.source = dir.join(&cfg.source);
            }
        }
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load_request(&self) -> LoadRequest {
        LoadRequest {
            source: self.source.clone(),
            sheet: self.sheet.clone(),
            columns: self.columns,
            header_row: self.header_row,
            max_rows: self.max_rows,
        }
    }

    /// Explicit subtitle, else `Updated: dd/mm/YYYY` when a date is set.
    pub fn display_subtitle(&self) -> Option<String> {
        self.subtitle.clone().or_else(|| {
            self.updated
                .map(|d| format!("Updated: {}", d.format("%d/%m/%Y")))
        })
    }
}

// src/align/mod.rs
use tracing::{debug, warn};

use crate::config::{ColumnSchema, ColumnSpec, HeaderMode};
use crate::error::{Error, Result};
use crate::table::{Cell, RawTable};

/// One schema column with its still-raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedColumn {
    pub spec: ColumnSpec,
    pub cells: Vec<Cell>,
}

/// Columns restricted to the schema, in schema order. Values are untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    pub columns: Vec<AlignedColumn>,
    pub num_rows: usize,
}

impl AlignedTable {
    pub fn column(&self, name: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.spec.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.spec.name.as_str()).collect()
    }
}

/// Map a loaded table onto `schema`.
///
/// `Positional` hands the leading schema names to the leading raw columns;
/// `ByName` matches labels (trimmed, ASCII case-insensitive). Either way the
/// result holds only schema columns, in schema order. Absent columns are
/// skipped unless marked required; an empty result is a `SchemaMismatch`.
pub fn align_columns(raw: RawTable, schema: &ColumnSchema, mode: HeaderMode) -> Result<AlignedTable> {
    let num_rows = raw.height();
    let headers = raw.headers.clone();

    // schema index → raw column index
    let assignment: Vec<Option<usize>> = match mode {
        HeaderMode::Positional => {
            if headers.len() > schema.len() {
                warn!(
                    dropped = ?&headers[schema.len()..],
                    "range is wider than the schema; trailing columns dropped"
                );
            }
            (0..schema.len())
                .map(|i| (i < headers.len()).then_some(i))
                .collect()
        }
        HeaderMode::ByName => {
            let mut used = vec![false; headers.len()];
            schema
                .columns()
                .iter()
                .map(|spec| {
                    let found = headers.iter().enumerate().position(|(j, h)| {
                        !used[j] && h.trim().eq_ignore_ascii_case(spec.name.trim())
                    });
                    if let Some(j) = found {
                        used[j] = true;
                    }
                    found
                })
                .collect()
        }
    };

    let mut raw_columns = transpose(raw);
    let mut columns = Vec::with_capacity(schema.len());
    let mut absent = Vec::new();
    for (spec, slot) in schema.columns().iter().zip(&assignment) {
        match slot {
            Some(j) => columns.push(AlignedColumn {
                spec: spec.clone(),
                cells: std::mem::take(&mut raw_columns[*j]),
            }),
            None if spec.required => {
                return Err(Error::SchemaMismatch(format!(
                    "required column `{}` is absent (found {:?})",
                    spec.name, headers
                )));
            }
            None => {
                warn!(column = %spec.name, kind = ?spec.kind, "column absent; omitted");
                absent.push(spec.name.as_str());
            }
        }
    }

    if columns.is_empty() {
        return Err(Error::SchemaMismatch(format!(
            "no columns of {:?} found in {:?}",
            schema.names().collect::<Vec<_>>(),
            headers
        )));
    }

    debug!(kept = columns.len(), ?absent, "aligned columns");
    Ok(AlignedTable { columns, num_rows })
}

fn transpose(raw: RawTable) -> Vec<Vec<Cell>> {
    let width = raw.width();
    let mut cols: Vec<Vec<Cell>> = (0..width)
        .map(|_| Vec::with_capacity(raw.height()))
        .collect();
    for row in raw.rows {
        for (j, cell) in row.into_iter().enumerate().take(width) {
            cols[j].push(cell);
        }
    }
    cols
}

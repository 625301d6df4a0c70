// src/normalize/mod.rs
use arrow::{
    array::{ArrayRef, Float64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::align::AlignedTable;
use crate::config::ColumnKind;
use crate::error::{Error, Result};
use crate::table::Cell;

/// Numeric coercion mode for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Text like `"9.3%"` is divided by 100. Numbers are kept as-is.
    Percentage,
    Plain,
}

impl Mode {
    /// `None` for columns that stay text.
    pub fn for_kind(kind: ColumnKind) -> Option<Mode> {
        match kind {
            ColumnKind::Percentage => Some(Mode::Percentage),
            ColumnKind::Plain => Some(Mode::Plain),
            ColumnKind::Identifier | ColumnKind::Text => None,
        }
    }
}

/// Trim, drop every `%` and `,`, trim again.
///
/// Commas are removed unconditionally, so a decimal comma (`"80,3"`) turns
/// into `"803"`.
pub fn clean_numeric_text(raw: &str) -> String {
    raw.trim().replace(['%', ','], "").trim().to_string()
}

fn parse_text(raw: &str) -> Option<f64> {
    let cleaned = clean_numeric_text(raw);
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            trace!(raw, "not numeric; treated as missing");
            None
        }
    }
}

/// Canonical value of one cell, `None` when absent or unparsable.
pub fn normalize_cell(cell: &Cell, mode: Mode) -> Option<f64> {
    match cell {
        // already scaled: never divided, even for percentage columns
        Cell::Number(v) => v.is_finite().then_some(*v),
        Cell::Text(s) => {
            let v = parse_text(s)?;
            Some(match mode {
                Mode::Percentage => v / 100.0,
                Mode::Plain => v,
            })
        }
        Cell::Missing => None,
    }
}

/// Same length as `cells`; bad cells become `None` without affecting the rest.
pub fn normalize_column(cells: &[Cell], mode: Mode) -> Vec<Option<f64>> {
    cells.iter().map(|c| normalize_cell(c, mode)).collect()
}

/// Normalize the column `name` of an aligned table.
pub fn normalize_named_column(table: &AlignedTable, name: &str, mode: Mode) -> Result<Vec<Option<f64>>> {
    let column = table
        .column(name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))?;
    Ok(normalize_column(&column.cells, mode))
}

/// Verbatim text for identifier/category columns. Blank text is missing.
pub fn text_value(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) if s.trim().is_empty() => None,
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(v) => Some(display_number(*v)),
        Cell::Missing => None,
    }
}

/// Integers without decimals, everything else in shortest form.
fn display_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Typed table: `Float64` for numeric kinds (null = missing), `Utf8` otherwise.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    batch: RecordBatch,
    kinds: Vec<ColumnKind>,
}

impl NormalizedTable {
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn column(&self, idx: usize) -> &ArrayRef {
        self.batch.column(idx)
    }
}

/// Convert every aligned column to its final type.
pub fn normalize_table(table: AlignedTable) -> Result<NormalizedTable> {
    if table.columns.is_empty() {
        return Err(Error::SchemaMismatch("nothing to normalize".into()));
    }

    let mut fields = Vec::with_capacity(table.columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns.len());
    let mut kinds = Vec::with_capacity(table.columns.len());

    for col in &table.columns {
        let name = &col.spec.name;
        match Mode::for_kind(col.spec.kind) {
            Some(mode) => {
                let values = normalize_named_column(&table, name, mode)?;
                let coerced = col
                    .cells
                    .iter()
                    .zip(&values)
                    .filter(|(c, v)| matches!(c, Cell::Text(_)) && v.is_none())
                    .count();
                if coerced > 0 {
                    debug!(column = %name, coerced, "text cells coerced to missing");
                }

                let mut b = Float64Builder::with_capacity(values.len());
                for v in values {
                    b.append_option(v);
                }
                fields.push(Field::new(name, DataType::Float64, true));
                arrays.push(Arc::new(b.finish()) as ArrayRef);
            }
            None => {
                let mut b = StringBuilder::new();
                for cell in &col.cells {
                    b.append_option(text_value(cell));
                }
                fields.push(Field::new(name, DataType::Utf8, true));
                arrays.push(Arc::new(b.finish()) as ArrayRef);
            }
        }
        kinds.push(col.spec.kind);
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    debug!(rows = batch.num_rows(), cols = batch.num_columns(), "normalized");
    Ok(NormalizedTable { batch, kinds })
}

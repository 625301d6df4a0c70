// src/table.rs

/// A single loaded cell, tagged once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Tag one column of raw text fields. Blank fields are Missing. The rest
    /// become Numbers only when every non-blank field parses as a finite
    /// float; a single non-numeric field keeps the whole column as Text.
    pub fn infer_column(fields: &[&str]) -> Vec<Cell> {
        let parsed: Vec<Option<f64>> = fields
            .iter()
            .map(|f| f.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();
        let numeric = fields
            .iter()
            .zip(&parsed)
            .all(|(f, v)| f.trim().is_empty() || v.is_some());

        fields
            .iter()
            .zip(parsed)
            .map(|(f, v)| match v {
                _ if f.trim().is_empty() => Cell::Missing,
                Some(v) if numeric => Cell::Number(v),
                _ => Cell::Text(f.to_string()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column labels from the header row of the range.
    /// These are what the file claims; alignment decides whether to trust them.
    pub headers: Vec<String>,
    /// Each data row, padded with `Cell::Missing` to `headers.len()`.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, Cell::Missing);
        }
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Copy out column `idx` top to bottom.
    pub fn column(&self, idx: usize) -> Vec<Cell> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or(Cell::Missing))
            .collect()
    }

    /// Keep at most `max_rows` data rows; `None` keeps everything.
    pub fn truncated(mut self, max_rows: Option<usize>) -> Self {
        if let Some(n) = max_rows {
            self.rows.truncate(n);
        }
        self
    }
}

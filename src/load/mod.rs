// src/load/mod.rs
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::{Cell, RawTable};

pub mod cache;
pub mod range;

pub use cache::CachedSource;
pub use range::ColumnRange;

/// Where to read a table from and which slice of the sheet to keep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadRequest {
    pub source: PathBuf,
    /// Sheet name; ignored for csv sources.
    pub sheet: String,
    pub columns: ColumnRange,
    /// Zero-based sheet row holding the column labels.
    pub header_row: usize,
    /// `None` loads every data row.
    pub max_rows: Option<usize>,
}

/// Anything that can hand back a rectangular table for a `LoadRequest`.
pub trait TableSource {
    fn load(&self, request: &LoadRequest) -> Result<RawTable>;
}

/// Reads workbooks (xlsx, xls, ods …) through calamine and `.csv` files through `csv`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl TableSource for FileSource {
    #[tracing::instrument(level = "info", skip(self, request), fields(path = %request.source.display(), sheet = %request.sheet))]
    fn load(&self, request: &LoadRequest) -> Result<RawTable> {
        let table = if is_csv(&request.source) {
            load_csv(request)?
        } else {
            load_workbook(request)?
        };
        info!(
            rows = table.height(),
            cols = table.width(),
            "loaded {}",
            request.columns
        );
        Ok(table)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
}

fn load_workbook(request: &LoadRequest) -> Result<RawTable> {
    let location = request.source.display().to_string();
    let mut workbook = open_workbook_auto(&request.source)
        .map_err(|e| Error::unavailable(&location, &request.sheet, e))?;
    let range = workbook
        .worksheet_range(&request.sheet)
        .map_err(|e| Error::unavailable(&location, &request.sheet, e))?;

    let Some((end_row, end_col)) = range.end() else {
        debug!("sheet is empty");
        return Ok(RawTable::default());
    };
    let end_row = end_row as usize;
    if request.header_row > end_row {
        return Err(Error::unavailable(
            &location,
            &request.sheet,
            format!("header row {} is past the last row {}", request.header_row, end_row),
        ));
    }

    let first = request.columns.first;
    let last = request.columns.last.min(end_col as usize);
    if first > last {
        debug!("range {} lies right of the used area", request.columns);
        return Ok(RawTable::default());
    }

    let headers: Vec<String> = (first..=last)
        .map(|c| header_text(&range, request.header_row, c))
        .collect();

    let rows = collect_rows((request.header_row + 1..=end_row).map(|r| {
        (first..=last)
            .map(|c| cell_at(&range, r, c))
            .collect::<Vec<_>>()
    }), request.max_rows);

    Ok(RawTable::new(headers, rows))
}

fn header_text(range: &Range<Data>, row: usize, col: usize) -> String {
    range
        .get_value((row as u32, col as u32))
        .map(|d| d.to_string().trim().to_string())
        .unwrap_or_default()
}

fn cell_at(range: &Range<Data>, row: usize, col: usize) -> Cell {
    range
        .get_value((row as u32, col as u32))
        .map(cell_from_data)
        .unwrap_or(Cell::Missing)
}

/// Tag a workbook value. Spreadsheet error values (`#N/A`, `#DIV/0!`) carry no data.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Missing,
    }
}

fn load_csv(request: &LoadRequest) -> Result<RawTable> {
    let location = request.source.display().to_string();
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&request.source)
        .map_err(|e| Error::unavailable(&location, &request.sheet, e))?;

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            Error::unavailable(&location, &request.sheet, format!("record {}: {}", idx, e))
        })?;
        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    let Some(header) = records.get(request.header_row) else {
        return Err(Error::unavailable(
            &location,
            &request.sheet,
            format!("header row {} is past the last row {}", request.header_row, records.len()),
        ));
    };

    let used_width = records.iter().map(Vec::len).max().unwrap_or(0);
    let first = request.columns.first;
    let last = request.columns.last.min(used_width.saturating_sub(1));
    if used_width == 0 || first > last {
        debug!("range {} lies right of the used area", request.columns);
        return Ok(RawTable::default());
    }

    let headers: Vec<String> = (first..=last)
        .map(|c| header.get(c).map(|s| s.trim().to_string()).unwrap_or_default())
        .collect();

    // one type per column, decided over every data row
    let data = &records[request.header_row + 1..];
    let mut columns: Vec<std::vec::IntoIter<Cell>> = (first..=last)
        .map(|c| {
            let fields: Vec<&str> = data
                .iter()
                .map(|rec| rec.get(c).map_or("", String::as_str))
                .collect();
            Cell::infer_column(&fields).into_iter()
        })
        .collect();
    let rows = collect_rows(
        (0..data.len()).map(|_| {
            columns
                .iter_mut()
                .map(|col| col.next().unwrap_or(Cell::Missing))
                .collect::<Vec<_>>()
        }),
        request.max_rows,
    );

    Ok(RawTable::new(headers, rows))
}

/// Drop rows with no data at all, then apply the row limit.
fn collect_rows<I>(rows: I, max_rows: Option<usize>) -> Vec<Vec<Cell>>
where
    I: Iterator<Item = Vec<Cell>>,
{
    let mut skipped = 0usize;
    let kept: Vec<Vec<Cell>> = rows
        .filter(|row| {
            let blank = row.iter().all(Cell::is_missing);
            if blank {
                skipped += 1;
            }
            !blank
        })
        .take(max_rows.unwrap_or(usize::MAX))
        .collect();
    if skipped > 0 {
        debug!(skipped, "skipped blank rows");
    }
    kept
}

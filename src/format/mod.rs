// src/format/mod.rs
use arrow::array::{Array, Float64Array, StringArray};

use crate::config::ColumnKind;
use crate::error::{Error, Result};
use crate::normalize::NormalizedTable;

/// Rendered in place of a missing value.
pub const MISSING_PLACEHOLDER: &str = "-";

/// How a column's values become display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRule {
    /// `0.093` → `9.3%`
    PercentOneDecimal,
    /// `80.34` → `80.3`
    FixedOneDecimal,
    /// verbatim, bold
    Emphasized,
    Verbatim,
}

impl DisplayRule {
    pub fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Percentage => DisplayRule::PercentOneDecimal,
            ColumnKind::Plain => DisplayRule::FixedOneDecimal,
            ColumnKind::Identifier => DisplayRule::Emphasized,
            ColumnKind::Text => DisplayRule::Verbatim,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DisplayRule::PercentOneDecimal | DisplayRule::FixedOneDecimal)
    }

    /// Display string for a numeric value. The stored fraction is not touched.
    pub fn number(self, value: Option<f64>) -> String {
        match (self, value) {
            (_, None) => MISSING_PLACEHOLDER.to_string(),
            (DisplayRule::PercentOneDecimal, Some(v)) => format!("{:.1}%", v * 100.0),
            (_, Some(v)) => format!("{:.1}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedCell {
    pub text: String,
    pub emphasis: bool,
}

/// Presentation-ready table. No row index column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTable {
    pub headers: Vec<String>,
    pub rules: Vec<DisplayRule>,
    pub rows: Vec<Vec<FormattedCell>>,
}

impl FormattedTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell text of column `name`, top to bottom.
    pub fn column_text(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r[idx].text.as_str()).collect())
    }
}

/// Format with the rule implied by each column's kind.
pub fn format_table(table: &NormalizedTable) -> Result<FormattedTable> {
    let rules: Vec<DisplayRule> = table.kinds().iter().map(|k| DisplayRule::for_kind(*k)).collect();
    format_table_with(table, &rules)
}

/// Format with explicit per-column rules. Numeric rules need `Float64`
/// columns and text rules need `Utf8` columns; nothing is re-parsed.
pub fn format_table_with(table: &NormalizedTable, rules: &[DisplayRule]) -> Result<FormattedTable> {
    let names = table.column_names();
    if rules.len() != names.len() {
        return Err(Error::SchemaMismatch(format!(
            "{} display rules for {} columns",
            rules.len(),
            names.len()
        )));
    }

    let mut rows = vec![Vec::with_capacity(names.len()); table.num_rows()];
    for (idx, (name, rule)) in names.iter().zip(rules).enumerate() {
        let array = table.column(idx);
        if rule.is_numeric() {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| Error::SchemaMismatch(format!("`{}` is not numeric", name)))?;
            for (row, value) in rows.iter_mut().zip(arr.iter()) {
                row.push(FormattedCell {
                    text: rule.number(value),
                    emphasis: false,
                });
            }
        } else {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::SchemaMismatch(format!("`{}` is not text", name)))?;
            let emphasis = *rule == DisplayRule::Emphasized;
            for (row, value) in rows.iter_mut().zip(arr.iter()) {
                // the placeholder is never emphasized
                row.push(FormattedCell {
                    text: value.unwrap_or(MISSING_PLACEHOLDER).to_string(),
                    emphasis: emphasis && value.is_some(),
                });
            }
        }
    }

    Ok(FormattedTable {
        headers: names,
        rules: rules.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{AlignedColumn, AlignedTable};
    use crate::config::ColumnSpec;
    use crate::normalize::normalize_table;
    use crate::table::Cell;

    fn normalized() -> NormalizedTable {
        let col = |name: &str, kind, cells| AlignedColumn {
            spec: ColumnSpec::new(name, kind),
            cells,
        };
        normalize_table(AlignedTable {
            columns: vec![
                col("ETF", ColumnKind::Identifier, vec![Cell::Text("EWZ".into()), Cell::Missing]),
                col("COUNTRY", ColumnKind::Text, vec![Cell::Text("Brazil".into()), Cell::Text("".into())]),
                col("MEAN", ColumnKind::Percentage, vec![Cell::Text("9.3%".into()), Cell::Number(0.093)]),
                col("PRICE", ColumnKind::Plain, vec![Cell::Number(80.34), Cell::Text("N/A".into())]),
            ],
            num_rows: 2,
        })
        .unwrap()
    }

    #[test]
    fn percent_renders_times_one_hundred_with_one_decimal() {
        let r = DisplayRule::PercentOneDecimal;
        assert_eq!(r.number(Some(0.093)), "9.3%");
        assert_eq!(r.number(Some(0.0)), "0.0%");
        assert_eq!(r.number(Some(-0.1234)), "-12.3%");
        assert_eq!(r.number(Some(1.5)), "150.0%");
        assert_eq!(r.number(None), "-");
    }

    #[test]
    fn fixed_renders_one_decimal() {
        let r = DisplayRule::FixedOneDecimal;
        assert_eq!(r.number(Some(803.0)), "803.0");
        assert_eq!(r.number(Some(80.34)), "80.3");
        assert_eq!(r.number(None), "-");
    }

    #[test]
    fn formats_every_column_by_kind() {
        let table = normalized();
        let out = format_table(&table).unwrap();

        assert_eq!(out.headers, ["ETF", "COUNTRY", "MEAN", "PRICE"]);
        assert_eq!(
            out.rules,
            [
                DisplayRule::Emphasized,
                DisplayRule::Verbatim,
                DisplayRule::PercentOneDecimal,
                DisplayRule::FixedOneDecimal
            ]
        );
        assert_eq!(out.column_text("ETF"), Some(vec!["EWZ", "-"]));
        assert_eq!(out.column_text("COUNTRY"), Some(vec!["Brazil", "-"]));
        assert_eq!(out.column_text("MEAN"), Some(vec!["9.3%", "9.3%"]));
        assert_eq!(out.column_text("PRICE"), Some(vec!["80.3", "-"]));

        assert!(out.rows[0][0].emphasis);
        assert!(!out.rows[1][0].emphasis, "missing identifier is plain");
        assert!(out.rows.iter().all(|r| r[1..].iter().all(|c| !c.emphasis)));
        // stored fractions are untouched
        assert_eq!(table.numeric("MEAN").unwrap()[1], Some(0.093));
    }

    #[test]
    fn mismatched_rules_are_rejected() {
        let table = normalized();
        assert!(format_table_with(&table, &[DisplayRule::Verbatim]).is_err());

        let wrong = [
            DisplayRule::PercentOneDecimal,
            DisplayRule::Verbatim,
            DisplayRule::PercentOneDecimal,
            DisplayRule::FixedOneDecimal,
        ];
        assert!(matches!(
            format_table_with(&table, &wrong),
            Err(Error::SchemaMismatch(_))
        ));

        let plain_mean = [
            DisplayRule::Emphasized,
            DisplayRule::Verbatim,
            DisplayRule::FixedOneDecimal,
            DisplayRule::FixedOneDecimal,
        ];
        let out = format_table_with(&table, &plain_mean).unwrap();
        assert_eq!(out.column_text("MEAN"), Some(vec!["0.1", "0.1"]));
    }
}

use std::io::Write;

use super::Surface;
use crate::error::Result;
use crate::format::{FormattedCell, FormattedTable};

/// Writes a GitHub-flavoured Markdown page: `# title`, `#### subtitle`, pipe table.
pub struct MarkdownSurface<W: Write> {
    out: W,
}

impl<W: Write> MarkdownSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn cell_text(cell: &FormattedCell) -> String {
    let text = cell.text.replace('|', "\\|");
    if cell.emphasis {
        format!("**{}**", text)
    } else {
        text
    }
}

impl<W: Write> Surface for MarkdownSurface<W> {
    fn render(
        &mut self,
        table: &FormattedTable,
        title: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<()> {
        if let Some(t) = title {
            writeln!(self.out, "# {}\n", t)?;
        }
        if let Some(s) = subtitle {
            writeln!(self.out, "#### {}\n", s)?;
        }

        let headers: Vec<String> = table.headers.iter().map(|h| h.replace('|', "\\|")).collect();
        let body: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        // at least 3 so the separator row stays valid
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(3)).collect();
        for row in &body {
            for (w, text) in widths.iter_mut().zip(row) {
                *w = (*w).max(text.chars().count());
            }
        }

        let line = |cells: &[String], numeric: &dyn Fn(usize) -> bool| -> String {
            let padded: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    if numeric(i) {
                        format!(" {:>width$} ", text, width = widths[i])
                    } else {
                        format!(" {:<width$} ", text, width = widths[i])
                    }
                })
                .collect();
            format!("|{}|", padded.join("|"))
        };
        let is_numeric = |i: usize| table.rules.get(i).map_or(false, |r| r.is_numeric());

        writeln!(self.out, "{}", line(&headers[..], &is_numeric))?;
        let separator: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if is_numeric(i) {
                    format!(" {}: ", "-".repeat(w - 1))
                } else {
                    format!(" :{} ", "-".repeat(w - 1))
                }
            })
            .collect();
        writeln!(self.out, "|{}|", separator.join("|"))?;
        for row in &body {
            writeln!(self.out, "{}", line(&row[..], &is_numeric))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

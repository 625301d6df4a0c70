use std::io::Write;

use super::Surface;
use crate::error::Result;
use crate::format::FormattedTable;

/// Writes one HTML page. The document head is written with the first table
/// and every later table is appended to the same body; `finish` closes it.
pub struct HtmlSurface<W: Write> {
    out: W,
    open: bool,
}

impl<W: Write> HtmlSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, open: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl<W: Write> Surface for HtmlSurface<W> {
    fn render(
        &mut self,
        table: &FormattedTable,
        title: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<()> {
        let out = &mut self.out;
        if !self.open {
            writeln!(out, "<!DOCTYPE html>")?;
            writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
            if let Some(t) = title {
                writeln!(out, "<title>{}</title>", escape(t))?;
            }
            writeln!(
                out,
                "<style>table {{ border-collapse: collapse; width: 100%; }} \
                 th, td {{ padding: 4px 8px; border-bottom: 1px solid #ddd; }}</style>"
            )?;
            writeln!(out, "</head>\n<body>")?;
            self.open = true;
        }
        if let Some(t) = title {
            writeln!(out, "<h1>{}</h1>", escape(t))?;
        }
        if let Some(s) = subtitle {
            writeln!(out, "<h4>{}</h4>", escape(s))?;
        }

        let align = |i: usize| {
            if table.rules.get(i).map_or(false, |r| r.is_numeric()) {
                "right"
            } else {
                "left"
            }
        };

        writeln!(out, "<table>\n<thead>\n<tr>")?;
        for (i, h) in table.headers.iter().enumerate() {
            writeln!(out, "<th style=\"text-align: {}\">{}</th>", align(i), escape(h))?;
        }
        writeln!(out, "</tr>\n</thead>\n<tbody>")?;
        for row in &table.rows {
            write!(out, "<tr>")?;
            for (i, cell) in row.iter().enumerate() {
                let weight = if cell.emphasis { "; font-weight: bold" } else { "" };
                write!(
                    out,
                    "<td style=\"text-align: {}{}\">{}</td>",
                    align(i),
                    weight,
                    escape(&cell.text)
                )?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</tbody>\n</table>")?;
        out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.open {
            writeln!(self.out, "</body>\n</html>")?;
            self.open = false;
        }
        self.out.flush()?;
        Ok(())
    }
}
